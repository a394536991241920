//! Admin route handlers: site stats and category maintenance.
//!
//! Every handler requires [`RequireAdmin`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::{info, instrument};

use basket_core::CategoryId;

use super::{MessageQuery, PageContext, redirect_error, redirect_service_error, redirect_success};
use crate::db::{
    CatalogRepository, ListRepository, PriceHistoryRepository, RepositoryError, UserRepository,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CategoryUsage, User};
use crate::services::catalog::normalize_name;
use crate::state::AppState;

const CATEGORIES_PATH: &str = "/admin/categories";

/// Category name form.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// Row counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteStats {
    pub users: i64,
    pub products: i64,
    pub open_lists: i64,
    pub completed_lists: i64,
    pub price_entries: i64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub stats: SiteStats,
    pub users: Vec<User>,
}

/// Category maintenance template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories.html")]
pub struct CategoriesTemplate {
    pub ctx: PageContext,
    pub categories: Vec<CategoryUsage>,
}

/// Site stats and accounts.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let users_repo = UserRepository::new(state.pool());
    let (open_lists, completed_lists) = ListRepository::new(state.pool()).count_by_status().await?;

    let stats = SiteStats {
        users: users_repo.count().await?,
        products: CatalogRepository::new(state.pool()).count_products().await?,
        open_lists,
        completed_lists,
        price_entries: PriceHistoryRepository::new(state.pool()).count().await?,
    };
    let users = users_repo.list_all().await?;

    Ok(DashboardTemplate {
        ctx: PageContext::for_user(&state, admin, query),
        stats,
        users,
    })
}

/// Categories with product counts.
#[instrument(skip_all)]
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;
    Ok(CategoriesTemplate {
        ctx: PageContext::for_user(&state, admin, query),
        categories,
    })
}

/// Create a category, or keep the existing one with the same name.
#[instrument(skip_all, fields(name = %form.name))]
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Redirect {
    match state.catalog().upsert_category(&form.name).await {
        Ok(_) => redirect_success(CATEGORIES_PATH, "category_saved"),
        Err(e) => redirect_service_error(CATEGORIES_PATH, &e),
    }
}

/// Rename a category.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn rename_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Redirect {
    let name = match normalize_name(&form.name) {
        Ok(name) => name,
        Err(e) => return redirect_service_error(CATEGORIES_PATH, &e),
    };

    match CatalogRepository::new(state.pool()).rename_category(id, &name).await {
        Ok(()) => {
            info!(%name, "Category renamed");
            redirect_success(CATEGORIES_PATH, "category_saved")
        }
        Err(RepositoryError::Conflict(_)) => redirect_error(CATEGORIES_PATH, "category_exists"),
        Err(e) => redirect_service_error(CATEGORIES_PATH, &e.into()),
    }
}

/// Delete a category. Its products become uncategorized.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Redirect {
    match CatalogRepository::new(state.pool()).delete_category(id).await {
        Ok(()) => {
            info!("Category deleted");
            redirect_success(CATEGORIES_PATH, "category_deleted")
        }
        Err(e) => redirect_service_error(CATEGORIES_PATH, &e.into()),
    }
}

/// Run the keyword classifier over uncategorized products.
#[instrument(skip_all)]
pub async fn reclassify(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Redirect {
    match state.catalog().reclassify_uncategorized().await {
        Ok(_) => redirect_success(CATEGORIES_PATH, "reclassified"),
        Err(e) => redirect_service_error(CATEGORIES_PATH, &e),
    }
}

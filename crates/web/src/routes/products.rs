//! Product route handlers: price history page and autocomplete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use basket_core::ProductId;

use super::{MessageQuery, PageContext};
use crate::db::{CatalogRepository, PriceHistoryRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CatalogProduct, PriceEntry, PriceStats};
use crate::state::AppState;

/// Autocomplete query.
#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// Price history page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductTemplate {
    pub ctx: PageContext,
    pub product: CatalogProduct,
    pub entries: Vec<PriceEntry>,
    pub stats: Option<PriceStats>,
}

/// Prices paid for one product across the caller's accessible owners.
#[instrument(skip_all, fields(user_id = %user.id, product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let owners = state.access().accessible_user_ids(user.id).await;

    let product = CatalogRepository::new(state.pool())
        .get_product(id)
        .await?
        .filter(|p| p.owner_id.is_none_or(|owner| owners.contains(&owner)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let entries = PriceHistoryRepository::new(state.pool())
        .for_product(id, &owners)
        .await?;
    let stats = PriceStats::from_entries(&entries);

    Ok(ProductTemplate {
        ctx: PageContext::for_user(&state, user, query),
        product,
        entries,
        stats,
    })
}

/// Product names starting with `q`, as a JSON array.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn suggest(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<Vec<String>>> {
    let owners = state.access().accessible_user_ids(user.id).await;
    let names = state.catalog().suggest(user.id, &owners, &query.q).await?;
    Ok(Json(names))
}

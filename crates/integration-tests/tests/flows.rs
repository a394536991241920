//! End-to-end flows against a real database.
//!
//! These tests require a disposable `PostgreSQL` database:
//!
//! ```bash
//! BASKET_TEST_DATABASE_URL=postgres://localhost/basket_test \
//!     cargo test -p basket-integration-tests -- --ignored
//! ```
//!
//! Every test registers fresh accounts, so runs do not interfere.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use sqlx::PgPool;

use basket_core::{Email, Money, ShoppingListId, UserId};
use basket_integration_tests::{
    body_string, get, location, post_form, register, send, test_app, test_config, test_database,
    unique_email,
};
use basket_web::db::{ItemRepository, ListRepository, UserRepository};
use basket_web::models::ListItem;

async fn setup() -> (PgPool, Router) {
    let pool = test_database().await;
    let app = test_app(pool.clone());
    (pool, app)
}

async fn user_id(pool: &PgPool, email: &str) -> UserId {
    UserRepository::new(pool)
        .get_by_email(&Email::parse(email).unwrap())
        .await
        .unwrap()
        .unwrap()
        .id
}

async fn open_list(pool: &PgPool, owner: UserId) -> ShoppingListId {
    ListRepository::new(pool)
        .find_open_for_owner(owner)
        .await
        .unwrap()
        .unwrap()
        .id
}

async fn open_list_count(pool: &PgPool, owner: UserId) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM basket.shopping_list WHERE owner_id = $1 AND status = 'OPEN'",
    )
    .bind(owner)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn items_on(pool: &PgPool, list: ShoppingListId) -> Vec<ListItem> {
    ItemRepository::new(pool).list_for_list(list).await.unwrap()
}

fn item_named<'a>(items: &'a [ListItem], name: &str) -> &'a ListItem {
    items.iter().find(|i| i.product_name == name).unwrap()
}

async fn stored_total(pool: &PgPool, list: ShoppingListId) -> Money {
    ListRepository::new(pool).get(list).await.unwrap().unwrap().total
}

fn money(s: &str) -> Money {
    Money::parse_input(s).unwrap()
}

async fn suggestions(app: &Router, cookie: &str, prefix: &str) -> Vec<String> {
    let response = send(app, get(&format!("/api/products/suggest?q={prefix}"), Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Visit the current list so it exists, and return its ID.
async fn current_list(app: &Router, pool: &PgPool, cookie: &str, email: &str) -> ShoppingListId {
    let response = send(app, get("/lists/current", Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    open_list(pool, user_id(pool, email).await).await
}

async fn add_item(app: &Router, cookie: &str, list: ShoppingListId, fields: &[(&str, &str)]) {
    let response = send(app, post_form(&format!("/lists/{list}/items"), fields, Some(cookie))).await;
    assert_eq!(location(&response), Some(format!("/lists/{list}").as_str()));
}

fn multipart_upload(path: &str, cookie: &str, json: &str) -> Request<Body> {
    let boundary = "basket-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"history.json\"\r\n\
         Content-Type: application/json\r\n\r\n\
         {json}\r\n\
         --{boundary}--\r\n"
    );
    Request::post(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

// =============================================================================
// Lists
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_new_user_gets_an_empty_open_list() {
    let (_pool, app) = setup().await;
    let cookie = register(&app, &unique_email("empty")).await;

    let response = send(&app, get("/lists/current", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Nothing on this list yet."));
    assert!(body.contains("$0.00"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_items_update_the_list_total() {
    let (pool, app) = setup().await;
    let email = unique_email("total");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;

    add_item(&app, &cookie, list, &[("name", "Whole milk"), ("quantity", "2"), ("unit_price", "1,49")]).await;
    add_item(&app, &cookie, list, &[("name", "Sourdough bread"), ("unit_price", "$4.50")]).await;

    let body = body_string(send(&app, get(&format!("/lists/{list}"), Some(&cookie))).await).await;
    assert!(body.contains("Whole milk"));
    assert!(body.contains("$2.98"));
    assert!(body.contains("$7.48"));

    // Adding the same product again replaces its quantity and keeps the price.
    add_item(&app, &cookie, list, &[("name", "whole milk"), ("quantity", "3")]).await;
    let body = body_string(send(&app, get(&format!("/lists/{list}"), Some(&cookie))).await).await;
    assert!(body.contains("$4.47"));
    assert!(body.contains("$8.97"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_invalid_price_is_reported() {
    let (pool, app) = setup().await;
    let email = unique_email("price");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;

    let response = send(
        &app,
        post_form(
            &format!("/lists/{list}/items"),
            &[("name", "Eggs"), ("unit_price", "cheap")],
            Some(&cookie),
        ),
    )
    .await;
    let expected = format!("/lists/{list}?error=invalid_price");
    assert_eq!(location(&response), Some(expected.as_str()));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_oversized_line_or_list_total_is_an_invalid_price() {
    let (pool, app) = setup().await;
    let email = unique_email("huge");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;
    let expected = format!("/lists/{list}?error=invalid_price");

    // Each factor fits its column but the line total does not.
    let response = send(
        &app,
        post_form(
            &format!("/lists/{list}/items"),
            &[("name", "Bulk rice"), ("quantity", "1000"), ("unit_price", "9999999999")],
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), Some(expected.as_str()));

    // Each line fits but their sum does not.
    add_item(&app, &cookie, list, &[("name", "Gold bar"), ("unit_price", "6000000000")]).await;
    let response = send(
        &app,
        post_form(
            &format!("/lists/{list}/items"),
            &[("name", "Platinum bar"), ("unit_price", "6000000000")],
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), Some(expected.as_str()));
    assert_eq!(stored_total(&pool, list).await, money("6000000000"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_update_item_recomputes_total() {
    let (pool, app) = setup().await;
    let email = unique_email("update");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;
    let apples = format!("Apples {}", uuid::Uuid::new_v4().simple());
    let pears = format!("Pears {}", uuid::Uuid::new_v4().simple());

    add_item(&app, &cookie, list, &[("name", &apples), ("unit_price", "2")]).await;
    add_item(&app, &cookie, list, &[("name", &pears), ("unit_price", "1")]).await;
    assert_eq!(stored_total(&pool, list).await, money("3"));

    let item = item_named(&items_on(&pool, list).await, &apples).id;
    let response = send(
        &app,
        post_form(
            &format!("/lists/{list}/items/{item}"),
            &[("quantity", "3"), ("unit_price", "2,50"), ("checked", "on")],
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response), Some(format!("/lists/{list}").as_str()));

    let items = items_on(&pool, list).await;
    let updated = item_named(&items, &apples);
    assert_eq!(updated.total, money("7.50"));
    assert_eq!(updated.unit_price, Some(money("2.50")));
    assert!(updated.checked);
    assert_eq!(stored_total(&pool, list).await, money("8.50"));

    // Unchecking and clearing the price makes the line free again.
    send(
        &app,
        post_form(
            &format!("/lists/{list}/items/{item}"),
            &[("quantity", "3"), ("unit_price", "")],
            Some(&cookie),
        ),
    )
    .await;
    let items = items_on(&pool, list).await;
    let cleared = item_named(&items, &apples);
    assert!(!cleared.checked);
    assert_eq!(cleared.unit_price, None);
    assert_eq!(stored_total(&pool, list).await, money("1"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_delete_item_recomputes_total() {
    let (pool, app) = setup().await;
    let email = unique_email("remove");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;

    add_item(&app, &cookie, list, &[("name", "Oat milk"), ("unit_price", "1.80")]).await;
    add_item(&app, &cookie, list, &[("name", "Rye bread"), ("unit_price", "3.20")]).await;
    assert_eq!(stored_total(&pool, list).await, money("5"));

    let item = item_named(&items_on(&pool, list).await, "Rye bread").id;
    let response = send(
        &app,
        post_form(&format!("/lists/{list}/items/{item}/delete"), &[], Some(&cookie)),
    )
    .await;
    let expected = format!("/lists/{list}?success=item_deleted");
    assert_eq!(location(&response), Some(expected.as_str()));

    let items = items_on(&pool, list).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_name, "Oat milk");
    assert_eq!(stored_total(&pool, list).await, money("1.80"));

    // The item is gone, so a second delete finds nothing.
    let response = send(
        &app,
        post_form(&format!("/lists/{list}/items/{item}/delete"), &[], Some(&cookie)),
    )
    .await;
    let expected = format!("/lists/{list}?error=not_found");
    assert_eq!(location(&response), Some(expected.as_str()));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_finish_leaves_exactly_one_open_list() {
    let (pool, app) = setup().await;
    let email = unique_email("single");
    let cookie = register(&app, &email).await;
    let owner = user_id(&pool, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;
    add_item(&app, &cookie, list, &[("name", "Tofu"), ("unit_price", "2.20")]).await;
    add_item(&app, &cookie, list, &[("name", "Kitchen string")]).await;
    assert_eq!(open_list_count(&pool, owner).await, 1);

    send(&app, post_form(&format!("/lists/{list}/finish"), &[], Some(&cookie))).await;
    assert_eq!(open_list_count(&pool, owner).await, 1);

    // Visiting the current list afterwards does not open another.
    send(&app, get("/lists/current", Some(&cookie))).await;
    assert_eq!(open_list_count(&pool, owner).await, 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_finish_archives_prices_and_carries_unpriced_items() {
    let (pool, app) = setup().await;
    let email = unique_email("finish");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;

    add_item(&app, &cookie, list, &[("name", "Bananas"), ("unit_price", "0.99")]).await;
    add_item(&app, &cookie, list, &[("name", "Birthday candles")]).await;

    let response = send(&app, post_form(&format!("/lists/{list}/finish"), &[], Some(&cookie))).await;
    let next = open_list(&pool, user_id(&pool, &email).await).await;
    assert_ne!(next, list);
    let expected = format!("/lists/{next}?success=list_finished");
    assert_eq!(location(&response), Some(expected.as_str()));

    let body = body_string(send(&app, get(&format!("/lists/{next}"), Some(&cookie))).await).await;
    assert!(body.contains("Birthday candles"));
    assert!(!body.contains("Bananas"));

    let body = body_string(send(&app, get("/history", Some(&cookie))).await).await;
    assert!(body.contains(&format!("/lists/{list}")));
    assert!(body.contains("$0.99"));

    // Completed lists are read-only.
    let response = send(&app, post_form(&format!("/lists/{list}/finish"), &[], Some(&cookie))).await;
    let expected = format!("/lists/{list}?error=list_closed");
    assert_eq!(location(&response), Some(expected.as_str()));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_delete_open_list_returns_to_current() {
    let (pool, app) = setup().await;
    let email = unique_email("delete");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;
    add_item(&app, &cookie, list, &[("name", "Crackers")]).await;

    let response = send(&app, post_form(&format!("/lists/{list}/delete"), &[], Some(&cookie))).await;
    assert_eq!(location(&response), Some("/lists/current?success=list_deleted"));
    assert!(ListRepository::new(&pool).get(list).await.unwrap().is_none());

    let response = send(&app, get(&format!("/lists/{list}"), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Sharing
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_grantee_finish_credits_owner_with_todays_date() {
    let (pool, app) = setup().await;
    let alice = unique_email("owner");
    let bob = unique_email("helper");
    let alice_cookie = register(&app, &alice).await;
    let bob_cookie = register(&app, &bob).await;
    let alice_id = user_id(&pool, &alice).await;
    let list = current_list(&app, &pool, &alice_cookie, &alice).await;
    send(&app, post_form("/sharing", &[("email", &bob)], Some(&alice_cookie))).await;

    add_item(&app, &alice_cookie, list, &[("name", "Leeks"), ("unit_price", "1.10")]).await;
    add_item(&app, &bob_cookie, list, &[("name", "Parsnips"), ("quantity", "2"), ("unit_price", "0.75")]).await;
    add_item(&app, &bob_cookie, list, &[("name", "Twine")]).await;

    // The list was started a week before the shop.
    sqlx::query("UPDATE basket.shopping_list SET list_date = CURRENT_DATE - 7 WHERE id = $1")
        .bind(list)
        .execute(&pool)
        .await
        .unwrap();

    let response = send(&app, post_form(&format!("/lists/{list}/finish"), &[], Some(&bob_cookie))).await;
    let next = open_list(&pool, alice_id).await;
    let expected = format!("/lists/{next}?success=list_finished");
    assert_eq!(location(&response), Some(expected.as_str()));
    assert_eq!(open_list_count(&pool, alice_id).await, 1);

    let rows: Vec<(UserId, Money, bool)> = sqlx::query_as(
        r"
        SELECT user_id, price, purchased_on = CURRENT_DATE
        FROM basket.price_history
        WHERE list_id = $1
        ORDER BY price
        ",
    )
    .bind(list)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        rows,
        [
            (alice_id, money("0.75"), true),
            (alice_id, money("1.10"), true),
        ]
    );

    let finished = ListRepository::new(&pool).get(list).await.unwrap().unwrap();
    assert_eq!(finished.total, money("2.60"));
    assert_eq!(items_on(&pool, next).await.len(), 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_grantee_can_delete_shared_list() {
    let (pool, app) = setup().await;
    let alice = unique_email("lender");
    let bob = unique_email("borrower");
    let alice_cookie = register(&app, &alice).await;
    let bob_cookie = register(&app, &bob).await;
    let list = current_list(&app, &pool, &alice_cookie, &alice).await;
    let path = format!("/lists/{list}/delete");

    let response = send(&app, post_form(&path, &[], Some(&bob_cookie))).await;
    let expected = format!("/lists/{list}?error=forbidden");
    assert_eq!(location(&response), Some(expected.as_str()));
    assert!(ListRepository::new(&pool).get(list).await.unwrap().is_some());

    send(&app, post_form("/sharing", &[("email", &bob)], Some(&alice_cookie))).await;
    let response = send(&app, post_form(&path, &[], Some(&bob_cookie))).await;
    assert_eq!(location(&response), Some("/lists/current?success=list_deleted"));
    assert!(ListRepository::new(&pool).get(list).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_revoke_hides_grantors_products_from_suggestions() {
    let (pool, app) = setup().await;
    let alice = unique_email("pantry");
    let bob = unique_email("guest");
    let alice_cookie = register(&app, &alice).await;
    let bob_cookie = register(&app, &bob).await;
    let bob_id = user_id(&pool, &bob).await;
    let list = current_list(&app, &pool, &alice_cookie, &alice).await;
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let product = format!("Quokka{tag}");
    let prefix = format!("quokka{tag}");

    add_item(&app, &alice_cookie, list, &[("name", &product)]).await;
    assert!(suggestions(&app, &bob_cookie, &prefix).await.is_empty());

    send(&app, post_form("/sharing", &[("email", &bob)], Some(&alice_cookie))).await;
    assert_eq!(suggestions(&app, &bob_cookie, &prefix).await, [product.clone()]);

    send(
        &app,
        post_form(&format!("/sharing/{bob_id}/revoke"), &[], Some(&alice_cookie)),
    )
    .await;
    assert!(suggestions(&app, &bob_cookie, &prefix).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_sharing_grants_and_revokes_list_access() {
    let (pool, app) = setup().await;
    let alice = unique_email("alice");
    let bob = unique_email("bob");
    let alice_cookie = register(&app, &alice).await;
    let bob_cookie = register(&app, &bob).await;
    let list = current_list(&app, &pool, &alice_cookie, &alice).await;
    let path = format!("/lists/{list}");

    let response = send(&app, get(&path, Some(&bob_cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, post_form("/sharing", &[("email", &bob)], Some(&alice_cookie))).await;
    assert_eq!(location(&response), Some("/sharing?success=shared"));

    let response = send(&app, get(&path, Some(&bob_cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Shared with you"));

    let bob_id = user_id(&pool, &bob).await;
    let response = send(
        &app,
        post_form(&format!("/sharing/{bob_id}/revoke"), &[], Some(&alice_cookie)),
    )
    .await;
    assert_eq!(location(&response), Some("/sharing?success=revoked"));

    let response = send(&app, get(&path, Some(&bob_cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_sharing_rejects_self_and_unknown_accounts() {
    let (_pool, app) = setup().await;
    let email = unique_email("self");
    let cookie = register(&app, &email).await;

    let response = send(&app, post_form("/sharing", &[("email", &email)], Some(&cookie))).await;
    assert_eq!(location(&response), Some("/sharing?error=self_share"));

    let stranger = unique_email("stranger");
    let response = send(&app, post_form("/sharing", &[("email", &stranger)], Some(&cookie))).await;
    assert_eq!(location(&response), Some("/sharing?error=unknown_user"));
}

// =============================================================================
// History export / import
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_export_then_import_into_another_account() {
    let (pool, app) = setup().await;
    let source = unique_email("source");
    let cookie = register(&app, &source).await;
    let list = current_list(&app, &pool, &cookie, &source).await;
    add_item(&app, &cookie, list, &[("name", "Cheddar cheese"), ("quantity", "2"), ("unit_price", "3.25")]).await;
    send(&app, post_form(&format!("/lists/{list}/finish"), &[], Some(&cookie))).await;

    let response = send(&app, get("/history/export", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment;")
    );
    let json = body_string(response).await;
    let snapshot: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot["version"], 1);
    assert_eq!(snapshot["lists"][0]["items"][0]["product"], "Cheddar cheese");

    let target = unique_email("target");
    let target_cookie = register(&app, &target).await;
    let response = send(&app, multipart_upload("/history/import", &target_cookie, &json)).await;
    assert_eq!(location(&response), Some("/history?success=imported"));

    let body = body_string(send(&app, get("/history", Some(&target_cookie))).await).await;
    assert!(body.contains("$6.50"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_import_limit_applies_to_the_file_not_the_envelope() {
    let (_pool, app) = setup().await;
    let cookie = register(&app, &unique_email("limit")).await;
    let limit = test_config("postgres://unused").import_max_bytes;
    let empty = r#"{"version": 1, "exported_at": "2026-03-01T10:00:00Z", "lists": []}"#;

    // Just under the limit: the multipart envelope pushes the body over it.
    let fits = format!("{empty:<width$}", width = limit - 1);
    let response = send(&app, multipart_upload("/history/import", &cookie, &fits)).await;
    assert_eq!(location(&response), Some("/history?success=imported"));

    let too_big = format!("{empty:<width$}", width = limit + 1);
    let response = send(&app, multipart_upload("/history/import", &cookie, &too_big)).await;
    assert_eq!(location(&response), Some("/history?error=import_too_large"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_import_rejects_garbage() {
    let (_pool, app) = setup().await;
    let cookie = register(&app, &unique_email("garbage")).await;

    let response = send(&app, multipart_upload("/history/import", &cookie, "not json")).await;
    assert_eq!(location(&response), Some("/history?error=invalid_snapshot"));
}

// =============================================================================
// Products & admin
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_suggest_returns_matching_product_names() {
    let (pool, app) = setup().await;
    let email = unique_email("suggest");
    let cookie = register(&app, &email).await;
    let list = current_list(&app, &pool, &cookie, &email).await;
    let product = format!("Zucchini {}", uuid::Uuid::new_v4().simple());
    add_item(&app, &cookie, list, &[("name", &product)]).await;

    let response = send(&app, get("/api/products/suggest?q=zucchini", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let names: Vec<String> = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(names.contains(&product));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (BASKET_TEST_DATABASE_URL)"]
async fn test_admin_pages_are_forbidden_to_other_accounts() {
    let (_pool, app) = setup().await;
    let cookie = register(&app, &unique_email("plain")).await;

    let response = send(&app, get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

//! Review endpoints against a real database

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{app, send};

#[sqlx::test(migrations = "../migrations")]
#[ignore = "requires database"]
async fn review_lifecycle(pool: PgPool) {
    let app = app(pool);

    let (status, created) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({ "house_id": 1, "user_id": 2, "rating": 4, "comment": "Lovely view" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["rating"], 4);
    let uri = format!("/reviews/{}", created["review_id"]);

    let (status, listed) = send(&app, "GET", "/reviews", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "rating": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["rating"], 5);
    assert_eq!(updated["comment"], "Lovely view");

    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review deleted successfully.");

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Review not found.");
}

#[sqlx::test(migrations = "../migrations")]
#[ignore = "requires database"]
async fn missing_review_is_404(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, "PUT", "/reviews/55", Some(json!({ "comment": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/reviews/55", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../migrations")]
#[ignore = "requires database"]
async fn review_update_rejects_unknown_field(pool: PgPool) {
    let app = app(pool);

    let (status, body) =
        send(&app, "PUT", "/reviews/1", Some(json!({ "review_id": 9 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

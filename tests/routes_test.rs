//! Route-level checks that need no database, cache or network.
//!
//! Run with: `cargo test --test routes_test`
use actix_web::{App, http::StatusCode, test, web};
use std::sync::Arc;

use journata_backend::auth::gotrue::SupabaseAuth;
use journata_backend::handlers;

fn gotrue() -> web::Data<Arc<SupabaseAuth>> {
    web::Data::new(Arc::new(SupabaseAuth::new(
        "https://example.supabase.co",
        "anon-key",
    )))
}

#[actix_web::test]
async fn catalog_lists_trades_and_locations() {
    let app = test::init_service(
        App::new().service(web::scope("/api").configure(handlers::init_routes)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/catalog").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["trades"].as_array().map(Vec::len), Some(30));
    assert_eq!(body["locations"][0], "Tunis");
}

#[actix_web::test]
async fn password_update_without_token_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(gotrue())
            .service(web::scope("/api").configure(handlers::init_routes)),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/auth/password")
        .set_json(serde_json::json!({ "access_token": "", "password": "n3w-pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid or missing token.");
}

#[actix_web::test]
async fn signed_out_callers_get_a_login_message() {
    let app = test::init_service(
        App::new().service(web::scope("/api").configure(handlers::init_routes)),
    )
    .await;

    for uri in ["/api/inbox", "/api/service-requests", "/api/profiles/me"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "You must be logged in to continue", "{uri}");
    }
}

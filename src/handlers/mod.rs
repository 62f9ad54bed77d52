pub mod admin;
pub mod auth;
pub mod images;
pub mod inbox;
pub mod profiles;
pub mod reviews;
pub mod service_requests;
pub mod workers;

use actix_web::web;

use crate::realtime::session;

/// Largest accepted image upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (forwarded to the hosted auth service) ──
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(auth::signup))
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout))
            .route("/recover", web::post().to(auth::recover))
            .route("/password", web::put().to(auth::update_password))
            .route("/me", web::get().to(auth::me)),
    );

    // ── Browse routes (public, phone numbers hidden from visitors) ──
    cfg.service(web::resource("/catalog").route(web::get().to(workers::catalog)));
    cfg.service(
        web::scope("/workers")
            .route("", web::get().to(workers::browse))
            .route("/{user_id}", web::get().to(workers::worker_detail))
            .route("/{user_id}/reviews", web::get().to(reviews::list_reviews))
            .route("/{user_id}/reviews", web::post().to(reviews::create_review)),
    );

    // ── Profile & gallery routes ──
    cfg.service(
        web::scope("/profiles")
            .route("/me", web::get().to(profiles::get_me))
            .route("/me", web::put().to(profiles::update_me))
            .route("/me/picture", web::put().to(profiles::set_picture)),
    );
    cfg.service(
        web::resource("/users/{user_id}/images").route(web::get().to(images::list_user_images)),
    );
    cfg.service(
        web::resource("/images")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .route(web::get().to(images::my_images))
            .route(web::post().to(images::upload_image)),
    );
    cfg.service(web::resource("/images/{id}").route(web::delete().to(images::delete_image)));

    // ── Inbox routes ──
    cfg.service(
        web::scope("/inbox")
            .route("", web::get().to(inbox::conversations))
            .route("/unread", web::get().to(inbox::unread_count))
            .route("/{counterpart_id}", web::get().to(inbox::thread))
            .route("/{counterpart_id}", web::post().to(inbox::send_message))
            .route("/{counterpart_id}", web::delete().to(inbox::delete_conversation)),
    );

    // ── Service request routes ──
    cfg.service(
        web::scope("/service-requests")
            .route("", web::get().to(service_requests::list_requests))
            .route("", web::post().to(service_requests::create_request))
            .route("/workers", web::get().to(workers::worker_options))
            .route("/{id}/status", web::put().to(service_requests::update_status)),
    );

    // ── Admin routes ──
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(admin::list_users))
            .route("/reviews/{id}", web::delete().to(reviews::delete_review)),
    );

    // ── Realtime push channel ──
    cfg.service(web::resource("/realtime/ws").route(web::get().to(session::ws_connect)));
}

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use journata_backend::auth::gotrue::SupabaseAuth;
use journata_backend::auth::jwks::JwksCache;
use journata_backend::cache::RedisCache;
use journata_backend::config::AppConfig;
use journata_backend::create_pool;
use journata_backend::handlers;
use journata_backend::realtime::hub::NotificationHub;
use journata_backend::storage::StorageClient;
use migration::{Migrator, MigratorTrait};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn startup_error(context: &str, e: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .map_err(|e| startup_error("Migrations failed", e))?;
        tracing::info!("Migrations applied");
    }
    let db_data = web::Data::new(db);

    // Initialize Redis cache
    let redis_cache = RedisCache::new(&config.redis_url, config.cache.clone())
        .await
        .map_err(|e| startup_error("Failed to connect to Redis", e))?;
    let redis_data = web::Data::new(Arc::new(redis_cache));
    tracing::info!("Connected to Redis");

    tracing::info!("Using Supabase project {}", config.project_ref);
    let jwks_cache = web::Data::new(Arc::new(JwksCache::new(
        &config.supabase_url,
        &config.anon_key,
        config.jwt_secret.clone(),
    )));
    let gotrue = web::Data::new(Arc::new(SupabaseAuth::new(
        &config.supabase_url,
        &config.anon_key,
    )));
    let storage = web::Data::new(Arc::new(StorageClient::new(
        &config.supabase_url,
        &config.storage_bucket,
        &config.service_role_key,
    )));

    // Per-user push channels for WebSocket clients.
    let hub = web::Data::new(Arc::new(NotificationHub::new()));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let config_data = web::Data::new(config);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(config_data.clone())
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(jwks_cache.clone())
            .app_data(gotrue.clone())
            .app_data(storage.clone())
            .app_data(hub.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}

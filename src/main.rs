//! nimbus-web-api - Main application entry point
//!
//! This is the main entry point for the nimbus-web-api service, which
//! provides Google OAuth authentication with JWT access/refresh token
//! management backed by PostgreSQL.

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nimbus_web_api::config::Config;
use nimbus_web_api::db::{create_pool, run_migrations};
use nimbus_web_api::handlers::auth::AppState;
use nimbus_web_api::handlers::{
    health_check, login, logout, refresh_access_token, swap_token, user_info,
};
use nimbus_web_api::middleware::create_rate_limiter;
use nimbus_web_api::services::auth::AuthService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimbus_web_api=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = Config::from_env().expect("Failed to load configuration");
    let server_addr = config.server_addr();

    tracing::info!("Loading configuration...");

    // Create database connection pool
    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Database connection pool created");

    // Run database migrations
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Create HTTP client for Google API calls
    let http_client = reqwest::Client::builder()
        .user_agent("nimbus-web-api")
        .build()
        .expect("Failed to create HTTP client");

    // Create shared application state
    let app_state = web::Data::new(AppState {
        auth: AuthService::new(pool.clone(), &config, http_client),
        config,
    });

    tracing::info!("Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        // Create rate limiter for each worker (Governor doesn't implement Clone)
        let rate_limiter = create_rate_limiter();

        App::new()
            .app_data(app_state.clone())
            // Request logging
            .wrap(Logger::default())
            // Distributed tracing
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health check endpoint
            .route("/health", web::get().to(health_check))
            // Authentication routes
            .service(
                web::scope("/api/v1")
                    .route("/login", web::get().to(login))
                    .route("/logout", web::get().to(logout))
                    .route("/user/info", web::get().to(user_info))
                    // Token endpoints are rate limited
                    .service(
                        web::scope("")
                            .wrap(rate_limiter)
                            .route("/swap_token", web::post().to(swap_token))
                            .route(
                                "/refresh_access_token",
                                web::post().to(refresh_access_token),
                            ),
                    ),
            )
    })
    .bind(&server_addr)?
    .run()
    .await
}

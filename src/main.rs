mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod utils;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use db::user_repository::{MySqlUserStore, UserStore};
use dotenv::dotenv;
use middleware::auth::AuthMiddleware;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use utils::token::TokenKeys;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::api::health,
        handlers::api::profile,
        handlers::api::refresh,
        handlers::auth::sign_up,
        handlers::auth::sign_in,
    ),
    components(
        schemas(
            handlers::api::HealthResponse,
            handlers::api::ProfileResponse,
            handlers::auth::SignUpRequest,
            handlers::auth::SignInRequest,
            handlers::auth::TokenPairResponse,
            models::user::Claims,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Authentication", description = "Sign-up, sign-in, profile, and token refresh")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .json()
        .init();

    // Connect to the database; startup failure here is fatal
    let database_url = db::database_url_from_env();
    let pool = db::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    db::migrate(&pool)
        .await
        .expect("Failed to bring up database schema");
    info!("Connected to database");

    let store: Arc<dyn UserStore> = Arc::new(MySqlUserStore::new(pool));
    let keys = TokenKeys::from_env();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("{}:{}", host, port);

    info!(bind_address = %bind_address, "Starting auth token API server");
    info!("Available endpoints:");
    info!("   GET  /health   - Health check (public)");
    info!("   POST /signup   - Register new user (public)");
    info!("   POST /signin   - Verify credentials (public)");
    info!("   GET  /profile  - Profile from access-token claims (access token)");
    info!("   GET|POST /refresh - Mint a new token pair (refresh token)");
    info!(
        swagger_url = format!("http://{}/swagger-ui/", bind_address),
        "Swagger UI available"
    );

    HttpServer::new(move || {
        // Configure CORS
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        // Unreadable request bodies become a uniform 400
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Bad Request Data"
                })),
            )
            .into()
        });

        let openapi = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(keys.clone()))
            .app_data(json_config)
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Swagger UI
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            // Public routes
            .route("/health", web::get().to(handlers::api::health))
            .route("/signup", web::post().to(handlers::auth::sign_up))
            .route("/signin", web::post().to(handlers::auth::sign_in))
            // Protected routes, one guard per token class
            .service(
                web::scope("/profile")
                    .wrap(AuthMiddleware::new(&keys.access_secret))
                    .route("", web::get().to(handlers::api::profile)),
            )
            .service(
                web::scope("/refresh")
                    .wrap(AuthMiddleware::new(&keys.refresh_secret))
                    .route("", web::get().to(handlers::api::refresh))
                    .route("", web::post().to(handlers::api::refresh)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

mod auth;
mod config;
mod controllers;
mod db;
mod errors;
mod models;
mod notes;
mod summarize;

use db::Database;
use summarize::Summarizer;

pub struct AppState {
    pub db: Arc<Database>,
    pub summarizer: Arc<Summarizer>,
    /// Session-token signing secret, read once at startup
    pub jwt_secret: String,
}

static LOCALHOST_ORIGIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^http://localhost:\d+$").unwrap());

/// An origin passes when it is on the configured allow-list or is any
/// localhost port (local frontend dev servers).
fn origin_allowed(origin: &str, allow_list: &[String]) -> bool {
    allow_list.iter().any(|allowed| allowed == origin) || LOCALHOST_ORIGIN.is_match(origin)
}

/// JSON body handling: 1 MiB limit, errors surfaced in the API's
/// `{"message": ...}` shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| {
            actix_web::error::InternalError::from_response(
                err,
                actix_web::HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Invalid request body"
                })),
            )
            .into()
        })
}

/// SPA fallback: unknown non-API paths serve the client's index.html
async fn spa_fallback() -> actix_web::Result<NamedFile> {
    // Check both possible locations for frontend dist
    if std::path::Path::new("./mnemo-frontend/dist/index.html").exists() {
        Ok(NamedFile::open("./mnemo-frontend/dist/index.html")?)
    } else {
        Ok(NamedFile::open("../mnemo-frontend/dist/index.html")?)
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("mnemo v{}", env!("CARGO_PKG_VERSION"));

    let database_url = config::database_url();
    log::info!("Initializing database at {}", database_url);
    let db = Arc::new(Database::new(&database_url).expect("Failed to initialize database"));

    let summarizer = Arc::new(Summarizer::new(
        config::summarization_model(),
        config::summarization_api_key(),
    ));
    let jwt_secret = config::jwt_secret();
    let allowed_origins = config::allowed_origins();
    let frontend_dist = config::frontend_dist();

    let port = config::port();
    log::info!("Starting mnemo server on port {}", port);
    if let Some(dist) = &frontend_dist {
        log::info!("Serving frontend from: {}", dist);
    }

    HttpServer::new(move || {
        let allow_list = allowed_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                origin
                    .to_str()
                    .map(|o| origin_allowed(o, &allow_list))
                    .unwrap_or(false)
            })
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        let mut app = App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                summarizer: Arc::clone(&summarizer),
                jwt_secret: jwt_secret.clone(),
            }))
            .app_data(json_config())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::auth::config)
            .configure(controllers::notes::config);

        // Serve static files only if frontend dist exists
        if let Some(dist) = &frontend_dist {
            app = app.service(
                Files::new("/", dist.clone())
                    .index_file("index.html")
                    .default_handler(web::to(spa_fallback)),
            );
        }

        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

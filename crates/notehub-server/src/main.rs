use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use notehub_api::auth::{self, AppState, AppStateInner};
use notehub_api::middleware::{require_admin, require_auth};
use notehub_api::storage::Storage;
use notehub_api::token::TokenService;
use notehub_api::{admin, contact, notes, password, profile};
use notehub_db::Database;

/// Request body ceiling; leaves headroom over the per-file upload limit.
const MAX_BODY_SIZE: usize = notes::MAX_FILE_SIZE + 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notehub=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("NOTEHUB_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("NOTEHUB_DB_PATH").unwrap_or_else(|_| "notehub.db".into());
    let upload_dir = std::env::var("NOTEHUB_UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into());
    let host = std::env::var("NOTEHUB_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("NOTEHUB_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let admin_email =
        std::env::var("NOTEHUB_ADMIN_EMAIL").unwrap_or_else(|_| "admin@notehub.app".into());
    let admin_password = std::env::var("NOTEHUB_ADMIN_PASSWORD").unwrap_or_else(|_| {
        warn!("NOTEHUB_ADMIN_PASSWORD is unset; using the development default");
        "admin123".into()
    });

    // Init database, admin principal and blob storage
    let db = Database::open(&PathBuf::from(&db_path))?;
    seed_admin(&db, &admin_email, &admin_password)?;
    let storage = Storage::new(PathBuf::from(&upload_dir)).await?;

    // Shared state; the JWT secret lives only inside the token service.
    let state: AppState = Arc::new(AppStateInner {
        db,
        tokens: TokenService::new(&jwt_secret),
        storage,
    });

    // Routes
    let public_routes = Router::new()
        .route("/api/users/register", post(auth::register))
        .route("/api/users/login", post(auth::login))
        .route("/api/users/contact", post(contact::submit_inquiry))
        .route("/api/admin/login", post(auth::admin_login))
        .route("/api/public/notes", get(admin::list_notes))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/api/users/notes/user/{user_id}", get(notes::list_user_notes))
        .route("/api/users/upload-note", post(notes::upload_note))
        .route("/api/users/notes/trash/{id}", patch(notes::set_trash_status))
        .route("/api/users/notes/{id}", delete(notes::delete_permanently))
        .route("/api/users/notes/trash/empty/{user_id}", delete(notes::empty_trash))
        .route(
            "/api/users/notes/trash/restore-all/{user_id}",
            post(notes::restore_all_trash),
        )
        .route("/api/users/update-profile", post(profile::update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/api/admin/all-users", get(admin::list_users))
        .route("/api/admin/user/{id}", delete(admin::delete_user))
        .route("/api/admin/all-notes", get(admin::list_notes))
        .route("/api/admin/trash-note/{id}", patch(admin::trash_note))
        .route("/api/admin/note-delete/{id}", delete(admin::delete_note))
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/queries", get(admin::list_inquiries))
        .route("/api/admin/query/{id}", delete(admin::delete_inquiry))
        .route("/api/admin/trash-notes", get(admin::list_trash))
        .route("/api/admin/restore-note/{id}", patch(admin::restore_note))
        .route("/api/admin/empty-trash", delete(admin::empty_all_trash))
        .route("/api/admin/restore-all-trash", post(admin::restore_all_trash))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state.clone());

    let app = Router::new()
        .route("/", get(|| async { "NoteHub API server running" }))
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .nest_service("/uploads", ServeDir::new(&upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("NoteHub server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Create the admin principal on first start, hashed like any user
/// credential.
fn seed_admin(db: &Database, email: &str, plain_password: &str) -> anyhow::Result<()> {
    let email = email.trim().to_lowercase();
    if db.get_admin_by_email(&email)?.is_some() {
        return Ok(());
    }

    let hash = password::hash(plain_password)?;
    db.create_admin(&Uuid::new_v4().to_string(), &email, &hash)?;
    info!("Seeded admin principal {}", email);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

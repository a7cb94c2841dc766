use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sharevent_server::config::Config;
use sharevent_server::constants::MAX_PHOTO_SIZE_BYTES;
use sharevent_server::db::create_pool;
use sharevent_server::routes::{
    admin_delete_user, admin_list_users, admin_update_user, create_event, delete_event,
    delete_photo, get_event, get_me, get_photo_raw, health_check, invite_member, join_event,
    leave_event, list_events, list_photos, login, register, remove_member, search_users,
    update_event, update_me, upload_photo,
};
use sharevent_server::storage::PhotoStore;
use sharevent_server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharevent_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ShareVent Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    // Create database connection pool
    let pool = create_pool(&config.database_path).await?;

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    // Open the photo store
    let store = PhotoStore::new(&config.storage_dir).await?;

    // Configure CORS
    let origins = config
        .allowed_origins
        .iter()
        .map(|s| s.parse::<axum::http::HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
        ])
        .allow_headers(Any);

    // Create app state
    let state = AppState {
        pool,
        store,
        config: config.clone(),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/users/me", get(get_me).patch(update_me))
        .route("/api/users/search", get(search_users))
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/api/events/:id/join", post(join_event))
        .route("/api/events/:id/leave", post(leave_event))
        .route("/api/events/:id/members", post(invite_member))
        .route("/api/events/:id/members/:user_id", delete(remove_member))
        .route("/api/events/:id/photos", get(list_photos).post(upload_photo))
        .route("/api/photos/:id", delete(delete_photo))
        .route("/api/photos/:id/raw", get(get_photo_raw))
        .route("/api/admin/users", get(admin_list_users))
        .route(
            "/api/admin/users/:id",
            patch(admin_update_user).delete(admin_delete_user),
        )
        .layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE_BYTES + 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

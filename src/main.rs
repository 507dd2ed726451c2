use axum::{
    Router,
    routing::{get, post, put},
};
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};
use tracing_subscriber::EnvFilter;

use expense_tracker_server::config::Config;
use expense_tracker_server::constants::{SESSION_EXPIRY_DAYS, SESSION_NAME};
use expense_tracker_server::{
    auth, categories, expenses, notifications, settings, storage, transfer,
};

#[tokio::main]
async fn main() {
    // load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("Invalid configuration");
    let storage = storage::build_storage(&config);

    let store = MemoryStore::default();
    // TODO: Consider adding periodic session cleanup for long-running deployments
    // to prevent memory growth with accumulated expired sessions

    let session_layer = SessionManagerLayer::new(store)
        .with_secure(false)
        .with_name(SESSION_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_EXPIRY_DAYS)))
        .with_signed(
            Key::try_from(config.session_secret.as_bytes())
                .expect("Session secret must be at least 64 bytes"),
        );

    let app = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/expenses",
            post(expenses::create_expense).get(expenses::list_expenses),
        )
        .route("/expenses/export", get(transfer::export_expenses))
        .route("/expenses/import", post(transfer::import_expenses))
        .route(
            "/expenses/{id}",
            put(expenses::update_expense).delete(expenses::delete_expense),
        )
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/mark-all-read",
            post(notifications::mark_all_read),
        )
        .route(
            "/categories",
            get(categories::list_categories)
                .post(categories::create_category)
                .put(categories::rename_category)
                .delete(categories::delete_category),
        )
        .layer(session_layer)
        .layer(CorsLayer::very_permissive())
        .with_state(storage);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .expect("Failed to bind server address");
    tracing::info!("Server running on http://{}", bind_address);

    axum::serve(listener, app).await.expect("Server error");
}

use std::sync::Arc;

use janlog::achievement::repository::StoreAchievementRepository;
use janlog::player::repository::StorePlayerRepository;
use janlog::record::repository::StoreRecordRepository;
use janlog::session::repository::StoreSessionRepository;
use janlog::{app, AppState, JsonFileStore, KeyValueStore, NotificationBus};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "janlog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mahjong score-log server");

    let data_dir = std::env::var("JANLOG_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let store: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::open(&data_dir).expect("Failed to open data directory"));
    info!(data_dir = %data_dir, "Using file-backed store");

    // Every collection is loaded once here and written through on each
    // mutation from then on.
    let players = Arc::new(
        StorePlayerRepository::load(Arc::clone(&store))
            .await
            .expect("Failed to load players"),
    );
    let records = Arc::new(
        StoreRecordRepository::load(Arc::clone(&store))
            .await
            .expect("Failed to load game records"),
    );
    let achievements = Arc::new(
        StoreAchievementRepository::load(Arc::clone(&store))
            .await
            .expect("Failed to load achievements"),
    );
    let sessions = Arc::new(
        StoreSessionRepository::load(Arc::clone(&store))
            .await
            .expect("Failed to load sessions"),
    );

    let notifications = NotificationBus::new(64);
    let state = AppState::new(players, records, achievements, sessions, notifications.clone());

    // Mirror every notification into the log until a real frontend
    // subscribes over the API.
    let mut receiver = notifications.subscribe();
    tokio::spawn(async move {
        while let Ok(notification) = receiver.recv().await {
            info!(
                severity = %notification.severity,
                title = %notification.title,
                description = %notification.description,
                "Notification"
            );
        }
    });

    let app = app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind port 3000");
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.expect("Server error");
}

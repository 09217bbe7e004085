use std::sync::Arc;

use timetable::api::router;
use timetable::cache::{MemoryScheduleCache, NoopScheduleCache, ScheduleCache};
use timetable::config::AppConfig;
use timetable::db;
use timetable::schedule::DefaultGroupMapper;
use timetable::state::AppState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "timetable=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    let pool = db::connect(&config.database_url, config.max_connections).await?;

    let cache: Arc<dyn ScheduleCache> = if config.cache_enabled() {
        info!("caching schedule views for {:?}", config.cache_ttl);
        Arc::new(MemoryScheduleCache::new(config.cache_ttl))
    } else {
        info!("schedule view cache disabled");
        Arc::new(NoopScheduleCache)
    };

    let state = AppState::new(pool, cache, Arc::new(DefaultGroupMapper));
    let app = router(state);

    info!("listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

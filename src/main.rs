use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use compass_api::api::{create_router, AppState};
use compass_api::config::Config;
use compass_api::db::{create_pool, create_redis_client, PostgresProfileStore, RedisCache};
use compass_api::services::{CatalogEngine, RecommendationService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Long-lived clients, initialized once and shared for the process lifetime
    let db_pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let redis_client = create_redis_client(&config.redis_url)?;

    let service = RecommendationService::new(
        Arc::new(RedisCache::new(redis_client)),
        Arc::new(PostgresProfileStore::new(db_pool)),
        Arc::new(CatalogEngine::with_default_catalog(
            config.recommendation_limit,
        )),
        config.recommendation_cache_ttl_secs,
    );

    let state = AppState::new(Arc::new(service));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}

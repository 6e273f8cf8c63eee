use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use listenbrainz_recs::{
    api::{create_router, AppState, RecommendationDefaults},
    config::Config,
    db::{create_pool, PgStore},
    services::{
        providers::{ListenBrainzClient, RecommendationTransport},
        EncoderRegistry, RecommendationService,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("listenbrainz_recs=debug,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));

    let transport = Arc::new(ListenBrainzClient::new(config.listenbrainz())?);
    tracing::info!(
        provider = transport.name(),
        api_url = %config.listenbrainz_api_url,
        connect_timeout_secs = config.listenbrainz_connect_timeout_secs,
        read_timeout_secs = config.listenbrainz_read_timeout_secs,
        "Recommendation provider configured"
    );

    let recommendations = RecommendationService::from_stores(
        store.clone(),
        store.clone(),
        store.clone(),
        EncoderRegistry::with_builtin(),
        transport,
    );

    let state = AppState::new(
        Arc::new(recommendations),
        store,
        RecommendationDefaults::from(&config),
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

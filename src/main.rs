use bcra_deudores_api::batch::BatchQueryService;
use bcra_deudores_api::clock::{Clock, SystemClock};
use bcra_deudores_api::config::Config;
use bcra_deudores_api::handlers::AppState;
use bcra_deudores_api::pacing::FixedDelay;
use bcra_deudores_api::registry_client::BcraClient;
use bcra_deudores_api::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the registry client and
/// batch service, then serves the API with per-IP rate limiting.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bcra_deudores_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let client = BcraClient::new(&config, clock.clone())?;
    tracing::info!("✓ BCRA client initialized: {}", config.bcra_base_url);

    let batch = BatchQueryService::new(
        Arc::new(client),
        Arc::new(FixedDelay::new(config.query_delay())),
        clock.clone(),
    );
    tracing::info!(
        "Batch service initialized ({}ms between lookups)",
        config.query_delay_ms
    );

    let app_state = Arc::new(AppState {
        config: config.clone(),
        batch,
        clock,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    // Health check and docs bypass rate limiting
    let api = routes::api_routes().layer(GovernorLayer {
        config: governor_conf,
    });
    let app = routes::app(app_state, api);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

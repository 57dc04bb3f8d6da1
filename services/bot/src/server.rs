use crate::cli::ServeArgs;
use crate::infra::{AppState, PermitService};
use crate::routes::ops_router;
use crate::telegram;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use permesso::config::{AppConfig, BotConfig};
use permesso::error::AppError;
use permesso::telemetry;
use permesso::workflows::permit::{PortalClient, StatusSource};
use std::future::IntoFuture;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use teloxide::Bot;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    let bot_config = BotConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let source: Arc<dyn StatusSource> = Arc::new(PortalClient::new(&config.portal)?);
    let service = Arc::new(PermitService::new(source));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = ops_router(service.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bot = Bot::new(bot_config.token.expose());

    info!(
        ?config.environment,
        %addr,
        portal = %config.portal.base_url,
        timeout_secs = config.portal.timeout.as_secs(),
        "permit status bot starting"
    );

    tokio::select! {
        served = axum::serve(listener, app).into_future() => served?,
        () = telegram::run(bot, service, readiness_flag) => info!("telegram dispatcher stopped"),
    }

    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReportGateway};
use crate::routes::with_travel_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use travel_auth::config::AppConfig;
use travel_auth::error::AppError;
use travel_auth::telemetry;
use travel_auth::workflows::travel::approvals::{ApprovalWorkflow, TravelApi, WorkflowSettings};
use travel_auth::workflows::travel::TravelDocumentExporter;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(InMemoryReportGateway::default());
    let workflow = Arc::new(ApprovalWorkflow::new(
        gateway,
        WorkflowSettings::from_config(&config.travel),
    ));
    let exporter = Arc::new(TravelDocumentExporter::from_config(&config.travel));

    let app = with_travel_routes(TravelApi::new(workflow, exporter))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        page_size = config.travel.page_size,
        logo = config.travel.logo_path.is_some(),
        "travel authorization service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

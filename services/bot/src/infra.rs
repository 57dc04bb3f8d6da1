use metrics_exporter_prometheus::PrometheusHandle;
use permesso::workflows::permit::{PermitCode, PermitStatusService, StatusSource, StatusVerdict};
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Status service over any source; production uses the portal client.
pub(crate) type PermitService = PermitStatusService<Arc<dyn StatusSource>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// JSON shape shared by the HTTP lookup endpoint and `check --json`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PermitStatusView {
    pub(crate) code: String,
    pub(crate) normalized: String,
    pub(crate) status: StatusVerdict,
    pub(crate) title: &'static str,
    pub(crate) description: String,
}

impl PermitStatusView {
    pub(crate) fn new(code: &PermitCode, verdict: StatusVerdict) -> Self {
        Self {
            code: code.raw().to_string(),
            normalized: code.normalized().to_string(),
            status: verdict,
            title: verdict.title(),
            description: verdict.plain_description(),
        }
    }
}

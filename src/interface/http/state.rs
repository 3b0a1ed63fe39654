use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::context::AppContext;
use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
    pub settings: Settings,
    /// Prometheus render handle; `None` when no recorder is installed (tests).
    pub metrics: Option<PrometheusHandle>,
}

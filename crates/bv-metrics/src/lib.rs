//! Prometheus bootstrap for the scoring service. The engine and handlers
//! record through the `metrics` macros; this crate owns the recorder and the
//! scrape endpoint so emission stays decoupled from transport.

use std::env;
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

const PORT_ENV: &str = "BV_METRICS_PORT";
const DEFAULT_PORT: u16 = 9091;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn scrape_port(raw: Option<String>) -> u16 {
    raw.and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Start the scrape endpoint on `0.0.0.0:$BV_METRICS_PORT` (default 9091)
/// and install the global recorder behind it.
///
/// Once installed, the service counters (score computations, risk
/// assessments, match ranking runs, API errors labeled by code) appear on
/// the endpoint as they are incremented. Safe to call again; the recorder
/// installs once per process and later calls return the existing handle.
/// A bind failure is logged and swallowed so a busy port degrades
/// observability, not scoring.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    let port = scrape_port(env::var(PORT_ENV).ok());

    match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install_recorder()
    {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            info!(metrics_port = port, "started prometheus exporter");
            PROMETHEUS_HANDLE.get()
        }
        Err(err) => {
            warn!(error = %err, metrics_port = port, "failed to start prometheus exporter");
            PROMETHEUS_HANDLE.get()
        }
    }
}

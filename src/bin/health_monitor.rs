//! `health-monitor` — one health probe, exit status for uptime tooling.
//!
//! ```text
//! HEALTH_CHECK_URL=https://items.example.com/health health-monitor
//! health-monitor --url http://localhost:5000/health --timeout 5
//! ```
//!
//! Exits 0 when the service reports `status: OK` with a connected database,
//! 1 on anything else.

use clap::Parser;
use items_api::monitor::{HealthMonitor, MonitorError, DEFAULT_HEALTH_CHECK_URL};
use items_api::telemetry::{get_subscriber, init_subscriber};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "health-monitor", version, about = "Probe the item service health endpoint once")]
struct Cli {
    /// Health endpoint to probe
    #[arg(long, env = "HEALTH_CHECK_URL", default_value = DEFAULT_HEALTH_CHECK_URL)]
    url: String,
    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    timeout: u64,
}

async fn probe(cli: Cli) -> Result<(), MonitorError> {
    let monitor = HealthMonitor::new(cli.url, Duration::from_secs(cli.timeout))?;
    let report = monitor.check().await?;
    tracing::info!(url = %monitor.url(), status = %report.status, "Health check passed");

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = get_subscriber("health-monitor".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let cli = Cli::parse();

    match probe(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            ExitCode::FAILURE
        }
    }
}

//! Single-shot client for the health endpoint, meant to be driven by cron or
//! an uptime service. One request, no retries.

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_HEALTH_CHECK_URL: &str = "http://localhost:5000/health";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Health check request timed out")]
    Timeout,
    #[error("Health check request failed: {0}")]
    Request(String),
    #[error("Failed to parse health check response: {0}")]
    Parse(String),
    #[error("Health check failed: status={status}, database={database}")]
    Unhealthy { status: String, database: String },
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// The part of the health payload the monitor cares about. Error payloads
/// carry no `database` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "OK" && self.database.as_deref() == Some("connected")
    }

    fn into_result(self) -> Result<Self, MonitorError> {
        if self.is_healthy() {
            Ok(self)
        } else {
            Err(MonitorError::Unhealthy {
                status: self.status,
                database: self.database.unwrap_or_else(|| "unknown".to_string()),
            })
        }
    }
}

pub struct HealthMonitor {
    client: reqwest::Client,
    url: String,
}

impl HealthMonitor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `Ok` only for `status == "OK"` with a connected database. The HTTP
    /// status code is not consulted; the body decides.
    #[tracing::instrument(name = "Check service health", skip(self), fields(url = %self.url))]
    pub async fn check(&self) -> Result<HealthReport, MonitorError> {
        let body = self.client.get(&self.url).send().await?.text().await?;

        serde_json::from_str::<HealthReport>(&body)
            .map_err(|err| MonitorError::Parse(err.to_string()))?
            .into_result()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum HealthStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

impl From<bool> for DatabaseStatus {
    fn from(connected: bool) -> Self {
        if connected {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

/// Process memory in megabytes, two decimals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MemoryUsage {
    pub used: f64,
    pub total: f64,
}

impl MemoryUsage {
    pub fn from_bytes(used: u64, total: u64) -> Self {
        Self {
            used: megabytes(used),
            total: megabytes(total),
        }
    }
}

fn megabytes(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MEGABYTE * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup.
    pub uptime: f64,
    pub environment: String,
    pub database: DatabaseStatus,
    pub memory: MemoryUsage,
}

/// Body of a 503 from the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthFailure {
    pub status: HealthStatus,
    pub error: String,
}

impl HealthFailure {
    pub fn new(error: String) -> Self {
        Self {
            status: HealthStatus::Error,
            error,
        }
    }
}

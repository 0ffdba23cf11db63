use super::models::{HealthSnapshot, HealthStatus, MemoryUsage};
use crate::db::ItemStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use sysinfo::System;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Memory statistics unavailable: {0}")]
    Memory(String),
}

pub type MemoryProbe = fn() -> Result<MemoryUsage, HealthError>;

/// Builds health snapshots. Cheap to call: the database state comes from the
/// store's local connection flag, never from a query.
pub struct HealthChecker {
    store: Arc<dyn ItemStore>,
    environment: String,
    started_at: DateTime<Utc>,
    memory: MemoryProbe,
}

impl HealthChecker {
    pub fn new(store: Arc<dyn ItemStore>, environment: String) -> Self {
        Self {
            store,
            environment,
            started_at: process_start_time().unwrap_or_else(Utc::now),
            memory: process_memory,
        }
    }

    pub fn with_memory_probe(mut self, probe: MemoryProbe) -> Self {
        self.memory = probe;
        self
    }

    /// Seconds since the process started.
    pub fn uptime(&self) -> f64 {
        let elapsed = Utc::now() - self.started_at;
        (elapsed.num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    #[tracing::instrument(name = "Health report", skip(self))]
    pub fn report(&self) -> Result<HealthSnapshot, HealthError> {
        let memory = (self.memory)()?;

        Ok(HealthSnapshot {
            status: HealthStatus::Ok,
            timestamp: Utc::now(),
            uptime: self.uptime(),
            environment: self.environment.clone(),
            database: self.store.is_connected().into(),
            memory,
        })
    }
}

/// When this process started, to the second.
pub fn process_start_time() -> Option<DateTime<Utc>> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    if !system.refresh_process(pid) {
        return None;
    }

    let started = system.process(pid)?.start_time();
    DateTime::from_timestamp(i64::try_from(started).ok()?, 0)
}

/// Resident (`used`) and virtual (`total`) memory of this process.
pub fn process_memory() -> Result<MemoryUsage, HealthError> {
    let pid = sysinfo::get_current_pid().map_err(|err| HealthError::Memory(err.to_string()))?;

    let mut system = System::new();
    if !system.refresh_process(pid) {
        return Err(HealthError::Memory(format!("process {} not found", pid)));
    }

    system
        .process(pid)
        .map(|process| MemoryUsage::from_bytes(process.memory(), process.virtual_memory()))
        .ok_or_else(|| HealthError::Memory(format!("process {} not found", pid)))
}

mod checks;
mod models;

pub use checks::{process_memory, process_start_time, HealthChecker, HealthError, MemoryProbe};
pub use models::{DatabaseStatus, HealthFailure, HealthSnapshot, HealthStatus, MemoryUsage};

pub mod health_checks;
pub mod item;

pub use health_checks::*;

pub mod configuration;
pub mod db;
pub mod forms;
pub mod health;
mod helpers;
pub mod models;
pub mod monitor;
pub mod routes;
pub mod services;
pub mod startup;
pub mod telemetry;

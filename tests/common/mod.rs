use items_api::configuration::{DatabaseSettings, Settings};
use items_api::db::MemoryItemStore;
use items_api::health::{HealthChecker, MemoryProbe};
use std::net::TcpListener;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryItemStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

pub fn test_settings() -> Settings {
    Settings {
        database: DatabaseSettings {
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            database_name: "items".to_string(),
            max_connections: 5,
        },
        app_port: 0,
        app_host: "127.0.0.1".to_string(),
        environment: "test".to_string(),
    }
}

// the server runs on a random port in the background of the test runtime
pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(MemoryItemStore::new());
    let server = items_api::startup::run(listener, store.clone(), test_settings())
        .await
        .expect("Failed to bind address.");

    let _ = tokio::spawn(server);

    TestApp { address, store }
}

/// Same as [`spawn_app`], with process memory read through `probe`.
#[allow(dead_code)]
pub async fn spawn_app_with_memory_probe(probe: MemoryProbe) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(MemoryItemStore::new());
    let settings = test_settings();
    let checker = HealthChecker::new(store.clone(), settings.environment.clone())
        .with_memory_probe(probe);
    let server = items_api::startup::run_with_checker(listener, store.clone(), checker, settings)
        .await
        .expect("Failed to bind address.");

    let _ = tokio::spawn(server);

    TestApp { address, store }
}

/// A local address nothing listens on.
pub fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

//! Item persistence.
//!
//! The store handle is created once at startup and shared by every request as
//! an `Arc<dyn ItemStore>`. [`PgItemStore`] is the production backend,
//! [`MemoryItemStore`] backs tests and local runs.

use crate::models;
use async_trait::async_trait;
use uuid::Uuid;

pub mod item;
pub mod memory;

pub use item::PgItemStore;
pub use memory::MemoryItemStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store connection error: {0}")]
    Connection(String),
    /// The store was reached but rejected the operation.
    #[error("store query error: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if item::is_connection_error(&err) {
            Self::Connection(err.to_string())
        } else {
            Self::Query(err.to_string())
        }
    }
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, newest first.
    async fn list(&self) -> Result<Vec<models::Item>, StoreError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<models::Item>, StoreError>;

    /// Persists a new item; the store assigns the id and both timestamps.
    async fn insert(&self, fields: models::ItemFields) -> Result<models::Item, StoreError>;

    /// Writes the supplied fields of `patch` in one step and refreshes
    /// `updated_at`; fields left out keep whatever is stored at write time.
    /// `None` when no item has this id.
    async fn update(
        &self,
        id: Uuid,
        patch: models::ItemPatch,
    ) -> Result<Option<models::Item>, StoreError>;

    /// `false` when no item has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Local view of the connection state. Never touches the network.
    fn is_connected(&self) -> bool;
}

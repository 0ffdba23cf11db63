use super::{ItemStore, StoreError};
use crate::models;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Item store kept in process memory. Items are held in insertion order.
pub struct MemoryItemStore {
    items: RwLock<Vec<models::Item>>,
    connected: AtomicBool,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            connected: AtomicBool::new(true),
        }
    }

    /// Simulates losing (or regaining) the backing database. While offline
    /// every operation fails with [`StoreError::Connection`].
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(StoreError::Connection(
                "in-memory store is offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self) -> Result<Vec<models::Item>, StoreError> {
        self.ensure_connected()?;
        let mut items: Vec<models::Item> = self.items.read().await.iter().rev().cloned().collect();
        // stable: equal timestamps keep the later insert first
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<models::Item>, StoreError> {
        self.ensure_connected()?;
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn insert(&self, fields: models::ItemFields) -> Result<models::Item, StoreError> {
        self.ensure_connected()?;
        let now = Utc::now();
        let item = models::Item {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            created_at: now,
            updated_at: now,
        };

        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: models::ItemPatch,
    ) -> Result<Option<models::Item>, StoreError> {
        self.ensure_connected()?;
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };

        item.apply(patch);
        item.updated_at = Utc::now();

        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.ensure_connected()?;
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

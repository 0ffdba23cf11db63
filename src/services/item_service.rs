use super::ItemError;
use crate::db::ItemStore;
use crate::forms::ItemForm;
use crate::models;
use std::sync::Arc;
use uuid::Uuid;

/// CRUD operations over an injected item store.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "List items.", skip(self))]
    pub async fn list(&self) -> Result<Vec<models::Item>, ItemError> {
        Ok(self.store.list().await?)
    }

    #[tracing::instrument(name = "Get item.", skip(self))]
    pub async fn get(&self, id: &str) -> Result<models::Item, ItemError> {
        let id = parse_id(id)?;
        self.store.fetch(id).await?.ok_or(ItemError::NotFound)
    }

    #[tracing::instrument(name = "Create item.", skip(self))]
    pub async fn create(&self, form: ItemForm) -> Result<models::Item, ItemError> {
        let fields = form.into_fields().map_err(ItemError::Validation)?;
        let item = self.store.insert(fields).await?;
        tracing::info!("Created {}", item);

        Ok(item)
    }

    /// Partial update: only the fields present in the form are written, so
    /// concurrent updates to different fields all land.
    #[tracing::instrument(name = "Update item.", skip(self))]
    pub async fn update(&self, id: &str, form: ItemForm) -> Result<models::Item, ItemError> {
        let id = parse_id(id)?;
        let patch = form.into_patch().map_err(ItemError::Validation)?;

        let item = self.store.update(id, patch).await?.ok_or(ItemError::NotFound)?;
        tracing::info!("Updated {}", item);

        Ok(item)
    }

    #[tracing::instrument(name = "Delete item.", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ItemError> {
        let id = parse_id(id)?;
        match self.store.delete(id).await? {
            true => Ok(()),
            false => Err(ItemError::NotFound),
        }
    }
}

fn parse_id(id: &str) -> Result<Uuid, ItemError> {
    Uuid::parse_str(id).map_err(|err| ItemError::Internal(format!("malformed item id {id:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryItemStore, StoreError};
    use async_trait::async_trait;
    use serde_json::json;

    // hands control back to the runtime before every call, like a networked store
    struct YieldingStore(MemoryItemStore);

    #[async_trait]
    impl ItemStore for YieldingStore {
        async fn list(&self) -> Result<Vec<models::Item>, StoreError> {
            tokio::task::yield_now().await;
            self.0.list().await
        }

        async fn fetch(&self, id: Uuid) -> Result<Option<models::Item>, StoreError> {
            tokio::task::yield_now().await;
            self.0.fetch(id).await
        }

        async fn insert(&self, fields: models::ItemFields) -> Result<models::Item, StoreError> {
            tokio::task::yield_now().await;
            self.0.insert(fields).await
        }

        async fn update(
            &self,
            id: Uuid,
            patch: models::ItemPatch,
        ) -> Result<Option<models::Item>, StoreError> {
            tokio::task::yield_now().await;
            self.0.update(id, patch).await
        }

        async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
            tokio::task::yield_now().await;
            self.0.delete(id).await
        }

        fn is_connected(&self) -> bool {
            self.0.is_connected()
        }
    }

    fn service() -> (ItemService, Arc<MemoryItemStore>) {
        let store = Arc::new(MemoryItemStore::new());
        (ItemService::new(store.clone()), store)
    }

    fn form(value: serde_json::Value) -> ItemForm {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_create_writes_nothing() {
        let (service, store) = service();

        let result = service.create(form(json!({"name": "  ", "price": -5}))).await;

        assert!(matches!(result, Err(ItemError::Validation(ref v)) if v.len() == 2));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_returns_created_item() {
        let (service, _) = service();
        let created = service
            .create(form(json!({"name": "Mug", "price": 4.5, "category": "kitchen"})))
            .await
            .unwrap();

        let fetched = service.get(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_unknown_id_creates_nothing() {
        let (service, store) = service();

        let result = service
            .update(&Uuid::new_v4().to_string(), form(json!({"name": "Ghost"})))
            .await;

        assert!(matches!(result, Err(ItemError::NotFound)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_validates_merged_item() {
        let (service, _) = service();
        let created = service.create(form(json!({"name": "Mug"}))).await.unwrap();
        let id = created.id.to_string();

        let result = service.update(&id, form(json!({"price": "free"}))).await;
        assert!(matches!(result, Err(ItemError::Validation(_))));

        let updated = service.update(&id, form(json!({"price": 3}))).await.unwrap();
        assert_eq!(updated.name, "Mug");
        assert_eq!(updated.price, Some(3.0));
    }

    #[tokio::test]
    async fn test_concurrent_updates_of_different_fields_both_land() {
        let service = ItemService::new(Arc::new(YieldingStore(MemoryItemStore::new())));
        let created = service
            .create(form(json!({"name": "Mug", "price": 4, "category": "old"})))
            .await
            .unwrap();
        let id = created.id.to_string();

        let (by_price, by_category) = tokio::join!(
            service.update(&id, form(json!({"price": 99}))),
            service.update(&id, form(json!({"category": "new"}))),
        );
        assert!(by_price.is_ok());
        assert!(by_category.is_ok());

        let stored = service.get(&id).await.unwrap();
        assert_eq!(stored.price, Some(99.0));
        assert_eq!(stored.category.as_deref(), Some("new"));
        assert_eq!(stored.name, "Mug");
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_item_untouched() {
        let (service, _) = service();
        let created = service
            .create(form(json!({"name": "Mug", "price": 4})))
            .await
            .unwrap();
        let id = created.id.to_string();

        let result = service
            .update(&id, form(json!({"name": "Cup", "price": -1})))
            .await;
        assert!(matches!(result, Err(ItemError::Validation(ref v)) if v.len() == 1));
        assert_eq!(service.get(&id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (service, _) = service();
        let created = service.create(form(json!({"name": "Mug"}))).await.unwrap();
        let id = created.id.to_string();

        assert!(service.delete(&id).await.is_ok());
        assert!(matches!(service.delete(&id).await, Err(ItemError::NotFound)));
        assert!(matches!(service.get(&id).await, Err(ItemError::NotFound)));
    }

    #[tokio::test]
    async fn test_malformed_id_is_internal() {
        let (service, _) = service();
        assert!(matches!(
            service.get("not-an-id").await,
            Err(ItemError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_store_outage_is_internal() {
        let (service, store) = service();
        store.set_connected(false);

        assert!(matches!(service.list().await, Err(ItemError::Internal(_))));
    }
}

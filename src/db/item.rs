use super::{ItemStore, StoreError};
use crate::models;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

/// How often the heartbeat probes the database.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

const ITEM_COLUMNS: &str = "id, name, description, price, category, created_at, updated_at";

pub(crate) fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// PostgreSQL backed item store.
///
/// Keeps a connection flag that follows the outcome of the last query and of
/// a background heartbeat, so the health endpoint can report the database
/// state without a round trip.
pub struct PgItemStore {
    pool: PgPool,
    connected: AtomicBool,
}

impl PgItemStore {
    /// The pool is expected to be connected already.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            connected: AtomicBool::new(true),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs `SELECT 1` and records the outcome in the connection flag.
    pub async fn ping(&self) -> bool {
        let result = sqlx::query::<sqlx::Postgres>("SELECT 1").execute(&self.pool).await;
        let connected = result.is_ok();
        let was_connected = self.connected.swap(connected, Ordering::Relaxed);

        match result {
            Err(err) if was_connected => {
                tracing::warn!("Database heartbeat failed: {:?}", err);
            }
            Ok(_) if !was_connected => {
                tracing::info!("Database connection restored");
            }
            _ => {}
        }

        connected
    }

    /// Pings the database every `period` until the pool is closed.
    pub fn spawn_heartbeat(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if self.pool.is_closed() {
                    tracing::info!("Database pool closed, stopping heartbeat");
                    break;
                }
                self.ping().await;
            }
        })
    }

    fn track<T>(&self, result: Result<T, sqlx::Error>) -> Result<T, StoreError> {
        match result {
            Ok(value) => {
                self.connected.store(true, Ordering::Relaxed);
                Ok(value)
            }
            Err(err) => {
                if is_connection_error(&err) {
                    tracing::warn!("Lost connection to the database: {:?}", err);
                    self.connected.store(false, Ordering::Relaxed);
                }
                tracing::error!("Failed to execute query: {:?}", err);
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list(&self) -> Result<Vec<models::Item>, StoreError> {
        let query_span = tracing::info_span!("Fetch all items.");
        let result = sqlx::query_as::<_, models::Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM item ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await;

        self.track(result)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<models::Item>, StoreError> {
        tracing::info!("Fetch item {}", id);
        let result = sqlx::query_as::<_, models::Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM item WHERE id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        self.track(result)
    }

    async fn insert(&self, fields: models::ItemFields) -> Result<models::Item, StoreError> {
        let query_span = tracing::info_span!("Saving new item into the database");
        let now = Utc::now();
        let result = sqlx::query_as::<_, models::Item>(&format!(
            r#"
            INSERT INTO item (id, name, description, price, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.price)
        .bind(fields.category)
        .bind(now)
        .fetch_one(&self.pool)
        .instrument(query_span)
        .await;

        self.track(result)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: models::ItemPatch,
    ) -> Result<Option<models::Item>, StoreError> {
        let query_span = tracing::info_span!("Updating item", %id);
        let result = sqlx::query_as::<_, models::Item>(&format!(
            r#"
            UPDATE item
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                updated_at = $6
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.category)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await;

        self.track(result)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        tracing::info!("Delete item {}", id);
        let result = sqlx::query::<sqlx::Postgres>("DELETE FROM item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected() > 0);

        self.track(result)
    }

    fn is_connected(&self) -> bool {
        !self.pool.is_closed() && self.connected.load(Ordering::Relaxed)
    }
}

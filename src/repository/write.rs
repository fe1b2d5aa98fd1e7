use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::domain::Subscription;
use crate::errors::SubscriptionError;

/// Write-only port over the subscription store. Partial-update merging is
/// the command service's responsibility; `update` replaces the full row.
#[async_trait]
pub trait SubscriptionWriteRepository: Send + Sync {
    async fn create(
        &self,
        service_name: &str,
        price: i32,
        user_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Subscription, SubscriptionError>;
    async fn update(&self, subscription: &Subscription) -> Result<(), SubscriptionError>;
    /// Soft-deletes by id. A missing id is a silent no-op here; existence
    /// is checked by the command service.
    async fn delete(&self, id: i64) -> Result<(), SubscriptionError>;
}

pub struct PostgresSubscriptionWriteRepository {
    pool: Pool<Postgres>,
}

impl PostgresSubscriptionWriteRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionWriteRepository for PostgresSubscriptionWriteRepository {
    #[tracing::instrument(name = "Saving a new subscription in the store", skip(self))]
    async fn create(
        &self,
        service_name: &str,
        price: i32,
        user_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Subscription, SubscriptionError> {
        let now = Utc::now();

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
                INSERT INTO subscriptions
                    (service_name, price, user_id, start_date, end_date, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $6)
                RETURNING id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(service_name)
        .bind(price)
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            tracing::error!("Failed to execute query: {:?}", error);
            error
        })?;

        Ok(subscription)
    }

    #[tracing::instrument(
        name = "Replacing a subscription in the store",
        skip(self, subscription),
        fields(id = subscription.id),
    )]
    async fn update(&self, subscription: &Subscription) -> Result<(), SubscriptionError> {
        sqlx::query(
            r#"
                UPDATE subscriptions
                SET service_name = $2, price = $3, start_date = $4, end_date = $5, updated_at = $6
                WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(subscription.id)
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            tracing::error!("Failed to execute query: {:?}", error);
            error
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Soft-deleting a subscription", skip(self))]
    async fn delete(&self, id: i64) -> Result<(), SubscriptionError> {
        sqlx::query(
            r#"
                UPDATE subscriptions
                SET deleted_at = $2
                WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            tracing::error!("Failed to execute query: {:?}", error);
            error
        })?;

        Ok(())
    }
}

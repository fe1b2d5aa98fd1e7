use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::domain::Subscription;
use crate::errors::SubscriptionError;

/// Read-only port over the subscription store. Not-found is `None`,
/// distinct from a failed query.
#[async_trait]
pub trait SubscriptionReadRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>, SubscriptionError>;
    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<Subscription>, SubscriptionError>;
    async fn get_all(&self) -> Result<Vec<Subscription>, SubscriptionError>;
    /// Sums `price` over rows whose `start_date` falls within the inclusive
    /// `[start_date, end_date]` range, optionally narrowed by user and
    /// service name. Returns 0 when nothing matches.
    async fn sum_price_by_filter(
        &self,
        user_id: Option<&str>,
        service_name: Option<&str>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<i64, SubscriptionError>;
}

pub struct PostgresSubscriptionReadRepository {
    pool: Pool<Postgres>,
}

impl PostgresSubscriptionReadRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn parse_user_id(user_id: &str) -> Result<Uuid, SubscriptionError> {
    Uuid::parse_str(user_id)
        .map_err(|_| SubscriptionError::Validation(format!("{} is not a valid user id", user_id)))
}

#[async_trait]
impl SubscriptionReadRepository for PostgresSubscriptionReadRepository {
    #[tracing::instrument(name = "Fetching a subscription by id", skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>, SubscriptionError> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
                SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
                FROM subscriptions
                WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            tracing::error!("Failed to execute query: {:?}", error);
            error
        })?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Fetching subscriptions by user id", skip(self))]
    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<Subscription>, SubscriptionError> {
        let user_id = parse_user_id(user_id)?;

        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
                SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
                FROM subscriptions
                WHERE user_id = $1 AND deleted_at IS NULL
                ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            tracing::error!("Failed to execute query: {:?}", error);
            error
        })?;

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Fetching all subscriptions", skip(self))]
    async fn get_all(&self) -> Result<Vec<Subscription>, SubscriptionError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
                SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
                FROM subscriptions
                WHERE deleted_at IS NULL
                ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            tracing::error!("Failed to execute query: {:?}", error);
            error
        })?;

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Summing subscription prices by filter", skip(self))]
    async fn sum_price_by_filter(
        &self,
        user_id: Option<&str>,
        service_name: Option<&str>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<i64, SubscriptionError> {
        let user_id = user_id.map(parse_user_id).transpose()?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COALESCE(SUM(price), 0)
                FROM subscriptions
                WHERE deleted_at IS NULL
                  AND start_date >= $1 AND start_date <= $2
                  AND ($3::uuid IS NULL OR user_id = $3)
                  AND ($4::varchar IS NULL OR service_name = $4)
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .bind(user_id)
        .bind(service_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            tracing::error!("Failed to execute query: {:?}", error);
            error
        })?;

        Ok(total)
    }
}

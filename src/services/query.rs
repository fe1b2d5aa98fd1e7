use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::Subscription;
use crate::errors::SubscriptionError;
use crate::repository::SubscriptionReadRepository;
use crate::services::SubscriptionResponse;

/// Read-side service: fetches through the read repository and maps rows
/// into response shapes. Carries no business rules of its own.
#[derive(Clone)]
pub struct SubscriptionQueryService {
    read_repository: Arc<dyn SubscriptionReadRepository>,
}

impl SubscriptionQueryService {
    pub fn new(read_repository: Arc<dyn SubscriptionReadRepository>) -> Self {
        Self { read_repository }
    }

    pub async fn get_by_id(
        &self,
        id: i64,
    ) -> Result<Option<SubscriptionResponse>, SubscriptionError> {
        let subscription = self.read_repository.get_by_id(id).await?;

        Ok(subscription.map(SubscriptionResponse::from))
    }

    /// Current-state read for the command service, which merges patches
    /// against the stored row rather than its external projection.
    pub(crate) async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Subscription>, SubscriptionError> {
        self.read_repository.get_by_id(id).await
    }

    pub async fn get_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<SubscriptionResponse>, SubscriptionError> {
        let subscriptions = self.read_repository.get_by_user_id(user_id).await?;

        Ok(subscriptions
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect())
    }

    pub async fn get_all(&self) -> Result<Vec<SubscriptionResponse>, SubscriptionError> {
        let subscriptions = self.read_repository.get_all().await?;

        Ok(subscriptions
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect())
    }

    pub async fn sum_price_by_filter(
        &self,
        user_id: Option<&str>,
        service_name: Option<&str>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<f64, SubscriptionError> {
        let total = self
            .read_repository
            .sum_price_by_filter(user_id, service_name, start_date, end_date)
            .await?;

        Ok(total as f64)
    }
}

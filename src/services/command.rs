use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{NewSubscription, SubscriptionPatch};
use crate::errors::SubscriptionError;
use crate::repository::SubscriptionWriteRepository;
use crate::services::{SubscriptionQueryService, SubscriptionResponse};

/// Write-side service: the owner of the date-ordering rule and the
/// partial-update merge. Reads current state through the query service
/// before any update or delete.
#[derive(Clone)]
pub struct SubscriptionCommandService {
    write_repository: Arc<dyn SubscriptionWriteRepository>,
    queries: SubscriptionQueryService,
}

impl SubscriptionCommandService {
    pub fn new(
        write_repository: Arc<dyn SubscriptionWriteRepository>,
        queries: SubscriptionQueryService,
    ) -> Self {
        Self {
            write_repository,
            queries,
        }
    }

    pub async fn create(
        &self,
        new_subscription: NewSubscription,
    ) -> Result<SubscriptionResponse, SubscriptionError> {
        validate_period(new_subscription.start_date, new_subscription.end_date)?;

        let created = self
            .write_repository
            .create(
                new_subscription.service_name.as_ref(),
                // Fractional currency is not supported; the fraction is dropped.
                new_subscription.price as i32,
                new_subscription.user_id,
                new_subscription.start_date,
                new_subscription.end_date,
            )
            .await?;

        Ok(created.into())
    }

    pub async fn update(
        &self,
        id: i64,
        patch: SubscriptionPatch,
    ) -> Result<SubscriptionResponse, SubscriptionError> {
        let current = self
            .queries
            .find_by_id(id)
            .await?
            .ok_or(SubscriptionError::NotFound)?;

        let mut merged = current.merged_with(&patch);
        // A patched start_date alone can invalidate a previously valid
        // end_date, so the merged pair is what gets checked.
        validate_period(merged.start_date, merged.end_date)?;

        merged.updated_at = Utc::now();
        self.write_repository.update(&merged).await?;

        Ok(merged.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), SubscriptionError> {
        self.queries
            .find_by_id(id)
            .await?
            .ok_or(SubscriptionError::NotFound)?;

        self.write_repository.delete(id).await
    }
}

fn validate_period(
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
) -> Result<(), SubscriptionError> {
    match end_date {
        Some(end_date) if end_date < start_date => Err(SubscriptionError::Validation(
            "end_date cannot be before start_date".to_string(),
        )),
        _ => Ok(()),
    }
}

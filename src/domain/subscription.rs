use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::service_name::ServiceName;

/// A subscription row as persisted in the store. Soft-deleted rows never
/// surface here; the repositories filter them out.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Subscription {
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a subscription. The price is still
/// floating-point at this stage; the command service truncates it to whole
/// currency units before it reaches the store.
#[derive(Debug)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: f64,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A partial update. `None` leaves the current value in place. There is no
/// way to clear an existing `end_date`: absent and "clear" are
/// indistinguishable in this shape.
#[derive(Debug, Default)]
pub struct SubscriptionPatch {
    pub service_name: Option<ServiceName>,
    pub price: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Resolves each field of a partial update against the current row:
    /// a supplied value wins, anything absent keeps its current value.
    /// `user_id` and `created_at` are never patchable.
    pub fn merged_with(&self, patch: &SubscriptionPatch) -> Subscription {
        Subscription {
            id: self.id,
            service_name: patch
                .service_name
                .as_ref()
                .map(|name| name.as_ref().to_owned())
                .unwrap_or_else(|| self.service_name.clone()),
            price: patch.price.map(|price| price as i32).unwrap_or(self.price),
            user_id: self.user_id,
            start_date: patch.start_date.unwrap_or(self.start_date),
            end_date: patch.end_date.or(self.end_date),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

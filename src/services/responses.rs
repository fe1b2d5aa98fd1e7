use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Subscription;

/// External projection of a subscription. The store keeps `price` as whole
/// currency units; consumers see it as a float.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub service_name: String,
    pub price: f64,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            service_name: subscription.service_name,
            price: f64::from(subscription.price),
            user_id: subscription.user_id,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

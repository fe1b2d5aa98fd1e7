mod service_name;
mod subscription;

pub use service_name::ServiceName;
pub use subscription::{NewSubscription, Subscription, SubscriptionPatch};

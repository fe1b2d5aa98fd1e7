mod read;
mod write;

pub use read::{PostgresSubscriptionReadRepository, SubscriptionReadRepository};
pub use write::{PostgresSubscriptionWriteRepository, SubscriptionWriteRepository};

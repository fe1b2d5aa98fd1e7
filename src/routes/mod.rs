mod health_check;
mod subscriptions;

pub use health_check::check_health;
pub use subscriptions::{
    create_subscription, delete_subscription, get_all_subscriptions, get_subscription,
    get_subscriptions_by_user, sum_subscription_prices, update_subscription,
};

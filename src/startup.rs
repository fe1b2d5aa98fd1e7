use std::sync::Arc;

use axum::extract::{FromRef, MatchedPath};
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::configuration::Settings;
use crate::repository::{PostgresSubscriptionReadRepository, PostgresSubscriptionWriteRepository};
use crate::routes::{
    check_health, create_subscription, delete_subscription, get_all_subscriptions,
    get_subscription, get_subscriptions_by_user, sum_subscription_prices, update_subscription,
};
use crate::services::{SubscriptionCommandService, SubscriptionQueryService};

#[derive(Clone)]
pub struct AppState {
    pub query_service: SubscriptionQueryService,
    pub command_service: SubscriptionCommandService,
}

impl AppState {
    pub fn new(
        query_service: SubscriptionQueryService,
        command_service: SubscriptionCommandService,
    ) -> Self {
        Self {
            query_service,
            command_service,
        }
    }
}

impl FromRef<AppState> for SubscriptionQueryService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.query_service.clone()
    }
}

impl FromRef<AppState> for SubscriptionCommandService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.command_service.clone()
    }
}

pub async fn get_app_state(configuration: &Settings) -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy(configuration.database.connection_string().expose_secret())
        .expect("Failed to create a database connection pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate the database");

    let read_repository = Arc::new(PostgresSubscriptionReadRepository::new(pool.clone()));
    let write_repository = Arc::new(PostgresSubscriptionWriteRepository::new(pool));

    let query_service = SubscriptionQueryService::new(read_repository);
    let command_service = SubscriptionCommandService::new(write_repository, query_service.clone());

    AppState::new(query_service, command_service)
}

pub async fn run(listener: TcpListener, app_state: AppState) {
    let app = router(app_state);

    axum::serve(listener, app)
        .await
        .expect("Failed to start up the application")
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/subscriptions",
            get(get_all_subscriptions).post(create_subscription),
        )
        .route("/subscriptions/sum", get(sum_subscription_prices))
        .route("/subscriptions/user/:user_id", get(get_subscriptions_by_user))
        .route(
            "/subscriptions/:id",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .with_state(app_state)
        .route("/health_check", get(check_health))
        .layer(
            // Refer to https://github.com/tokio-rs/axum/blob/main/examples/tracing-aka-logging/Cargo.toml
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);
                tracing::info_span!(
                    "Starting HTTP request",
                    method = ?request.method(),
                    path,
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
}

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{NewSubscription, ServiceName, SubscriptionPatch};
use crate::errors::SubscriptionError;
use crate::services::{SubscriptionCommandService, SubscriptionQueryService, SubscriptionResponse};

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    service_name: String,
    price: f64,
    user_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
}

impl TryFrom<CreateSubscriptionRequest> for NewSubscription {
    type Error = SubscriptionError;

    fn try_from(request: CreateSubscriptionRequest) -> Result<Self, Self::Error> {
        let service_name =
            ServiceName::parse(request.service_name).map_err(SubscriptionError::Validation)?;
        validate_price(request.price)?;

        Ok(Self {
            service_name,
            price: request.price,
            user_id: request.user_id,
            start_date: request.start_date,
            end_date: request.end_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    service_name: Option<String>,
    price: Option<f64>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl TryFrom<UpdateSubscriptionRequest> for SubscriptionPatch {
    type Error = SubscriptionError;

    fn try_from(request: UpdateSubscriptionRequest) -> Result<Self, Self::Error> {
        // An empty service_name reads as "leave unchanged", same as absent.
        let service_name = match request.service_name {
            Some(name) if !name.is_empty() => {
                Some(ServiceName::parse(name).map_err(SubscriptionError::Validation)?)
            }
            _ => None,
        };
        if let Some(price) = request.price {
            validate_price(price)?;
        }

        Ok(Self {
            service_name,
            price: request.price,
            start_date: request.start_date,
            end_date: request.end_date,
        })
    }
}

fn validate_price(price: f64) -> Result<(), SubscriptionError> {
    if price > 0.0 {
        Ok(())
    } else {
        Err(SubscriptionError::Validation(
            "price must be greater than zero".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryParameters {
    user_id: Option<String>,
    service_name: Option<String>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

#[tracing::instrument(name = "Listing all subscriptions", skip(query_service))]
pub async fn get_all_subscriptions(
    State(query_service): State<SubscriptionQueryService>,
) -> Result<Json<Vec<SubscriptionResponse>>, SubscriptionError> {
    let subscriptions = query_service.get_all().await?;

    Ok(Json(subscriptions))
}

#[tracing::instrument(name = "Fetching a subscription", skip(query_service))]
pub async fn get_subscription(
    State(query_service): State<SubscriptionQueryService>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionResponse>, SubscriptionError> {
    let subscription = query_service
        .get_by_id(id)
        .await?
        .ok_or(SubscriptionError::NotFound)?;

    Ok(Json(subscription))
}

#[tracing::instrument(name = "Listing subscriptions of a user", skip(query_service))]
pub async fn get_subscriptions_by_user(
    State(query_service): State<SubscriptionQueryService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SubscriptionResponse>>, SubscriptionError> {
    let subscriptions = query_service.get_by_user_id(&user_id).await?;

    Ok(Json(subscriptions))
}

#[tracing::instrument(name = "Summing subscription prices", skip(query_service, parameters))]
pub async fn sum_subscription_prices(
    State(query_service): State<SubscriptionQueryService>,
    Query(parameters): Query<SummaryParameters>,
) -> Result<Json<serde_json::Value>, SubscriptionError> {
    // Empty query values behave like absent filters.
    let user_id = parameters.user_id.as_deref().filter(|value| !value.is_empty());
    let service_name = parameters
        .service_name
        .as_deref()
        .filter(|value| !value.is_empty());

    let total = query_service
        .sum_price_by_filter(
            user_id,
            service_name,
            parameters.start_date,
            parameters.end_date,
        )
        .await?;

    Ok(Json(json!({ "total_price": total })))
}

#[tracing::instrument(
    name = "Creating a new subscription",
    skip(command_service, body),
    fields(
        user_id = %body.user_id,
        service_name = %body.service_name,
    ),
)]
pub async fn create_subscription(
    State(command_service): State<SubscriptionCommandService>,
    Json(body): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), SubscriptionError> {
    let new_subscription = body.try_into()?;
    let created = command_service.create(new_subscription).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(name = "Updating a subscription", skip(command_service, body))]
pub async fn update_subscription(
    State(command_service): State<SubscriptionCommandService>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, SubscriptionError> {
    let patch = body.try_into()?;
    let updated = command_service.update(id, patch).await?;

    Ok(Json(updated))
}

#[tracing::instrument(name = "Deleting a subscription", skip(command_service))]
pub async fn delete_subscription(
    State(command_service): State<SubscriptionCommandService>,
    Path(id): Path<i64>,
) -> Result<StatusCode, SubscriptionError> {
    command_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

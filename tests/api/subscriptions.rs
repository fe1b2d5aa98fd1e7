use std::sync::atomic::Ordering;

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::App;

#[tokio::test]
async fn create_returns_201_and_truncates_the_price() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "price": 15.9,
        "user_id": Uuid::new_v4(),
        "start_date": "2024-01-01T00:00:00Z",
    });

    let response = app.post_subscriptions(&body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(created["service_name"], "Netflix");
    assert_eq!(created["price"].as_f64(), Some(15.0));

    let rows = app.store.rows.lock().unwrap();
    assert_eq!(rows[0].subscription.price, 15);
}

#[tokio::test]
async fn create_returns_400_when_end_date_is_before_start_date() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "price": 15.9,
        "user_id": Uuid::new_v4(),
        "start_date": "2024-06-01T00:00:00Z",
        "end_date": "2024-01-01T00:00:00Z",
    });

    let response = app.post_subscriptions(&body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(error["error"], "end_date cannot be before start_date");
}

#[tokio::test]
async fn create_returns_400_for_an_invalid_body() {
    let app = App::new().await;
    let test_cases = [
        json!({
            "service_name": "N",
            "price": 10,
            "user_id": Uuid::new_v4(),
            "start_date": "2024-01-01T00:00:00Z",
        }),
        json!({
            "service_name": "Netflix",
            "price": 0,
            "user_id": Uuid::new_v4(),
            "start_date": "2024-01-01T00:00:00Z",
        }),
        json!({
            "service_name": "Netflix",
            "price": -4.5,
            "user_id": Uuid::new_v4(),
            "start_date": "2024-01-01T00:00:00Z",
        }),
    ];

    for body in test_cases {
        let response = app.post_subscriptions(&body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn create_returns_422_when_attributes_are_missing() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "user_id": Uuid::new_v4(),
    });

    let response = app.post_subscriptions(&body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_all_returns_every_live_subscription() {
    let app = App::new().await;
    for service_name in ["Netflix", "Spotify"] {
        let body = json!({
            "service_name": service_name,
            "price": 10,
            "user_id": Uuid::new_v4(),
            "start_date": "2024-01-01T00:00:00Z",
        });
        app.post_subscriptions(&body).await;
    }

    let response = app.get_subscriptions().await;

    assert_eq!(response.status(), StatusCode::OK);
    let subscriptions = response.json::<Vec<serde_json::Value>>().await.unwrap();
    assert_eq!(subscriptions.len(), 2);
}

#[tokio::test]
async fn get_by_id_returns_the_subscription() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "price": 15.9,
        "user_id": Uuid::new_v4(),
        "start_date": "2024-01-01T00:00:00Z",
    });
    let created = app
        .post_subscriptions(&body)
        .await
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let response = app.get_subscription(&created["id"].to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["service_name"], "Netflix");
}

#[tokio::test]
async fn get_by_id_returns_404_for_a_missing_subscription() {
    let app = App::new().await;

    let response = app.get_subscription("999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_by_id_returns_400_for_a_non_numeric_id() {
    let app = App::new().await;

    let response = app.get_subscription("not-a-number").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_by_user_returns_only_that_users_subscriptions() {
    let app = App::new().await;
    let user_id = Uuid::new_v4();
    for (owner, service_name) in [(user_id, "Netflix"), (Uuid::new_v4(), "Spotify")] {
        let body = json!({
            "service_name": service_name,
            "price": 10,
            "user_id": owner,
            "start_date": "2024-01-01T00:00:00Z",
        });
        app.post_subscriptions(&body).await;
    }

    let response = app.get_subscriptions_by_user(&user_id.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let subscriptions = response.json::<Vec<serde_json::Value>>().await.unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0]["service_name"], "Netflix");
}

#[tokio::test]
async fn get_by_user_returns_400_for_a_malformed_user_id() {
    let app = App::new().await;

    let response = app.get_subscriptions_by_user("not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_patches_only_the_supplied_fields() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "price": 15.9,
        "user_id": Uuid::new_v4(),
        "start_date": "2024-01-01T00:00:00Z",
    });
    let created = app
        .post_subscriptions(&body)
        .await
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let response = app
        .put_subscription(&created["id"].to_string(), &json!({ "price": 20 }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(updated["price"].as_f64(), Some(20.0));
    assert_eq!(updated["service_name"], "Netflix");
    assert_eq!(updated["user_id"], created["user_id"]);
}

#[tokio::test]
async fn update_treats_an_empty_service_name_as_unchanged() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "price": 10,
        "user_id": Uuid::new_v4(),
        "start_date": "2024-01-01T00:00:00Z",
    });
    let created = app
        .post_subscriptions(&body)
        .await
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let response = app
        .put_subscription(&created["id"].to_string(), &json!({ "service_name": "" }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(updated["service_name"], "Netflix");
}

#[tokio::test]
async fn update_returns_400_when_the_merged_dates_conflict() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "price": 10,
        "user_id": Uuid::new_v4(),
        "start_date": "2024-01-01T00:00:00Z",
        "end_date": "2024-06-01T00:00:00Z",
    });
    let created = app
        .post_subscriptions(&body)
        .await
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let response = app
        .put_subscription(
            &created["id"].to_string(),
            &json!({ "start_date": "2024-12-01T00:00:00Z" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.store.update_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_returns_404_for_a_missing_subscription() {
    let app = App::new().await;

    let response = app.put_subscription("999", &json!({ "price": 20 })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.update_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_returns_204_and_hides_the_subscription_from_reads() {
    let app = App::new().await;
    let body = json!({
        "service_name": "Netflix",
        "price": 10,
        "user_id": Uuid::new_v4(),
        "start_date": "2024-01-01T00:00:00Z",
    });
    let created = app
        .post_subscriptions(&body)
        .await
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let id = created["id"].to_string();

    let response = app.delete_subscription(&id).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        app.get_subscription(&id).await.status(),
        StatusCode::NOT_FOUND
    );

    // the row is retained, only marked
    let rows = app.store.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].deleted_at.is_some());
}

#[tokio::test]
async fn delete_returns_404_for_a_missing_subscription() {
    let app = App::new().await;

    let response = app.delete_subscription("999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.delete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_returns_400_for_a_non_numeric_id() {
    let app = App::new().await;

    let response = app.delete_subscription("not-a-number").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

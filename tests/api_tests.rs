use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use vidrec_api::api::{create_router, AppState};

fn create_test_server() -> TestServer {
    let state = AppState::default();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

async fn create_user(server: &TestServer, categories: &[&str]) -> String {
    let response = server
        .post("/users")
        .json(&json!({ "preferred_categories": categories }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let user: serde_json::Value = response.json();
    user["user_id"].as_str().unwrap().to_string()
}

async fn create_channel(server: &TestServer) -> String {
    let response = server
        .post("/channels")
        .json(&json!({ "name": "lofi beats", "description": "24/7 study music" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let channel: serde_json::Value = response.json();
    channel["id"].as_str().unwrap().to_string()
}

async fn create_video(
    server: &TestServer,
    channel_id: &str,
    category: &str,
    views: u64,
    extra: serde_json::Value,
) -> String {
    let mut body = json!({
        "channel_id": channel_id,
        "title": format!("{category} video"),
        "category": category,
        "language": "en",
        "views": views,
    });
    if let Some(extra) = extra.as_object() {
        for (key, value) in extra {
            body[key] = value.clone();
        }
    }
    let response = server.post("/videos").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    let video: serde_json::Value = response.json();
    video["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_update_preferences() {
    let server = create_test_server();
    let user_id = create_user(&server, &[]).await;

    let response = server
        .put(&format!("/users/{user_id}/preferences"))
        .json(&json!({
            "preferred_categories": ["music"],
            "watch_history_enabled": false
        }))
        .await;
    response.assert_status_ok();

    let profile: serde_json::Value = response.json();
    assert_eq!(profile["preferred_categories"], json!(["music"]));
    assert_eq!(profile["watch_history_enabled"], json!(false));
}

#[tokio::test]
async fn test_update_preferences_rejects_unknown_field() {
    let server = create_test_server();
    let user_id = create_user(&server, &[]).await;

    let response = server
        .put(&format!("/users/{user_id}/preferences"))
        .json(&json!({ "favorite_color": "green" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "favorite_color");
}

#[tokio::test]
async fn test_update_preferences_unknown_user() {
    let server = create_test_server();
    let response = server
        .put("/users/00000000-0000-0000-0000-000000000000/preferences")
        .json(&json!({ "preferred_categories": ["music"] }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_based_recommendations() {
    let server = create_test_server();
    let channel_id = create_channel(&server).await;

    create_video(&server, &channel_id, "music", 50, json!({})).await;
    create_video(&server, &channel_id, "music", 10, json!({})).await;
    create_video(&server, &channel_id, "music", 30, json!({})).await;
    // Private video with huge view count must never surface
    create_video(&server, &channel_id, "music", 1000, json!({ "status": "private" })).await;

    let user_id = create_user(&server, &["music"]).await;

    let response = server
        .get(&format!(
            "/recommendations/{user_id}?algorithm=content-based&limit=2"
        ))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["algorithm"], "content-based");
    assert_eq!(body["count"], 2);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["video"]["views"], 50);
    assert_eq!(items[1]["video"]["views"], 30);
    assert_eq!(items[0]["position"], 1);
    assert_eq!(items[1]["position"], 2);
    assert_eq!(items[0]["video"]["channel"]["name"], "lofi beats");
}

#[tokio::test]
async fn test_unknown_algorithm_is_rejected() {
    let server = create_test_server();
    let user_id = create_user(&server, &[]).await;

    let response = server
        .get(&format!("/recommendations/{user_id}?algorithm=random"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "algorithm");
}

#[tokio::test]
async fn test_recommendations_unknown_user() {
    let server = create_test_server();
    let response = server
        .get("/recommendations/00000000-0000-0000-0000-000000000000")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collaborative_with_no_watch_events() {
    let server = create_test_server();
    let user_id = create_user(&server, &[]).await;

    let response = server
        .get(&format!(
            "/recommendations/{user_id}?algorithm=collaborative&limit=10"
        ))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_hybrid_has_no_duplicates_and_respects_limit() {
    let server = create_test_server();
    let channel_id = create_channel(&server).await;
    let user_id = create_user(&server, &[]).await;
    let peer_id = create_user(&server, &[]).await;

    let mut video_ids = Vec::new();
    for views in [100, 80, 60, 40, 20] {
        video_ids.push(create_video(&server, &channel_id, "music", views, json!({})).await);
    }
    // Peer watches everything, so collaborative overlaps content-based
    for video_id in &video_ids {
        let response = server
            .post(&format!("/videos/{video_id}/watch"))
            .json(&json!({
                "user_id": peer_id,
                "watch_time_secs": 120,
                "watch_percentage": 90.0,
                "completed": true
            }))
            .await;
        response.assert_status_ok();
    }

    let response = server
        .get(&format!("/recommendations/{user_id}?algorithm=hybrid&limit=4"))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert!(items.len() <= 4);

    let mut seen = std::collections::HashSet::new();
    for item in items {
        assert!(seen.insert(item["video"]["id"].as_str().unwrap().to_string()));
    }
}

#[tokio::test]
async fn test_watch_event_same_day_merge() {
    let server = create_test_server();
    let channel_id = create_channel(&server).await;
    let user_id = create_user(&server, &[]).await;
    let video_id = create_video(&server, &channel_id, "music", 10, json!({})).await;

    server
        .post(&format!("/videos/{video_id}/watch"))
        .json(&json!({ "user_id": user_id, "watch_time_secs": 300, "watch_percentage": 40.0 }))
        .await
        .assert_status_ok();

    let response = server
        .post(&format!("/videos/{video_id}/watch"))
        .json(&json!({
            "user_id": user_id,
            "watch_time_secs": 100,
            "watch_percentage": 95.0,
            "liked": true
        }))
        .await;
    response.assert_status_ok();

    let event: serde_json::Value = response.json();
    assert_eq!(event["watch_time_secs"], 300);
    assert_eq!(event["watch_percentage"], 95.0);
    assert_eq!(event["liked"], json!(true));
}

#[tokio::test]
async fn test_trending_window_and_validation() {
    let server = create_test_server();
    let channel_id = create_channel(&server).await;

    create_video(&server, &channel_id, "music", 10, json!({})).await;
    let last_month = (chrono::Utc::now() - chrono::Duration::days(30)).to_rfc3339();
    create_video(
        &server,
        &channel_id,
        "music",
        5000,
        json!({ "created_at": last_month }),
    )
    .await;

    let response = server.get("/recommendations/trending?limit=10").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["timeframe"], "week");
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["views"], 10);

    let response = server.get("/recommendations/trending?timeframe=year").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "timeframe");
}

#[tokio::test]
async fn test_active_recommendations_after_generation() {
    let server = create_test_server();
    let channel_id = create_channel(&server).await;
    let user_id = create_user(&server, &["music"]).await;

    for views in [50, 40, 30, 20, 10] {
        create_video(&server, &channel_id, "music", views, json!({})).await;
    }

    server
        .get(&format!(
            "/recommendations/{user_id}?algorithm=content-based&limit=5"
        ))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/recommendations/{user_id}/active?limit=10"))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 5);
    let items = body["items"].as_array().unwrap();
    let scores: Vec<f64> = items.iter().map(|i| i["score"].as_f64().unwrap()).collect();
    assert_eq!(scores, vec![0.8, 0.6, 0.4, 0.2, 0.0]);
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn test_analytics_and_performance() {
    let server = create_test_server();
    let channel_id = create_channel(&server).await;
    let user_id = create_user(&server, &["music"]).await;

    for views in [50, 40, 30, 20, 10] {
        create_video(&server, &channel_id, "music", views, json!({})).await;
    }
    server
        .get(&format!(
            "/recommendations/{user_id}?algorithm=content-based&limit=5"
        ))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/recommendations/{user_id}/analytics?timeframe_days=30"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["timeframe_days"], 30);
    let analytics = &body["analytics"];
    assert_eq!(analytics["total_recommendations"], 5);
    assert_eq!(analytics["algorithms_used"]["content-based"], 5);
    assert_eq!(analytics["top_categories"]["music"], 5);
    assert_eq!(analytics["recommendation_frequency"]["total"], 5);

    let response = server
        .get(&format!("/recommendations/{user_id}/performance?timeframe_days=7"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["algorithm"], "all");
    let performance = &body["performance"];
    assert_eq!(performance["total_recommendations"], 5);
    let distribution = &performance["score_distribution"];
    let bucket_total = distribution["high"].as_u64().unwrap()
        + distribution["medium"].as_u64().unwrap()
        + distribution["low"].as_u64().unwrap();
    assert_eq!(bucket_total, 5);
    assert_eq!(
        performance["top_reasons"]["Recommended via content-based filtering"],
        5
    );
}

#[tokio::test]
async fn test_performance_rejects_unknown_algorithm() {
    let server = create_test_server();
    let user_id = create_user(&server, &[]).await;

    let response = server
        .get(&format!("/recommendations/{user_id}/performance?algorithm=magic"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

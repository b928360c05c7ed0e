use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{
    Algorithm, Channel, PreferencesUpdate, TasteProfile, Video, VideoStatus, VideoWithChannel,
    WatchEvent, WatchInput,
};
use crate::services::{
    analytics::{self, AnalyticsReport, PerformanceReport},
    ledger, recommendations, trending,
    trending::Timeframe,
    RecommendedItem,
};

use super::AppState;

const DEFAULT_LIMIT: u32 = 20;
const DEFAULT_ANALYTICS_DAYS: u32 = 30;
const DEFAULT_PERFORMANCE_DAYS: u32 = 7;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub preferred_categories: Vec<String>,
    #[serde(default)]
    pub preferred_languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub channel_id: Uuid,
    pub title: String,
    pub category: String,
    pub language: String,
    #[serde(default = "default_status")]
    pub status: VideoStatus,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_status() -> VideoStatus {
    VideoStatus::Public
}

#[derive(Debug, Deserialize)]
pub struct RecordWatchRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub watch: WatchInput,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<u32>,
    pub algorithm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<u32>,
    pub timeframe: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub timeframe_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub algorithm: Option<String>,
    pub timeframe_days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub algorithm: Algorithm,
    pub count: usize,
    pub items: Vec<RecommendedItem>,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub timeframe: Timeframe,
    pub count: usize,
    pub items: Vec<VideoWithChannel>,
}

#[derive(Debug, Serialize)]
pub struct ActiveResponse {
    pub count: usize,
    pub items: Vec<RecommendedItem>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub timeframe_days: u32,
    pub analytics: AnalyticsReport,
}

#[derive(Debug, Serialize)]
pub struct PerformanceResponse {
    pub timeframe_days: u32,
    pub algorithm: String,
    pub performance: PerformanceReport,
}

// Parameter validation, checked before any store access

fn parse_limit(limit: Option<u32>) -> AppResult<usize> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Err(AppError::validation("limit", "must be greater than zero"));
    }
    Ok(limit as usize)
}

fn parse_algorithm(algorithm: Option<&str>) -> AppResult<Algorithm> {
    match algorithm {
        None => Ok(Algorithm::Hybrid),
        Some(raw) => raw.parse().map_err(|_| {
            AppError::validation(
                "algorithm",
                "must be content-based, collaborative, or hybrid",
            )
        }),
    }
}

fn parse_timeframe(timeframe: Option<&str>) -> AppResult<Timeframe> {
    match timeframe {
        None => Ok(Timeframe::default()),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::validation("timeframe", "must be day, week, or month")),
    }
}

fn parse_timeframe_days(days: Option<u32>, default: u32) -> AppResult<u32> {
    let days = days.unwrap_or(default);
    if days == 0 {
        return Err(AppError::validation(
            "timeframe_days",
            "must be greater than zero",
        ));
    }
    Ok(days)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Create a user with a default taste profile
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<TasteProfile>)> {
    let mut profile = TasteProfile::new(Uuid::new_v4());
    profile.preferred_categories = request.preferred_categories;
    profile.preferred_languages = request.preferred_languages;

    state.profiles.create_profile(profile.clone()).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Update a user's recommendation preferences.
/// Rejects any field outside the closed preference set.
pub async fn update_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<TasteProfile>> {
    let Some(fields) = body.as_object() else {
        return Err(AppError::validation("preferences", "must be a JSON object"));
    };

    let invalid: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|key| !PreferencesUpdate::ALLOWED_FIELDS.contains(key))
        .collect();
    if !invalid.is_empty() {
        return Err(AppError::validation(
            invalid.join(", "),
            "unknown preference field",
        ));
    }

    let update: PreferencesUpdate = serde_json::from_value(body)
        .map_err(|e| AppError::validation("preferences", e.to_string()))?;

    let profile = state
        .profiles
        .update_profile(user_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(profile))
}

/// Create a channel
pub async fn create_channel(
    State(state): State<AppState>,
    Json(request): Json<CreateChannelRequest>,
) -> AppResult<(StatusCode, Json<Channel>)> {
    let channel = Channel::new(request.name, request.description);
    state.catalog.insert_channel(channel.clone()).await?;
    Ok((StatusCode::CREATED, Json(channel)))
}

/// Create a video in the catalog
pub async fn create_video(
    State(state): State<AppState>,
    Json(request): Json<CreateVideoRequest>,
) -> AppResult<(StatusCode, Json<Video>)> {
    let mut video = Video::new(
        request.channel_id,
        request.title,
        request.category,
        request.language,
    );
    video.status = request.status;
    video.views = request.views;
    video.likes = request.likes;
    if let Some(created_at) = request.created_at {
        video.created_at = created_at;
    }

    state.catalog.insert_video(video.clone()).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// Record a watch event, merging same-day re-watches
pub async fn record_watch(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    Json(request): Json<RecordWatchRequest>,
) -> AppResult<Json<WatchEvent>> {
    if state.profiles.get_profile(request.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    if state.catalog.get_video(video_id).await?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let event = state
        .engagement
        .upsert_event(request.user_id, video_id, &request.watch, Utc::now())
        .await?;
    Ok(Json(event))
}

/// Trending videos over the trailing week, no user context
pub async fn get_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> AppResult<Json<TrendingResponse>> {
    let limit = parse_limit(query.limit)?;
    let timeframe = parse_timeframe(query.timeframe.as_deref())?;

    let videos = trending::rank(state.catalog.as_ref(), Utc::now(), limit).await?;
    let mut items = Vec::with_capacity(videos.len());
    for video in videos {
        let channel = state.catalog.get_channel(video.channel_id).await?;
        items.push(VideoWithChannel { video, channel });
    }

    Ok(Json(TrendingResponse {
        timeframe,
        count: items.len(),
        items,
    }))
}

/// Generate and persist personalized recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    let limit = parse_limit(query.limit)?;
    let algorithm = parse_algorithm(query.algorithm.as_deref())?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        algorithm = %algorithm,
        limit,
        "Generating recommendations"
    );

    // Cooperative deadline: a timeout drops the ranking future before any
    // ledger write, so cancelled requests never leave partial batches.
    let items = tokio::time::timeout(
        state.recommend_deadline,
        recommendations::recommend(
            state.profiles.as_ref(),
            state.catalog.as_ref(),
            state.engagement.as_ref(),
            state.ledger.as_ref(),
            user_id,
            algorithm,
            limit,
            Utc::now(),
        ),
    )
    .await
    .map_err(|_| AppError::Internal("recommendation deadline exceeded".to_string()))??;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        count = items.len(),
        "Recommendations generated"
    );

    Ok(Json(RecommendationsResponse {
        algorithm,
        count: items.len(),
        items,
    }))
}

/// The user's active (unexpired) stored recommendations
pub async fn get_active_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ActiveQuery>,
) -> AppResult<Json<ActiveResponse>> {
    let limit = parse_limit(query.limit)?;

    let items = ledger::list_active(
        state.profiles.as_ref(),
        state.catalog.as_ref(),
        state.ledger.as_ref(),
        user_id,
        Utc::now(),
        limit,
    )
    .await?;

    Ok(Json(ActiveResponse {
        count: items.len(),
        items,
    }))
}

/// Summary statistics over the user's recommendation history
pub async fn get_analytics(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<AnalyticsResponse>> {
    let timeframe_days = parse_timeframe_days(query.timeframe_days, DEFAULT_ANALYTICS_DAYS)?;

    let report = analytics::analytics(
        state.profiles.as_ref(),
        state.catalog.as_ref(),
        state.ledger.as_ref(),
        user_id,
        timeframe_days,
        Utc::now(),
    )
    .await?;

    Ok(Json(AnalyticsResponse {
        timeframe_days,
        analytics: report,
    }))
}

/// Per-algorithm quality metrics over a trailing window
pub async fn get_performance(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PerformanceQuery>,
) -> AppResult<Json<PerformanceResponse>> {
    let timeframe_days = parse_timeframe_days(query.timeframe_days, DEFAULT_PERFORMANCE_DAYS)?;
    let algorithm = match query.algorithm.as_deref() {
        None => None,
        Some(raw) => Some(parse_algorithm(Some(raw))?),
    };

    let report = analytics::performance(
        state.profiles.as_ref(),
        state.ledger.as_ref(),
        user_id,
        algorithm,
        timeframe_days,
        Utc::now(),
    )
    .await?;

    Ok(Json(PerformanceResponse {
        timeframe_days,
        algorithm: algorithm.map_or_else(|| "all".to_string(), |a| a.to_string()),
        performance: report,
    }))
}

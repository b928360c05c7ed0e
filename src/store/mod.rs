pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Algorithm, Channel, PreferencesUpdate, Recommendation, TasteProfile, Video, VideoStatus,
    WatchEvent, WatchInput,
};

/// Ordering for catalog queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VideoOrder {
    /// Views descending, then newest first
    #[default]
    ViewsThenNewest,
    /// Views descending, then likes descending
    ViewsThenLikes,
}

/// Explicit query contract for catalog reads.
///
/// Flat predicate + order + limit instead of association traversal; `None`
/// filters match everything.
#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    pub status: Option<VideoStatus>,
    pub categories: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub created_after: Option<DateTime<Utc>>,
    pub order: VideoOrder,
    pub limit: Option<usize>,
}

impl VideoQuery {
    /// All public videos, most-viewed first
    pub fn public() -> Self {
        Self {
            status: Some(VideoStatus::Public),
            ..Default::default()
        }
    }
}

/// Taste profile storage, one profile per user
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, profile: TasteProfile) -> AppResult<()>;

    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<TasteProfile>>;

    /// Applies a partial update, returning the updated profile, or `None`
    /// when the user does not exist
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: PreferencesUpdate,
    ) -> AppResult<Option<TasteProfile>>;
}

/// Read-mostly video and channel catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_channel(&self, channel: Channel) -> AppResult<()>;

    async fn insert_video(&self, video: Video) -> AppResult<()>;

    async fn get_video(&self, id: Uuid) -> AppResult<Option<Video>>;

    async fn get_channel(&self, id: Uuid) -> AppResult<Option<Channel>>;

    async fn query_videos(&self, query: &VideoQuery) -> AppResult<Vec<Video>>;
}

/// Per-(user, video) watch events
#[async_trait]
pub trait EngagementStore: Send + Sync {
    /// Records a watch, merging into an existing same-day entry for the
    /// same user and video
    async fn upsert_event(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        input: &WatchInput,
        now: DateTime<Utc>,
    ) -> AppResult<WatchEvent>;

    /// All events recorded for users other than `user_id`
    async fn events_excluding_user(&self, user_id: Uuid) -> AppResult<Vec<WatchEvent>>;
}

/// Recommendation batch storage
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Removes entries for `user_id` + `algorithm` whose expiry has
    /// passed; unexpired batches are left alone
    async fn evict_expired(
        &self,
        user_id: Uuid,
        algorithm: Algorithm,
        now: DateTime<Utc>,
    ) -> AppResult<usize>;

    /// Inserts one batch; all rows land or none do
    async fn insert_batch(&self, batch: Vec<Recommendation>) -> AppResult<()>;

    /// Unexpired entries for `user_id`, score descending
    async fn active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<Recommendation>>;

    /// Most recently generated entries for `user_id`, no expiry filter
    async fn recent_for_user(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<Recommendation>>;
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Algorithm, Channel, PreferencesUpdate, Recommendation, TasteProfile, Video, WatchEvent,
    WatchInput,
};

use super::{
    CatalogStore, EngagementStore, LedgerStore, ProfileStore, VideoOrder, VideoQuery,
};

/// In-memory store backing all four store traits.
///
/// Used by the binary and as the deterministic test double. One lock over
/// the whole state keeps batch inserts atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    profiles: HashMap<Uuid, TasteProfile>,
    channels: HashMap<Uuid, Channel>,
    videos: HashMap<Uuid, Video>,
    watch_events: Vec<WatchEvent>,
    recommendations: Vec<Recommendation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(video: &Video, query: &VideoQuery) -> bool {
    if let Some(status) = query.status {
        if video.status != status {
            return false;
        }
    }
    if let Some(categories) = &query.categories {
        if !categories.contains(&video.category) {
            return false;
        }
    }
    if let Some(languages) = &query.languages {
        if !languages.contains(&video.language) {
            return false;
        }
    }
    if let Some(after) = query.created_after {
        if video.created_at < after {
            return false;
        }
    }
    true
}

fn sort_videos(videos: &mut [Video], order: VideoOrder) {
    match order {
        VideoOrder::ViewsThenNewest => videos.sort_by(|a, b| {
            b.views
                .cmp(&a.views)
                .then(b.created_at.cmp(&a.created_at))
                .then(a.id.cmp(&b.id))
        }),
        VideoOrder::ViewsThenLikes => videos.sort_by(|a, b| {
            b.views
                .cmp(&a.views)
                .then(b.likes.cmp(&a.likes))
                .then(a.id.cmp(&b.id))
        }),
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn create_profile(&self, profile: TasteProfile) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.profiles.insert(profile.user_id, profile);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<TasteProfile>> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.get(&user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: PreferencesUpdate,
    ) -> AppResult<Option<TasteProfile>> {
        let mut inner = self.inner.write().await;
        Ok(inner.profiles.get_mut(&user_id).map(|profile| {
            profile.apply(update);
            profile.clone()
        }))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_channel(&self, channel: Channel) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.channels.insert(channel.id, channel);
        Ok(())
    }

    async fn insert_video(&self, video: Video) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.videos.insert(video.id, video);
        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> AppResult<Option<Video>> {
        let inner = self.inner.read().await;
        Ok(inner.videos.get(&id).cloned())
    }

    async fn get_channel(&self, id: Uuid) -> AppResult<Option<Channel>> {
        let inner = self.inner.read().await;
        Ok(inner.channels.get(&id).cloned())
    }

    async fn query_videos(&self, query: &VideoQuery) -> AppResult<Vec<Video>> {
        let inner = self.inner.read().await;
        let mut videos: Vec<Video> = inner
            .videos
            .values()
            .filter(|v| matches(v, query))
            .cloned()
            .collect();
        sort_videos(&mut videos, query.order);
        if let Some(limit) = query.limit {
            videos.truncate(limit);
        }
        Ok(videos)
    }
}

#[async_trait]
impl EngagementStore for MemoryStore {
    async fn upsert_event(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        input: &WatchInput,
        now: DateTime<Utc>,
    ) -> AppResult<WatchEvent> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .watch_events
            .iter_mut()
            .find(|e| e.user_id == user_id && e.video_id == video_id && e.same_day(now))
        {
            existing.merge(input);
            return Ok(existing.clone());
        }
        let event = WatchEvent::new(user_id, video_id, input, now);
        inner.watch_events.push(event.clone());
        Ok(event)
    }

    async fn events_excluding_user(&self, user_id: Uuid) -> AppResult<Vec<WatchEvent>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watch_events
            .iter()
            .filter(|e| e.user_id != user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn evict_expired(
        &self,
        user_id: Uuid,
        algorithm: Algorithm,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.recommendations.len();
        inner.recommendations.retain(|r| {
            !(r.user_id == user_id && r.algorithm == algorithm && r.is_expired(now))
        });
        Ok(before - inner.recommendations.len())
    }

    async fn insert_batch(&self, batch: Vec<Recommendation>) -> AppResult<()> {
        // Single critical section: the whole batch becomes visible at once
        let mut inner = self.inner.write().await;
        inner.recommendations.extend(batch);
        Ok(())
    }

    async fn active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<Recommendation> = inner
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id && !r.is_expired(now))
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.generated_at.cmp(&a.generated_at))
                .then(a.position.cmp(&b.position))
        });
        entries.truncate(limit);
        Ok(entries)
    }

    async fn recent_for_user(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<Recommendation> = inner
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.generated_at.cmp(&a.generated_at).then(a.position.cmp(&b.position)));
        entries.truncate(limit);
        Ok(entries)
    }
}

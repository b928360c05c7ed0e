use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{build_batch, Algorithm, Recommendation, Video, VideoWithChannel};
use crate::store::{CatalogStore, LedgerStore, ProfileStore};

use super::require_profile;

/// A ledger entry joined with its video and channel for display
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedItem {
    pub video: VideoWithChannel,
    pub score: f64,
    pub algorithm: Algorithm,
    pub reason: String,
    pub position: u32,
}

/// Persists a ranked list as a new batch for `user_id` + `algorithm`.
///
/// Expired entries for the same user and algorithm are evicted first;
/// unexpired prior batches stay, so active batches accumulate (additive,
/// intentional). The insert itself is atomic: the dense position sequence
/// is never observable half-written.
pub async fn store_batch(
    profiles: &dyn ProfileStore,
    ledger: &dyn LedgerStore,
    user_id: Uuid,
    algorithm: Algorithm,
    videos: &[Video],
    now: DateTime<Utc>,
) -> AppResult<Vec<Recommendation>> {
    require_profile(profiles, user_id).await?;

    let batch = build_batch(user_id, algorithm, videos, now);
    ledger.evict_expired(user_id, algorithm, now).await?;
    ledger.insert_batch(batch.clone()).await?;

    tracing::debug!(
        user_id = %user_id,
        algorithm = %algorithm,
        batch_size = batch.len(),
        "Stored recommendation batch"
    );
    Ok(batch)
}

/// Returns up to `limit` unexpired entries for `user_id`, score
/// descending, each joined with its video and channel
pub async fn list_active(
    profiles: &dyn ProfileStore,
    catalog: &dyn CatalogStore,
    ledger: &dyn LedgerStore,
    user_id: Uuid,
    now: DateTime<Utc>,
    limit: usize,
) -> AppResult<Vec<RecommendedItem>> {
    require_profile(profiles, user_id).await?;

    let entries = ledger.active_for_user(user_id, now, limit).await?;
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        // A video deleted from the catalog drops its ledger rows from view
        let Some(video) = catalog.get_video(entry.video_id).await? else {
            continue;
        };
        let channel = catalog.get_channel(video.channel_id).await?;
        items.push(RecommendedItem {
            video: VideoWithChannel { video, channel },
            score: entry.score,
            algorithm: entry.algorithm,
            reason: entry.reason,
            position: entry.position,
        });
    }
    Ok(items)
}

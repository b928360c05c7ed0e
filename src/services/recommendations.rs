use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Algorithm, VideoWithChannel};
use crate::store::{CatalogStore, EngagementStore, LedgerStore, ProfileStore};

use super::{collaborative, content_based, hybrid, ledger, require_profile, RecommendedItem};

/// Generates personalized recommendations for `user_id`.
///
/// Loads the taste profile, dispatches to the requested ranker, persists
/// the result as a ledger batch, and returns the ranked items joined with
/// their videos. Ranking is pure; the ledger write is the only side
/// effect, and it happens after ranking completes.
pub async fn recommend(
    profiles: &dyn ProfileStore,
    catalog: &dyn CatalogStore,
    engagement: &dyn EngagementStore,
    ledger_store: &dyn LedgerStore,
    user_id: Uuid,
    algorithm: Algorithm,
    limit: usize,
    now: DateTime<Utc>,
) -> AppResult<Vec<RecommendedItem>> {
    let profile = require_profile(profiles, user_id).await?;

    let videos = match algorithm {
        Algorithm::ContentBased => content_based::rank(catalog, &profile, limit).await?,
        Algorithm::Collaborative => {
            collaborative::rank(catalog, engagement, user_id, limit).await?
        }
        Algorithm::Hybrid => hybrid::rank(catalog, engagement, &profile, limit).await?,
    };

    let batch = ledger::store_batch(profiles, ledger_store, user_id, algorithm, &videos, now).await?;

    let mut items = Vec::with_capacity(batch.len());
    for (entry, video) in batch.into_iter().zip(videos) {
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

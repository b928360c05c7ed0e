use std::collections::HashSet;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{TasteProfile, Video};
use crate::store::{CatalogStore, EngagementStore};

use super::{collaborative, content_based};

/// Share of the limit requested from the content-based ranker
const CONTENT_WEIGHT: f64 = 0.6;
/// Share of the limit requested from the collaborative ranker
const COLLABORATIVE_WEIGHT: f64 = 0.4;

/// Blends content-based and collaborative results under a fixed 60/40
/// quota split. Sub-rankers run sequentially; the final list is
/// deduplicated and bounded by `limit`.
pub async fn rank(
    catalog: &dyn CatalogStore,
    engagement: &dyn EngagementStore,
    profile: &TasteProfile,
    limit: usize,
) -> AppResult<Vec<Video>> {
    let content_quota = (limit as f64 * CONTENT_WEIGHT).ceil() as usize;
    let collaborative_quota = (limit as f64 * COLLABORATIVE_WEIGHT).ceil() as usize;

    let content = content_based::rank(catalog, profile, content_quota).await?;
    let peers =
        collaborative::rank(catalog, engagement, profile.user_id, collaborative_quota).await?;

    Ok(blend(content, peers, limit))
}

/// Concatenates with content-based results first, drops repeat video ids
/// keeping the first occurrence, and truncates to `limit`
fn blend(content: Vec<Video>, collaborative: Vec<Video>, limit: usize) -> Vec<Video> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut merged: Vec<Video> = Vec::with_capacity(content.len() + collaborative.len());
    for video in content.into_iter().chain(collaborative) {
        if seen.insert(video.id) {
            merged.push(video);
        }
    }
    merged.truncate(limit);
    merged
}

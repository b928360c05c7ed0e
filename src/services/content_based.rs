use crate::error::AppResult;
use crate::models::{TasteProfile, Video, VideoStatus};
use crate::store::{CatalogStore, VideoOrder, VideoQuery};

/// Ranks public videos against a taste profile: category and language
/// filters apply only when the profile declares preferences, so an empty
/// profile degrades to a plain popularity ranking (cold start).
///
/// Ordering is views descending with newer uploads winning ties. Never
/// errors on an empty result.
pub async fn rank(
    catalog: &dyn CatalogStore,
    profile: &TasteProfile,
    limit: usize,
) -> AppResult<Vec<Video>> {
    catalog.query_videos(&profile_query(profile, limit)).await
}

fn profile_query(profile: &TasteProfile, limit: usize) -> VideoQuery {
    VideoQuery {
        status: Some(VideoStatus::Public),
        categories: non_empty(&profile.preferred_categories),
        languages: non_empty(&profile.preferred_languages),
        created_after: None,
        order: VideoOrder::ViewsThenNewest,
        limit: Some(limit),
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

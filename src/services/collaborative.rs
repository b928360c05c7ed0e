use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Video;
use crate::store::{CatalogStore, EngagementStore, VideoQuery};

/// Peers considered when building the cohort
const COHORT_SIZE: usize = 10;

/// "Users like you watched": picks the 10 heaviest watchers other than the
/// target (by distinct public videos watched, ties broken by ascending
/// user id for reproducibility), unions what the cohort watched, and ranks
/// that pool by global view count.
///
/// Candidates are eligible regardless of the target's own history; there
/// is deliberately no watched-video exclusion. An empty engagement store
/// yields an empty list, never an error.
pub async fn rank(
    catalog: &dyn CatalogStore,
    engagement: &dyn EngagementStore,
    user_id: Uuid,
    limit: usize,
) -> AppResult<Vec<Video>> {
    let events = engagement.events_excluding_user(user_id).await?;
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let public: HashMap<Uuid, Video> = catalog
        .query_videos(&VideoQuery::public())
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();

    // Distinct public videos per peer
    let mut watched: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for event in &events {
        if public.contains_key(&event.video_id) {
            watched.entry(event.user_id).or_default().insert(event.video_id);
        }
    }

    let mut peers: Vec<(Uuid, usize)> = watched
        .iter()
        .map(|(peer, videos)| (*peer, videos.len()))
        .collect();
    peers.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    peers.truncate(COHORT_SIZE);

    let mut candidate_ids: HashSet<Uuid> = HashSet::new();
    for (peer, _) in &peers {
        if let Some(videos) = watched.get(peer) {
            candidate_ids.extend(videos.iter().copied());
        }
    }

    let mut candidates: Vec<Video> = candidate_ids
        .into_iter()
        .filter_map(|id| public.get(&id).cloned())
        .collect();
    candidates.sort_by(|a, b| {
        b.views
            .cmp(&a.views)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });
    candidates.truncate(limit);
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VideoStatus, WatchInput};
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn video(views: u64) -> Video {
        let mut v = Video::new(
            Uuid::new_v4(),
            "clip".to_string(),
            "music".to_string(),
            "en".to_string(),
        );
        v.views = views;
        v
    }

    fn watch() -> WatchInput {
        WatchInput {
            watch_time_secs: 60,
            watch_percentage: 50.0,
            completed: false,
            liked: None,
        }
    }

    async fn record(store: &MemoryStore, user: Uuid, video_id: Uuid) {
        store
            .upsert_event(user, video_id, &watch(), Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_engagement_store_yields_empty_list() {
        let store = MemoryStore::new();
        store.insert_video(video(100)).await.unwrap();

        let result = rank(&store, &store, Uuid::new_v4(), 10).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_surfaces_cohort_videos_by_views() {
        let store = MemoryStore::new();
        let target = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let popular = video(500);
        let niche = video(5);
        let unwatched = video(9999);
        let (popular_id, niche_id) = (popular.id, niche.id);

        for v in [popular, niche, unwatched] {
            store.insert_video(v).await.unwrap();
        }
        record(&store, peer, popular_id).await;
        record(&store, peer, niche_id).await;

        let result = rank(&store, &store, target, 10).await.unwrap();
        let ids: Vec<Uuid> = result.iter().map(|v| v.id).collect();
        // Only cohort-watched videos, views descending
        assert_eq!(ids, vec![popular_id, niche_id]);
    }

    #[tokio::test]
    async fn test_target_events_do_not_feed_the_cohort() {
        let store = MemoryStore::new();
        let target = Uuid::new_v4();
        let only_target_watched = video(100);
        let video_id = only_target_watched.id;
        store.insert_video(only_target_watched).await.unwrap();
        record(&store, target, video_id).await;

        let result = rank(&store, &store, target, 10).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_non_public_watches_are_ignored() {
        let store = MemoryStore::new();
        let peer = Uuid::new_v4();
        let mut hidden = video(100);
        hidden.status = VideoStatus::Unlisted;
        let hidden_id = hidden.id;
        store.insert_video(hidden).await.unwrap();
        record(&store, peer, hidden_id).await;

        let result = rank(&store, &store, Uuid::new_v4(), 10).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_cohort_capped_at_ten_peers() {
        let store = MemoryStore::new();
        let target = Uuid::new_v4();

        // Eleven peers, each watching a distinct number of videos; the
        // lightest watcher's unique video must not surface.
        let mut lightest_video = None;
        for weight in 1..=11u64 {
            let peer = Uuid::new_v4();
            let mut first = None;
            for _ in 0..weight {
                let v = video(weight);
                let id = v.id;
                store.insert_video(v).await.unwrap();
                record(&store, peer, id).await;
                first.get_or_insert(id);
            }
            if weight == 1 {
                lightest_video = first;
            }
        }

        let result = rank(&store, &store, target, 1000).await.unwrap();
        let ids: HashSet<Uuid> = result.iter().map(|v| v.id).collect();
        assert!(!ids.contains(&lightest_video.unwrap()));
        // 2 + 3 + ... + 11 videos from the ten heaviest peers
        assert_eq!(result.len(), 65);
    }

    #[tokio::test]
    async fn test_no_exclusion_of_videos_target_already_watched() {
        let store = MemoryStore::new();
        let target = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let shared = video(10);
        let shared_id = shared.id;
        store.insert_video(shared).await.unwrap();
        record(&store, peer, shared_id).await;
        record(&store, target, shared_id).await;

        let result = rank(&store, &store, target, 10).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, shared_id);
    }
}

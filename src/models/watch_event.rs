use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's engagement with one video.
///
/// Append-mostly: a re-watch on the same calendar day merges into the
/// existing entry instead of creating a second row (see [`WatchEvent::merge`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchEvent {
    pub user_id: Uuid,
    pub video_id: Uuid,
    /// Seconds watched
    pub watch_time_secs: u32,
    /// Percentage of the video watched, 0..=100
    pub watch_percentage: f32,
    pub completed: bool,
    /// None = no action, Some(true) = liked, Some(false) = disliked
    pub liked: Option<bool>,
    pub watched_at: DateTime<Utc>,
}

/// Caller-supplied fields for recording a watch
#[derive(Debug, Clone, Deserialize)]
pub struct WatchInput {
    pub watch_time_secs: u32,
    #[serde(default)]
    pub watch_percentage: f32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub liked: Option<bool>,
}

impl WatchEvent {
    pub fn new(user_id: Uuid, video_id: Uuid, input: &WatchInput, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            video_id,
            watch_time_secs: input.watch_time_secs,
            watch_percentage: input.watch_percentage,
            completed: input.completed,
            liked: input.liked,
            watched_at: now,
        }
    }

    /// True when this event falls on the same UTC calendar day as `now`
    pub fn same_day(&self, now: DateTime<Utc>) -> bool {
        self.watched_at.date_naive() == now.date_naive()
    }

    /// Merge a same-day re-watch into this entry: watch time and
    /// percentage keep their maximum, completion is sticky, and the
    /// like/dislike flag changes only when the caller provided one.
    pub fn merge(&mut self, input: &WatchInput) {
        self.watch_time_secs = self.watch_time_secs.max(input.watch_time_secs);
        self.watch_percentage = self.watch_percentage.max(input.watch_percentage);
        self.completed = self.completed || input.completed;
        if let Some(liked) = input.liked {
            self.liked = Some(liked);
        }
    }
}

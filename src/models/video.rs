use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visibility of a catalog video. Only public videos are ever recommended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Public,
    Private,
    Unlisted,
}

/// A video in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    /// Unique identifier for the video
    pub id: Uuid,
    /// Channel that published the video
    pub channel_id: Uuid,
    /// Display title
    pub title: String,
    /// Content category (e.g., "music", "gaming")
    pub category: String,
    /// Content language (e.g., "en", "es")
    pub language: String,
    /// Visibility status
    pub status: VideoStatus,
    /// Total view count
    pub views: u64,
    /// Total like count
    pub likes: u64,
    /// Upload timestamp
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// Creates a new public video with zeroed counters
    pub fn new(channel_id: Uuid, title: String, category: String, language: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel_id,
            title,
            category,
            language,
            status: VideoStatus::Public,
            views: 0,
            likes: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_public(&self) -> bool {
        self.status == VideoStatus::Public
    }
}

/// A channel that publishes videos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl Channel {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
        }
    }
}

/// A video joined with its channel for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoWithChannel {
    #[serde(flatten)]
    pub video: Video,
    pub channel: Option<Channel>,
}

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Video;

/// How long a stored recommendation stays active
const BATCH_TTL_HOURS: i64 = 24;

/// Ranking strategy for personalized recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    ContentBased,
    Collaborative,
    Hybrid,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::ContentBased => "content-based",
            Algorithm::Collaborative => "collaborative",
            Algorithm::Hybrid => "hybrid",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content-based" => Ok(Algorithm::ContentBased),
            "collaborative" => Ok(Algorithm::Collaborative),
            "hybrid" => Ok(Algorithm::Hybrid),
            _ => Err(()),
        }
    }
}

/// One ledger entry: a single video recommended to a single user.
///
/// Entries are written in batches and never updated in place. Within a
/// batch, `position` is a dense 1..N sequence and `score` decays linearly
/// with position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    /// Batch-local score in [0, 1]; relative to this batch only
    pub score: f64,
    pub algorithm: Algorithm,
    pub reason: String,
    /// 1-based position in the batch
    pub position: u32,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Score for a 1-based `position` in a batch of `total` entries.
///
/// Linear decay: the first entry scores `(N-1)/N`, the last scores 0.
/// Batch-local, so it must be recomputed whenever the batch size changes.
pub fn position_score(position: u32, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (total as f64 - f64::from(position)) / total as f64
}

/// Turns a ranked video list into a ledger batch for `user_id`.
///
/// Pure: assigns dense positions, position-derived scores, the reason
/// string, and a 24-hour expiry; persistence is the ledger's job.
pub fn build_batch(
    user_id: Uuid,
    algorithm: Algorithm,
    videos: &[Video],
    now: DateTime<Utc>,
) -> Vec<Recommendation> {
    let total = videos.len();
    videos
        .iter()
        .enumerate()
        .map(|(index, video)| {
            let position = index as u32 + 1;
            Recommendation {
                id: Uuid::new_v4(),
                user_id,
                video_id: video.id,
                score: position_score(position, total),
                algorithm,
                reason: format!("Recommended via {} filtering", algorithm),
                position,
                generated_at: now,
                expires_at: now + Duration::hours(BATCH_TTL_HOURS),
            }
        })
        .collect()
}

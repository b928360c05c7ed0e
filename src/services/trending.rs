use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::{Video, VideoStatus};
use crate::store::{CatalogStore, VideoOrder, VideoQuery};

/// The ranking window is fixed regardless of the display timeframe label
const TRENDING_WINDOW_DAYS: i64 = 7;

/// Display label accepted by trending callers. Presentation only: it is
/// echoed back in the response and does not change the query window.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    Week,
    Month,
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Week
    }
}

impl FromStr for Timeframe {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Timeframe::Day),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            _ => Err(()),
        }
    }
}

/// Cohort-free, preference-free popularity ranking: public videos created
/// in the trailing 7 days, views descending then likes descending. Not
/// persisted to the ledger.
pub async fn rank(
    catalog: &dyn CatalogStore,
    now: DateTime<Utc>,
    limit: usize,
) -> AppResult<Vec<Video>> {
    let query = VideoQuery {
        status: Some(VideoStatus::Public),
        categories: None,
        languages: None,
        created_after: Some(now - Duration::days(TRENDING_WINDOW_DAYS)),
        order: VideoOrder::ViewsThenLikes,
        limit: Some(limit),
    };
    catalog.query_videos(&query).await
}

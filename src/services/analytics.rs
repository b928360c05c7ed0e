use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Algorithm, Recommendation};
use crate::store::{CatalogStore, LedgerStore, ProfileStore};

use super::require_profile;

/// Ledger entries sampled for analytics (no expiry filter)
const ANALYTICS_SAMPLE: usize = 100;
/// Ledger entries sampled for performance metrics
const PERFORMANCE_SAMPLE: usize = 1000;

/// Summary of a user's recent recommendation history
#[derive(Debug, Serialize, PartialEq)]
pub struct AnalyticsReport {
    pub total_recommendations: usize,
    pub algorithms_used: BTreeMap<String, u64>,
    pub average_score: f64,
    pub top_categories: BTreeMap<String, u64>,
    pub recommendation_frequency: FrequencyReport,
}

/// Batch activity inside the requested window
#[derive(Debug, Serialize, PartialEq)]
pub struct FrequencyReport {
    pub total: usize,
    pub average_per_day: f64,
}

/// Score buckets: high ≥ 0.8, medium in [0.5, 0.8), low < 0.5
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ScoreDistribution {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl ScoreDistribution {
    fn record(&mut self, score: f64) {
        if score >= 0.8 {
            self.high += 1;
        } else if score >= 0.5 {
            self.medium += 1;
        } else {
            self.low += 1;
        }
    }
}

/// Per-algorithm quality metrics over a trailing window
#[derive(Debug, Serialize, PartialEq)]
pub struct PerformanceReport {
    pub total_recommendations: usize,
    pub average_score: f64,
    pub score_distribution: ScoreDistribution,
    pub algorithm_breakdown: BTreeMap<String, u64>,
    pub top_reasons: BTreeMap<String, u64>,
}

fn mean_score(entries: &[Recommendation]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(|r| r.score).sum::<f64>() / entries.len() as f64
}

/// Derives usage statistics from the user's most recent ledger entries.
///
/// Reads the latest 100 entries regardless of expiry, then buckets them:
/// algorithm histogram, mean score, category histogram via the joined
/// video, and batch frequency within the trailing `timeframe_days`.
/// Pure read-side aggregation; an empty ledger yields all-zero results.
pub async fn analytics(
    profiles: &dyn ProfileStore,
    catalog: &dyn CatalogStore,
    ledger: &dyn LedgerStore,
    user_id: Uuid,
    timeframe_days: u32,
    now: DateTime<Utc>,
) -> AppResult<AnalyticsReport> {
    require_profile(profiles, user_id).await?;

    let entries = ledger.recent_for_user(user_id, ANALYTICS_SAMPLE).await?;

    let mut algorithms_used: BTreeMap<String, u64> = BTreeMap::new();
    let mut top_categories: BTreeMap<String, u64> = BTreeMap::new();
    for entry in &entries {
        *algorithms_used
            .entry(entry.algorithm.as_str().to_string())
            .or_insert(0) += 1;
        if let Some(video) = catalog.get_video(entry.video_id).await? {
            *top_categories.entry(video.category).or_insert(0) += 1;
        }
    }

    let window_start = now - Duration::days(i64::from(timeframe_days));
    let in_window = entries
        .iter()
        .filter(|r| r.generated_at >= window_start)
        .count();

    Ok(AnalyticsReport {
        total_recommendations: entries.len(),
        algorithms_used,
        average_score: mean_score(&entries),
        top_categories,
        recommendation_frequency: FrequencyReport {
            total: in_window,
            average_per_day: in_window as f64 / f64::from(timeframe_days),
        },
    })
}

/// Quality metrics for entries generated within the trailing
/// `timeframe_days`, optionally restricted to one algorithm.
///
/// The three score buckets partition every counted entry exactly.
pub async fn performance(
    profiles: &dyn ProfileStore,
    ledger: &dyn LedgerStore,
    user_id: Uuid,
    algorithm: Option<Algorithm>,
    timeframe_days: u32,
    now: DateTime<Utc>,
) -> AppResult<PerformanceReport> {
    require_profile(profiles, user_id).await?;

    let window_start = now - Duration::days(i64::from(timeframe_days));
    let entries: Vec<Recommendation> = ledger
        .recent_for_user(user_id, PERFORMANCE_SAMPLE)
        .await?
        .into_iter()
        .filter(|r| r.generated_at >= window_start)
        .filter(|r| algorithm.map_or(true, |a| r.algorithm == a))
        .collect();

    let mut score_distribution = ScoreDistribution::default();
    let mut algorithm_breakdown: BTreeMap<String, u64> = BTreeMap::new();
    let mut top_reasons: BTreeMap<String, u64> = BTreeMap::new();
    for entry in &entries {
        score_distribution.record(entry.score);
        *algorithm_breakdown
            .entry(entry.algorithm.as_str().to_string())
            .or_insert(0) += 1;
        *top_reasons.entry(entry.reason.clone()).or_insert(0) += 1;
    }

    Ok(PerformanceReport {
        total_recommendations: entries.len(),
        average_score: mean_score(&entries),
        score_distribution,
        algorithm_breakdown,
        top_reasons,
    })
}

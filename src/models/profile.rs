use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's declared taste profile, read-only to the rankers.
///
/// Mutated only through [`PreferencesUpdate`]; empty preference lists mean
/// "no filter" rather than "match nothing".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TasteProfile {
    pub user_id: Uuid,
    pub preferred_categories: Vec<String>,
    pub preferred_languages: Vec<String>,
    pub watch_history_enabled: bool,
    /// Freeform per-user tuning knobs, opaque to the engine
    pub recommendation_preferences: serde_json::Value,
}

impl TasteProfile {
    /// Creates an empty profile for a new user
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            preferred_categories: Vec::new(),
            preferred_languages: Vec::new(),
            watch_history_enabled: true,
            recommendation_preferences: serde_json::json!({}),
        }
    }

    /// Applies an update, leaving absent fields untouched
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(categories) = update.preferred_categories {
            self.preferred_categories = categories;
        }
        if let Some(languages) = update.preferred_languages {
            self.preferred_languages = languages;
        }
        if let Some(enabled) = update.watch_history_enabled {
            self.watch_history_enabled = enabled;
        }
        if let Some(prefs) = update.recommendation_preferences {
            self.recommendation_preferences = prefs;
        }
    }
}

/// Partial preferences update with a closed field set.
///
/// Field names outside [`PreferencesUpdate::ALLOWED_FIELDS`] are rejected at
/// the API boundary before this struct is ever deserialized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub preferred_categories: Option<Vec<String>>,
    pub preferred_languages: Option<Vec<String>>,
    pub watch_history_enabled: Option<bool>,
    pub recommendation_preferences: Option<serde_json::Value>,
}

impl PreferencesUpdate {
    pub const ALLOWED_FIELDS: [&'static str; 4] = [
        "preferred_categories",
        "preferred_languages",
        "watch_history_enabled",
        "recommendation_preferences",
    ];
}

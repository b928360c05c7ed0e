pub mod analytics;
pub mod collaborative;
pub mod content_based;
pub mod hybrid;
pub mod ledger;
pub mod recommendations;
pub mod trending;

pub use ledger::RecommendedItem;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::TasteProfile;
use crate::store::ProfileStore;

/// Loads a profile or fails with the NotFound error every user-scoped
/// operation shares
pub(crate) async fn require_profile(
    profiles: &dyn ProfileStore,
    user_id: Uuid,
) -> AppResult<TasteProfile> {
    profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

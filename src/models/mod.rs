pub mod profile;
pub mod recommendation;
pub mod video;
pub mod watch_event;

pub use profile::{PreferencesUpdate, TasteProfile};
pub use recommendation::{build_batch, Algorithm, Recommendation};
pub use video::{Channel, Video, VideoStatus, VideoWithChannel};
pub use watch_event::{WatchEvent, WatchInput};

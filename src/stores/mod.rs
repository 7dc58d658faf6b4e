pub mod content;
pub mod genres;
pub mod preferences;
pub mod suggestions;

pub use content::{ContentStore, FeedRequest, FeedState};
pub use genres::GenreCache;
pub use preferences::{PreferenceStore, UserPreferences};
pub use suggestions::SuggestionEngine;

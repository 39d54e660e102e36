//! Flat key/value preference storage: typed values, an ordered map with
//! typed accessors, and a JSON-backed file store with atomic saves.

mod prefs;
mod store;

pub use prefs::{PrefValue, Prefs};
pub use store::PrefsStore;

/// Canonical preference keys.
pub mod keys {
    pub const LEVEL: &str = "player.level";
    pub const HIGHEST_LEVEL: &str = "player.highest_level";
    pub const GOLD: &str = "player.gold";
    pub const SPEED: &str = "settings.speed";
    pub const CUTSCENES: &str = "cutscenes.seen";
}

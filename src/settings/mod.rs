//! Live animation settings.
//!
//! [`AnimationSettings`] is a plain value; [`SettingsStore`] is the shared handle the animator and
//! compositor read on every tick so edits apply without restarting a run.

/// Setting values and option enums.
pub mod options;
/// Shared, versioned settings handle.
pub mod store;

pub use options::{AnimationSettings, LineStyle, MapStyle, ROUTE_WIDTH_PX, SettingChange};
pub use store::SettingsStore;

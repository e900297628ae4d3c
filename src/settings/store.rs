use std::sync::{Arc, PoisonError, RwLock};

use crate::foundation::error::FlyPathResult;
use crate::settings::options::{AnimationSettings, SettingChange};

#[derive(Debug, Default)]
struct Versioned {
    settings: AnimationSettings,
    revision: u64,
}

/// Shared handle to the single live [`AnimationSettings`] value.
///
/// Clones share state. Readers get a copy of the whole struct, so a tick never observes a
/// half-applied write.
#[derive(Clone, Debug, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<Versioned>>,
}

impl SettingsStore {
    /// Create a store holding validated `settings`.
    pub fn new(settings: AnimationSettings) -> FlyPathResult<Self> {
        settings.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Versioned {
                settings,
                revision: 0,
            })),
        })
    }

    /// Current settings.
    pub fn get(&self) -> AnimationSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .settings
    }

    /// Number of effective writes so far.
    pub fn revision(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .revision
    }

    /// Replace the whole settings struct.
    ///
    /// Returns `Ok(false)` when `next` equals the current value (nothing changes).
    pub fn replace(&self, next: AnimationSettings) -> FlyPathResult<bool> {
        next.validate()?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.settings == next {
            return Ok(false);
        }
        guard.settings = next;
        guard.revision += 1;
        tracing::debug!(revision = guard.revision, "settings updated");
        Ok(true)
    }

    /// Apply a single-field change; same semantics as [`SettingsStore::replace`].
    pub fn apply(&self, change: SettingChange) -> FlyPathResult<bool> {
        self.replace(self.get().with_change(change))
    }

    /// Live playback speed.
    pub fn speed(&self) -> f64 {
        self.get().speed
    }

    /// Live pause length in milliseconds.
    pub fn pause_ms(&self) -> u64 {
        self.get().pause_ms()
    }

    /// Live stop zoom.
    pub fn stop_zoom(&self) -> f64 {
        self.get().stop_zoom
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/store.rs"]
mod tests;

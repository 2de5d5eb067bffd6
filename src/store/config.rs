//! Store configuration.

use serde::{Deserialize, Serialize};

/// How subscribers are notified after a state change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMode {
    /// Call every subscriber on the dispatching thread before returning.
    Blocking,

    /// Queue one task per subscriber on the store's background worker.
    #[default]
    Concurrent,
}

impl NotifyMode {
    pub fn is_non_blocking(self) -> bool {
        matches!(self, Self::Concurrent)
    }
}

/// Settings for a [`StateStore`](super::StateStore).
///
/// Deserializable so it can be embedded in an application's own config;
/// missing fields fall back to the defaults.
///
/// ```rust
/// use unistate::store::{NotifyMode, StoreConfig};
///
/// let config = StoreConfig::default();
/// assert_eq!(config.notify_mode, NotifyMode::Concurrent);
/// assert_eq!(config.worker_name, "unistate-notify");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Default mode used by [`StateStore::dispatch`](super::StateStore::dispatch).
    pub notify_mode: NotifyMode,

    /// Thread name of the notification worker.
    pub worker_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notify_mode: NotifyMode::default(),
            worker_name: "unistate-notify".to_string(),
        }
    }
}

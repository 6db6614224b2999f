#[cfg(test)]
#[path = "system_test.rs"]
mod tests;

use std::env;

use tokio::sync::watch;

use crate::domain::models::Appearance;
use crate::domain::services::Writable;

/// Parses the `COLORFGBG` convention (`fg;bg` or `fg;default;bg`). Background
/// colors 0-6 and 8 are dark.
pub fn prefers_dark_from_colorfgbg(value: &str) -> Option<bool> {
    let background = value.split(';').last()?.trim().parse::<u8>().ok()?;
    return Some(matches!(background, 0..=6 | 8));
}

/// The light/dark signal as seen from a terminal. Clones share the signal, so
/// an override from one clone notifies every watcher.
#[derive(Clone)]
pub struct SystemAppearance {
    signal: Writable<bool>,
}

impl SystemAppearance {
    pub fn fixed(prefers_dark: bool) -> SystemAppearance {
        return SystemAppearance {
            signal: Writable::new(prefers_dark),
        };
    }

    /// Falls back to light when the terminal gives no hint.
    pub fn detect() -> SystemAppearance {
        let prefers_dark = env::var("COLORFGBG")
            .ok()
            .and_then(|value| return prefers_dark_from_colorfgbg(&value))
            .unwrap_or(false);

        tracing::debug!(prefers_dark = prefers_dark, "Detected terminal appearance");
        return SystemAppearance::fixed(prefers_dark);
    }

    /// Watchers only fire when the value actually flips.
    #[cfg(test)]
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.signal.update_if(|current| {
            if *current == prefers_dark {
                return false;
            }
            *current = prefers_dark;
            return true;
        });
    }
}

impl Appearance for SystemAppearance {
    fn prefers_dark(&self) -> bool {
        return self.signal.get();
    }

    fn watch(&self) -> watch::Receiver<bool> {
        return self.signal.subscribe();
    }
}

#[cfg(test)]
#[path = "themes_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::Writable;
use crate::domain::models::Appearance;
use crate::domain::models::AppearanceBox;
use crate::domain::models::DisplayTarget;
use crate::domain::models::DisplayTargetBox;
use crate::domain::models::ResolvedTheme;
use crate::domain::models::ThemeCache;
use crate::domain::models::ThemeCacheBox;
use crate::domain::models::ThemePreference;

/// Listener registered by `ThemeStore::watch_system_change`. Dropping it does
/// not stop the listener, call `stop`.
pub struct SystemWatch {
    handle: JoinHandle<()>,
}

impl SystemWatch {
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        return !self.handle.is_finished();
    }
}

#[derive(Clone)]
pub struct ThemeStore {
    preference: Writable<ThemePreference>,
    appearance: Arc<dyn Appearance + Send + Sync>,
    display: Arc<dyn DisplayTarget + Send + Sync>,
    cache: Option<Arc<dyn ThemeCache + Send + Sync>>,
}

impl ThemeStore {
    /// Starts from the cached preference, or `auto` when there is none.
    pub fn new(
        appearance: AppearanceBox,
        display: DisplayTargetBox,
        cache: Option<ThemeCacheBox>,
    ) -> ThemeStore {
        let cache: Option<Arc<dyn ThemeCache + Send + Sync>> = cache.map(Arc::from);
        let initial = cache
            .as_ref()
            .and_then(|cache| return cache.get())
            .and_then(|cached| return ThemePreference::parse(&cached))
            .unwrap_or_default();

        return ThemeStore {
            preference: Writable::new(initial),
            appearance: Arc::from(appearance),
            display: Arc::from(display),
            cache,
        };
    }

    pub fn get(&self) -> ThemePreference {
        return self.preference.get();
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemePreference> {
        return self.preference.subscribe();
    }

    pub fn resolve(&self, preference: ThemePreference) -> ResolvedTheme {
        match preference {
            ThemePreference::Light => return ResolvedTheme::Light,
            ThemePreference::Dark => return ResolvedTheme::Dark,
            ThemePreference::Auto => {
                return ResolvedTheme::from_prefers_dark(self.appearance.prefers_dark())
            }
        }
    }

    /// Paints the resolved theme and caches the raw preference.
    pub fn apply(&self, preference: ThemePreference) -> ResolvedTheme {
        let resolved = self.resolve(preference);
        self.display.set_theme(resolved);

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.set(&preference.to_string()) {
                tracing::warn!(preference = %preference, error = ?err, "Failed to cache theme");
            }
        }

        tracing::debug!(preference = %preference, resolved = %resolved, "Theme applied");
        return resolved;
    }

    pub fn set(&self, preference: ThemePreference) -> ResolvedTheme {
        self.preference.set(preference);
        return self.apply(preference);
    }

    /// Re-applies `auto` whenever the platform signal flips. The stored
    /// preference is never changed by this.
    pub fn watch_system_change(&self) -> SystemWatch {
        let store = self.clone();
        let mut signal = self.appearance.watch();
        signal.borrow_and_update();

        let handle = tokio::spawn(async move {
            while signal.changed().await.is_ok() {
                if store.get() == ThemePreference::Auto {
                    store.apply(ThemePreference::Auto);
                }
            }
        });

        return SystemWatch { handle };
    }
}

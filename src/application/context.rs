#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AppearanceBox;
use crate::domain::models::AppearanceName;
use crate::domain::models::PersistenceName;
use crate::domain::models::SettingsBackendBox;
use crate::domain::models::ThemeCacheBox;
use crate::domain::services::ChatStore;
use crate::domain::services::Settings;
use crate::domain::services::SettingsService;
use crate::domain::services::SettingsWriter;
use crate::domain::services::ThemeStore;
use crate::domain::services::Translations;
use crate::infrastructure::appearance::file_cache::FileThemeCache;
use crate::infrastructure::appearance::marker::ThemeMarker;
use crate::infrastructure::appearance::AppearanceManager;
use crate::infrastructure::persistence::PersistenceManager;

pub const DEFAULT_GREETING: &str = "Hi! Ask me anything.";

/// Every store the app uses, built once at startup and passed around by
/// handle. Must be created inside a tokio runtime.
pub struct AppContext {
    pub chat: ChatStore,
    pub settings: Settings,
    pub theme: ThemeStore,
    pub theme_marker: ThemeMarker,
    pub translations: Translations,
    settings_task: JoinHandle<Result<()>>,
}

impl AppContext {
    pub fn new(
        persistence: SettingsBackendBox,
        appearance: AppearanceBox,
        theme_cache: Option<ThemeCacheBox>,
        locale: &str,
    ) -> AppContext {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let settings = Settings::new(SettingsWriter::new(tx));

        let service_settings = settings.clone();
        let settings_task = tokio::spawn(async move {
            return SettingsService::start(persistence, service_settings, &mut rx).await;
        });

        let theme_marker = ThemeMarker::default();
        let theme = ThemeStore::new(appearance, Box::new(theme_marker.clone()), theme_cache);

        let translations = Translations::default();
        if let Err(err) = translations.load(locale) {
            tracing::warn!(locale = locale, error = ?err, "Failed to load translations");
        }

        return AppContext {
            chat: ChatStore::default(),
            settings,
            theme,
            theme_marker,
            translations,
            settings_task,
        };
    }

    pub fn from_config() -> Result<AppContext> {
        let persistence_name = Config::get(ConfigKey::Persistence);
        let persistence = match PersistenceName::parse(persistence_name.to_string()) {
            Some(name) => PersistenceManager::get(name)?,
            None => bail!(format!("No persistence named {persistence_name}")),
        };

        let appearance_name = Config::get(ConfigKey::Appearance);
        let appearance = match AppearanceName::parse(appearance_name.to_string()) {
            Some(name) => AppearanceManager::get(name)?,
            None => bail!(format!("No appearance named {appearance_name}")),
        };

        let theme_cache: Option<ThemeCacheBox> =
            match FileThemeCache::from_cache_dir(&Config::get(ConfigKey::CacheDir)) {
                Some(cache) => Some(Box::new(cache)),
                None => None,
            };

        return Ok(AppContext::new(
            persistence,
            appearance,
            theme_cache,
            &Config::get(ConfigKey::Locale),
        ));
    }

    pub fn greeting(&self) -> String {
        return self.translations.translate("chat.greeting").or(DEFAULT_GREETING);
    }

    /// Waits for the settings load and every queued write to finish.
    pub async fn settle(&self) -> Result<()> {
        if self.settings_task.is_finished() {
            bail!("Settings service stopped unexpectedly");
        }

        return self.settings.flush().await;
    }
}

#[cfg(test)]
#[path = "translations_test.rs"]
mod tests;

use std::collections::HashMap;

use anyhow::anyhow;
use anyhow::Result;
use rust_embed::RustEmbed;
use tokio::sync::watch;

use super::Writable;
use crate::domain::models::Translation;

pub const FALLBACK_LOCALE: &str = "en";

#[derive(RustEmbed)]
#[folder = "assets/locales/"]
struct LocaleAssets;

/// Display strings for the active locale. Lookups made before a catalog is
/// loaded come back `Pending`, and `subscribe_ready` fires once one is.
#[derive(Clone)]
pub struct Translations {
    catalog: Writable<Option<HashMap<String, String>>>,
    locale: Writable<Option<String>>,
    ready: Writable<bool>,
}

impl Default for Translations {
    fn default() -> Translations {
        return Translations {
            catalog: Writable::new(None),
            locale: Writable::new(None),
            ready: Writable::new(false),
        };
    }
}

impl Translations {
    pub fn list() -> Vec<String> {
        let mut locales = LocaleAssets::iter()
            .filter_map(|file| {
                return file
                    .strip_suffix(".json")
                    .map(|locale| return locale.to_string());
            })
            .collect::<Vec<String>>();
        locales.sort();

        return locales;
    }

    fn read_catalog(locale: &str) -> Result<HashMap<String, String>> {
        let file = LocaleAssets::get(&format!("{locale}.json"))
            .ok_or_else(|| return anyhow!("Locale {locale} does not exist in assets"))?;
        let catalog: HashMap<String, String> = serde_json::from_slice(&file.data)?;

        return Ok(catalog);
    }

    /// Loads the catalog for `locale`, or for the fallback locale when there is
    /// none. Accepts region tags such as `zh-CN` or `en_US.UTF-8`. Returns the
    /// locale actually loaded.
    pub fn load(&self, locale: &str) -> Result<String> {
        let language = locale
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        let (loaded, catalog) = match Translations::read_catalog(&language) {
            Ok(catalog) => (language, catalog),
            Err(err) => {
                tracing::debug!(locale = locale, error = ?err, "Falling back to default locale");
                (
                    FALLBACK_LOCALE.to_string(),
                    Translations::read_catalog(FALLBACK_LOCALE)?,
                )
            }
        };

        self.load_catalog(&loaded, catalog);
        return Ok(loaded);
    }

    pub fn load_catalog(&self, locale: &str, catalog: HashMap<String, String>) {
        self.catalog.set(Some(catalog));
        self.locale.set(Some(locale.to_string()));
        self.ready.update_if(|ready| {
            if *ready {
                return false;
            }
            *ready = true;
            return true;
        });
    }

    pub fn locale(&self) -> Option<String> {
        return self.locale.get();
    }

    pub fn is_ready(&self) -> bool {
        return self.ready.get();
    }

    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        return self.ready.subscribe();
    }

    pub fn translate(&self, key: &str) -> Translation {
        return self.catalog.with(|catalog| {
            let catalog = match catalog {
                Some(catalog) => catalog,
                None => return Translation::Pending,
            };

            match catalog.get(key) {
                Some(text) => return Translation::Ready(text.to_string()),
                None => return Translation::Missing,
            }
        });
    }
}

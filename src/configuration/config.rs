#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::Result;
use clap::ArgMatches;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use crate::domain::models::AppearanceName;
use crate::domain::models::PersistenceName;

pub const LOG_DIR_ENV: &str = "PROMPTBAR_LOG_DIR";
pub const DEBUG_LOG_FILE_NAME: &str = "debug.log";

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

/// Process level configuration. User settings live in the settings stores, not
/// here.
#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    Appearance,
    CacheDir,
    ConfigDir,
    Locale,
    Persistence,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::Appearance => return AppearanceName::System.to_string(),
            ConfigKey::CacheDir => {
                return dirs::cache_dir()
                    .map(|dir| return dir.join("promptbar").to_string_lossy().to_string())
                    .unwrap_or_default();
            }
            ConfigKey::ConfigDir => {
                return dirs::config_dir()
                    .map(|dir| return dir.join("promptbar").to_string_lossy().to_string())
                    .unwrap_or_else(|| return ".promptbar".to_string());
            }
            ConfigKey::Locale => {
                let lang = env::var("LANG").unwrap_or_else(|_| return "".to_string());
                if lang.is_empty() || lang == "C" || lang == "POSIX" {
                    return "en".to_string();
                }
                return lang;
            }
            ConfigKey::Persistence => return PersistenceName::File.to_string(),
        }
    }

    /// Where `debug.log` goes. `PROMPTBAR_LOG_DIR` wins over the cache dir.
    pub fn log_dir() -> String {
        return env::var(LOG_DIR_ENV)
            .ok()
            .filter(|dir| return !dir.is_empty())
            .unwrap_or_else(|| return Config::default(ConfigKey::CacheDir));
    }

    pub fn log_path() -> path::PathBuf {
        return path::PathBuf::from(Config::log_dir()).join(DEBUG_LOG_FILE_NAME);
    }

    pub fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            appearance = Config::get(ConfigKey::Appearance),
            cache_dir = Config::get(ConfigKey::CacheDir),
            config_dir = Config::get(ConfigKey::ConfigDir),
            locale = Config::get(ConfigKey::Locale),
            persistence = Config::get(ConfigKey::Persistence),
            "config"
        );

        return Ok(());
    }
}

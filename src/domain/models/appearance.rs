use anyhow::Result;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::sync::watch;

use super::ResolvedTheme;

/// The platform light/dark signal.
pub trait Appearance {
    /// Snapshot of the signal at call time.
    fn prefers_dark(&self) -> bool;

    /// Receiver notified whenever the signal flips.
    fn watch(&self) -> watch::Receiver<bool>;
}

/// Where the resolved theme marker is written.
pub trait DisplayTarget {
    fn set_theme(&self, theme: ResolvedTheme);
}

/// Local cache holding the raw theme preference string.
pub trait ThemeCache {
    fn get(&self) -> Option<String>;
    fn set(&self, value: &str) -> Result<()>;
}

pub type AppearanceBox = Box<dyn Appearance + Send + Sync>;
pub type DisplayTargetBox = Box<dyn DisplayTarget + Send + Sync>;
pub type ThemeCacheBox = Box<dyn ThemeCache + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AppearanceName {
    /// Reads the terminal's background color hint.
    System,
    Light,
    Dark,
}

impl AppearanceName {
    pub fn parse(text: String) -> Option<AppearanceName> {
        return AppearanceName::iter().find(|e| return e.to_string() == text);
    }
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, EnumVariantNames, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ThemePreference {
    pub fn parse(text: &str) -> Option<ThemePreference> {
        let text = text.trim();
        return ThemePreference::iter().find(|e| return e.to_string() == text);
    }
}

/// What actually gets painted. `Auto` never makes it this far.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn from_prefers_dark(prefers_dark: bool) -> ResolvedTheme {
        if prefers_dark {
            return ResolvedTheme::Dark;
        }
        return ResolvedTheme::Light;
    }
}

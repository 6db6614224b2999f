#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// Every key the settings stores mirror into the persisted bundle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter, EnumVariantNames, strum::Display)]
pub enum SettingsKey {
    #[strum(serialize = "api_key")]
    ApiKey,
    #[strum(serialize = "api_url")]
    ApiUrl,
    #[strum(serialize = "api_type")]
    ApiType,
    #[strum(serialize = "model_name")]
    ModelName,
    #[strum(serialize = "shortcut")]
    Shortcut,
    #[strum(serialize = "system_prompt")]
    SystemPrompt,
    #[strum(serialize = "clear_chat_shortcut")]
    ClearChatShortcut,
    #[strum(serialize = "selectedSystemPromptPreset")]
    SelectedSystemPromptPreset,
    #[strum(serialize = "borderless")]
    Borderless,
    #[strum(serialize = "borderless_shortcut")]
    BorderlessShortcut,
}

impl SettingsKey {
    pub fn parse(text: &str) -> Option<SettingsKey> {
        return SettingsKey::iter().find(|e| return e.to_string() == text);
    }

    pub fn default_value(&self) -> SettingValue {
        let text = match self {
            SettingsKey::ApiKey => "",
            SettingsKey::ApiUrl => "https://api.openai.com/v1/chat/completions",
            SettingsKey::ApiType => "openai",
            SettingsKey::ModelName => "gpt-4o-mini",
            SettingsKey::Shortcut => "Alt+Space",
            SettingsKey::SystemPrompt => "You are a helpful assistant. Please answer questions as concisely and effectively as possible.",
            SettingsKey::ClearChatShortcut => "Ctrl+Q",
            SettingsKey::SelectedSystemPromptPreset => "default",
            SettingsKey::BorderlessShortcut => "Alt+B",

            SettingsKey::Borderless => return SettingValue::Flag(false),
        };

        return SettingValue::Text(text.to_string());
    }

    /// An empty persisted value for these keys is treated as unset.
    pub fn requires_value(&self) -> bool {
        return matches!(
            self,
            SettingsKey::ApiUrl
                | SettingsKey::ModelName
                | SettingsKey::Shortcut
                | SettingsKey::SystemPrompt
        );
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Text(String),
    /// Anything else found in the bundle. Kept so writes don't drop it.
    Other(serde_json::Value),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SettingValue::Flag(val) => return write!(f, "{val}"),
            SettingValue::Text(val) => return write!(f, "{val}"),
            SettingValue::Other(val) => return write!(f, "{val}"),
        }
    }
}

/// Scalar types a setting store can hold.
pub trait SettingType: Clone + PartialEq + Send + Sync + 'static {
    fn from_setting(value: &SettingValue) -> Option<Self>;
    fn into_setting(self) -> SettingValue;
    fn is_blank(&self) -> bool;
}

impl SettingType for String {
    fn from_setting(value: &SettingValue) -> Option<String> {
        if let SettingValue::Text(text) = value {
            return Some(text.to_string());
        }
        return None;
    }

    fn into_setting(self) -> SettingValue {
        return SettingValue::Text(self);
    }

    fn is_blank(&self) -> bool {
        return self.is_empty();
    }
}

impl SettingType for bool {
    fn from_setting(value: &SettingValue) -> Option<bool> {
        if let SettingValue::Flag(flag) = value {
            return Some(*flag);
        }
        return None;
    }

    fn into_setting(self) -> SettingValue {
        return SettingValue::Flag(self);
    }

    fn is_blank(&self) -> bool {
        return false;
    }
}

/// The flat key/value document the persistence backend loads and saves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsBundle(BTreeMap<String, SettingValue>);

impl SettingsBundle {
    pub fn get(&self, key: SettingsKey) -> Option<&SettingValue> {
        return self.0.get(&key.to_string());
    }

    pub fn insert(&mut self, key: SettingsKey, value: SettingValue) {
        self.0.insert(key.to_string(), value);
    }

    /// Copies every entry of `other` over this bundle.
    pub fn merge(&mut self, other: &SettingsBundle) {
        for (key, value) in other.0.iter() {
            self.0.insert(key.to_string(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        return self.0.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SystemPromptPreset {
    Default,
    Minimal,
    Custom,
}

impl SystemPromptPreset {
    pub fn parse(text: &str) -> Option<SystemPromptPreset> {
        return SystemPromptPreset::iter().find(|e| return e.to_string() == text);
    }

    /// Preset text, or `None` for `Custom` which defers to the `system_prompt`
    /// setting.
    pub fn text(&self) -> Option<&'static str> {
        match self {
            SystemPromptPreset::Default => return Some("You are a helpful assistant."),
            SystemPromptPreset::Minimal => return Some("Your function is to distill every query to its absolute essence. Provide the single most critical piece of information as a declarative statement. Maximum signal, zero noise. Your response should rarely exceed one sentence."),
            SystemPromptPreset::Custom => return None,
        }
    }
}

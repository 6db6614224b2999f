#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::watch;

use super::Writable;
use crate::domain::models::SettingType;
use crate::domain::models::SettingValue;
use crate::domain::models::SettingsBackendBox;
use crate::domain::models::SettingsBundle;
use crate::domain::models::SettingsKey;
use crate::domain::models::SystemPromptPreset;
use crate::domain::models::API_KEY_PLACEHOLDER;

pub enum SettingsCommand {
    Write(SettingsKey, SettingValue),
    Flush(oneshot::Sender<()>),
}

/// Handle used by settings stores to queue writes for the persistence task.
/// A detached writer has no task behind it.
#[derive(Clone)]
pub struct SettingsWriter {
    tx: Option<mpsc::UnboundedSender<SettingsCommand>>,
}

impl SettingsWriter {
    pub fn new(tx: mpsc::UnboundedSender<SettingsCommand>) -> SettingsWriter {
        return SettingsWriter { tx: Some(tx) };
    }

    pub fn detached() -> SettingsWriter {
        return SettingsWriter { tx: None };
    }

    pub fn write(&self, key: SettingsKey, value: SettingValue) {
        let tx = match &self.tx {
            Some(tx) => tx,
            None => {
                tracing::debug!(key = %key, "Detached settings write ignored");
                return;
            }
        };

        if let Err(err) = tx.send(SettingsCommand::Write(key, value)) {
            tracing::warn!(key = %key, error = ?err, "Settings writer is gone, write dropped");
        }
    }

    /// Resolves once every write queued before this call has been handled.
    pub async fn flush(&self) -> Result<()> {
        let tx = match &self.tx {
            Some(tx) => tx,
            None => bail!("Settings writer is detached"),
        };

        let (done_tx, done_rx) = oneshot::channel();
        tx.send(SettingsCommand::Flush(done_tx))?;
        done_rx.await?;

        return Ok(());
    }
}

/// A single named setting, held in memory and mirrored to the persisted bundle.
pub struct Setting<T> {
    key: SettingsKey,
    value: Writable<T>,
    touched: Arc<AtomicBool>,
    writer: SettingsWriter,
}

impl<T: Clone> Clone for Setting<T> {
    fn clone(&self) -> Setting<T> {
        return Setting {
            key: self.key,
            value: self.value.clone(),
            touched: Arc::clone(&self.touched),
            writer: self.writer.clone(),
        };
    }
}

impl<T: SettingType> Setting<T> {
    pub fn new(key: SettingsKey, default: T, writer: SettingsWriter) -> Setting<T> {
        return Setting {
            key,
            value: Writable::new(default),
            touched: Arc::new(AtomicBool::new(false)),
            writer,
        };
    }

    /// Same value and touched flag, but sets no longer reach the writer.
    pub fn detached(&self) -> Setting<T> {
        return Setting {
            writer: SettingsWriter::detached(),
            ..self.clone()
        };
    }

    pub fn get(&self) -> T {
        return self.value.get();
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        return self.value.subscribe();
    }

    /// Updates memory right away. Persistence happens later, in the background.
    pub fn set(&self, value: T) {
        let touched = &self.touched;
        let persisted = value.clone();
        self.value.update(|current| {
            touched.store(true, Ordering::SeqCst);
            *current = value;
        });

        self.writer.write(self.key, persisted.into_setting());
    }

    /// Takes the persisted value from `bundle` unless the setting has been set
    /// locally since startup. Returns whether the in-memory value was replaced.
    pub fn apply_persisted(&self, bundle: &SettingsBundle) -> bool {
        let persisted = match bundle.get(self.key).and_then(T::from_setting) {
            Some(val) => val,
            None => return false,
        };

        if persisted.is_blank() && self.key.requires_value() {
            return false;
        }

        let touched = &self.touched;
        return self.value.update_if(|current| {
            if touched.load(Ordering::SeqCst) || *current == persisted {
                return false;
            }
            *current = persisted;
            return true;
        });
    }
}

/// All settings the app knows about, each backed by its own store.
#[derive(Clone)]
pub struct Settings {
    pub api_key: Setting<String>,
    pub api_url: Setting<String>,
    pub api_type: Setting<String>,
    pub model_name: Setting<String>,
    pub shortcut: Setting<String>,
    pub system_prompt: Setting<String>,
    pub clear_chat_shortcut: Setting<String>,
    pub selected_system_prompt_preset: Setting<String>,
    pub borderless: Setting<bool>,
    pub borderless_shortcut: Setting<String>,
    writer: SettingsWriter,
}

fn text_setting(key: SettingsKey, writer: &SettingsWriter) -> Setting<String> {
    let default = String::from_setting(&key.default_value()).unwrap_or_default();
    return Setting::new(key, default, writer.clone());
}

fn flag_setting(key: SettingsKey, writer: &SettingsWriter) -> Setting<bool> {
    let default = bool::from_setting(&key.default_value()).unwrap_or_default();
    return Setting::new(key, default, writer.clone());
}

impl Settings {
    pub fn new(writer: SettingsWriter) -> Settings {
        return Settings {
            api_key: text_setting(SettingsKey::ApiKey, &writer),
            api_url: text_setting(SettingsKey::ApiUrl, &writer),
            api_type: text_setting(SettingsKey::ApiType, &writer),
            model_name: text_setting(SettingsKey::ModelName, &writer),
            shortcut: text_setting(SettingsKey::Shortcut, &writer),
            system_prompt: text_setting(SettingsKey::SystemPrompt, &writer),
            clear_chat_shortcut: text_setting(SettingsKey::ClearChatShortcut, &writer),
            selected_system_prompt_preset: text_setting(
                SettingsKey::SelectedSystemPromptPreset,
                &writer,
            ),
            borderless: flag_setting(SettingsKey::Borderless, &writer),
            borderless_shortcut: text_setting(SettingsKey::BorderlessShortcut, &writer),
            writer,
        };
    }

    /// A copy that can apply persisted values without keeping the writer task
    /// alive.
    pub fn detached(&self) -> Settings {
        return Settings {
            api_key: self.api_key.detached(),
            api_url: self.api_url.detached(),
            api_type: self.api_type.detached(),
            model_name: self.model_name.detached(),
            shortcut: self.shortcut.detached(),
            system_prompt: self.system_prompt.detached(),
            clear_chat_shortcut: self.clear_chat_shortcut.detached(),
            selected_system_prompt_preset: self.selected_system_prompt_preset.detached(),
            borderless: self.borderless.detached(),
            borderless_shortcut: self.borderless_shortcut.detached(),
            writer: SettingsWriter::detached(),
        };
    }

    fn text(&self, key: SettingsKey) -> Option<&Setting<String>> {
        let setting = match key {
            SettingsKey::ApiKey => &self.api_key,
            SettingsKey::ApiUrl => &self.api_url,
            SettingsKey::ApiType => &self.api_type,
            SettingsKey::ModelName => &self.model_name,
            SettingsKey::Shortcut => &self.shortcut,
            SettingsKey::SystemPrompt => &self.system_prompt,
            SettingsKey::ClearChatShortcut => &self.clear_chat_shortcut,
            SettingsKey::SelectedSystemPromptPreset => &self.selected_system_prompt_preset,
            SettingsKey::BorderlessShortcut => &self.borderless_shortcut,
            SettingsKey::Borderless => return None,
        };

        return Some(setting);
    }

    pub fn get(&self, key: SettingsKey) -> SettingValue {
        if let Some(setting) = self.text(key) {
            return SettingValue::Text(setting.get());
        }
        return SettingValue::Flag(self.borderless.get());
    }

    /// Sets a setting from its textual form, as typed on the command line.
    pub fn set(&self, key: SettingsKey, raw: &str) -> Result<()> {
        if let Some(setting) = self.text(key) {
            setting.set(raw.to_string());
            return Ok(());
        }

        match raw.trim() {
            "true" => self.borderless.set(true),
            "false" => self.borderless.set(false),
            _ => bail!(format!("{key} expects true or false, got '{raw}'")),
        }

        return Ok(());
    }

    /// Pulls persisted values into every setting that hasn't been set locally.
    pub fn apply(&self, bundle: &SettingsBundle) -> usize {
        let mut applied = 0;
        for key in [
            SettingsKey::ApiKey,
            SettingsKey::ApiUrl,
            SettingsKey::ApiType,
            SettingsKey::ModelName,
            SettingsKey::Shortcut,
            SettingsKey::SystemPrompt,
            SettingsKey::ClearChatShortcut,
            SettingsKey::SelectedSystemPromptPreset,
            SettingsKey::BorderlessShortcut,
        ] {
            if let Some(setting) = self.text(key) {
                if setting.apply_persisted(bundle) {
                    applied += 1;
                }
            }
        }

        if self.borderless.apply_persisted(bundle) {
            applied += 1;
        }

        return applied;
    }

    pub fn effective_system_prompt(&self) -> String {
        let selected = self.selected_system_prompt_preset.get();
        let preset = SystemPromptPreset::parse(&selected).unwrap_or(SystemPromptPreset::Default);
        if let Some(text) = preset.text() {
            return text.to_string();
        }

        return self.system_prompt.get();
    }

    pub fn api_key_configured(&self) -> bool {
        let api_key = self.api_key.get();
        return !api_key.trim().is_empty() && api_key != API_KEY_PLACEHOLDER;
    }

    pub async fn flush(&self) -> Result<()> {
        return self.writer.flush().await;
    }
}

/// The bundle as last loaded, plus writes that haven't reached it yet.
#[derive(Default)]
struct Mirror {
    base: Option<SettingsBundle>,
    pending: SettingsBundle,
}

pub struct SettingsService {}

impl SettingsService {
    async fn load(backend: &SettingsBackendBox, settings: &Settings, mirror: &mut Mirror) {
        match backend.load().await {
            Ok(bundle) => {
                if bundle.is_empty() {
                    tracing::debug!("No persisted settings yet");
                }
                let applied = settings.apply(&bundle);
                tracing::debug!(keys = bundle.len(), applied = applied, "Settings loaded");
                mirror.base = Some(bundle);
            }
            Err(err) => {
                tracing::debug!(error = ?err, "Settings failed to load, keeping defaults");
            }
        }
    }

    async fn write(
        backend: &SettingsBackendBox,
        settings: &Settings,
        mirror: &mut Mirror,
        key: SettingsKey,
        value: SettingValue,
    ) {
        mirror.pending.insert(key, value);

        if mirror.base.is_none() {
            SettingsService::load(backend, settings, mirror).await;
        }

        let mut merged = match &mirror.base {
            Some(base) => base.clone(),
            None => {
                tracing::warn!(key = %key, "Settings were never loaded, write deferred");
                return;
            }
        };
        merged.merge(&mirror.pending);
        mirror.pending = SettingsBundle::default();

        if let Err(err) = backend.save(&merged).await {
            tracing::warn!(key = %key, error = ?err, "Failed to save settings");
        }
        mirror.base = Some(merged);
    }

    /// Owns the persisted bundle. Loads it once, then applies queued writes one
    /// at a time so no write can clobber another. Returns once every writer
    /// handle has been dropped.
    pub async fn start(
        backend: SettingsBackendBox,
        settings: Settings,
        rx: &mut mpsc::UnboundedReceiver<SettingsCommand>,
    ) -> Result<()> {
        // Holding a sender here would keep the channel open forever.
        let applier = settings.detached();
        drop(settings);

        let mut mirror = Mirror::default();
        SettingsService::load(&backend, &applier, &mut mirror).await;

        while let Some(command) = rx.recv().await {
            match command {
                SettingsCommand::Write(key, value) => {
                    SettingsService::write(&backend, &applier, &mut mirror, key, value).await;
                }
                SettingsCommand::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }

        tracing::debug!("Settings writer stopped");
        return Ok(());
    }
}

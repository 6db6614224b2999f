#[cfg(test)]
#[path = "json_file_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::SettingsBackend;
use crate::domain::models::SettingsBundle;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Persists the bundle as pretty printed JSON in the app config directory.
pub struct JsonFileBackend {
    pub config_dir: path::PathBuf,
}

impl JsonFileBackend {
    pub fn new(config_dir: path::PathBuf) -> JsonFileBackend {
        return JsonFileBackend { config_dir };
    }

    pub fn file_path(&self) -> path::PathBuf {
        return self.config_dir.join(SETTINGS_FILE_NAME);
    }
}

#[async_trait]
impl SettingsBackend for JsonFileBackend {
    #[allow(clippy::implicit_return)]
    async fn load(&self) -> Result<SettingsBundle> {
        let file_path = self.file_path();
        if !file_path.exists() {
            return Ok(SettingsBundle::default());
        }

        let payload = fs::read_to_string(&file_path).await?;
        match serde_json::from_str::<SettingsBundle>(&payload) {
            Ok(bundle) => return Ok(bundle),
            Err(err) => {
                // Unreadable files get replaced on the next save.
                tracing::warn!(path = ?file_path, error = ?err, "Settings file is not a valid bundle");
                return Ok(SettingsBundle::default());
            }
        }
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, bundle: &SettingsBundle) -> Result<()> {
        let payload = serde_json::to_string_pretty(bundle)?;

        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).await?;
        }

        let tmp_path = self.config_dir.join(format!("{SETTINGS_FILE_NAME}.tmp"));
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        fs::rename(&tmp_path, self.file_path()).await?;

        return Ok(());
    }
}

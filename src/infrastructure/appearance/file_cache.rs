#[cfg(test)]
#[path = "file_cache_test.rs"]
mod tests;

use std::fs;
use std::path;

use anyhow::Result;

use crate::domain::models::ThemeCache;

pub const THEME_CACHE_FILE_NAME: &str = "theme";

/// Stores the raw theme preference in a single file under the cache directory.
pub struct FileThemeCache {
    pub file_path: path::PathBuf,
}

impl FileThemeCache {
    pub fn new(cache_dir: path::PathBuf) -> FileThemeCache {
        return FileThemeCache {
            file_path: cache_dir.join(THEME_CACHE_FILE_NAME),
        };
    }

    /// `None` when there is no cache directory to write to.
    pub fn from_cache_dir(cache_dir: &str) -> Option<FileThemeCache> {
        if cache_dir.trim().is_empty() {
            return None;
        }
        return Some(FileThemeCache::new(path::PathBuf::from(cache_dir)));
    }
}

impl ThemeCache for FileThemeCache {
    fn get(&self) -> Option<String> {
        let value = fs::read_to_string(&self.file_path).ok()?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        return Some(value.to_string());
    }

    fn set(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.file_path, value)?;
        return Ok(());
    }
}

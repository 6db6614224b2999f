use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::SettingsBundle;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PersistenceName {
    File,
    Memory,
}

impl PersistenceName {
    pub fn parse(text: String) -> Option<PersistenceName> {
        return PersistenceName::iter().find(|e| return e.to_string() == text);
    }
}

#[async_trait]
pub trait SettingsBackend {
    /// Returns the whole persisted bundle. A missing store is an empty bundle,
    /// not an error.
    async fn load(&self) -> Result<SettingsBundle>;

    /// Replaces the persisted bundle with `bundle`.
    async fn save(&self, bundle: &SettingsBundle) -> Result<()>;
}

pub type SettingsBackendBox = Box<dyn SettingsBackend + Send + Sync>;

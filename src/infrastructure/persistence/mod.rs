pub mod json_file;
pub mod memory;

use std::path;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::PersistenceName;
use crate::domain::models::SettingsBackendBox;

pub struct PersistenceManager {}

impl PersistenceManager {
    pub fn get(name: PersistenceName) -> Result<SettingsBackendBox> {
        if name == PersistenceName::File {
            let config_dir = path::PathBuf::from(Config::get(ConfigKey::ConfigDir));
            return Ok(Box::new(json_file::JsonFileBackend::new(config_dir)));
        }

        if name == PersistenceName::Memory {
            return Ok(Box::<memory::MemoryBackend>::default());
        }

        bail!(format!("No persistence implemented for {name}"))
    }
}

pub mod file_cache;
pub mod marker;
pub mod system;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::AppearanceBox;
use crate::domain::models::AppearanceName;

pub struct AppearanceManager {}

impl AppearanceManager {
    pub fn get(name: AppearanceName) -> Result<AppearanceBox> {
        if name == AppearanceName::System {
            return Ok(Box::new(system::SystemAppearance::detect()));
        }

        if name == AppearanceName::Light {
            return Ok(Box::new(system::SystemAppearance::fixed(false)));
        }

        if name == AppearanceName::Dark {
            return Ok(Box::new(system::SystemAppearance::fixed(true)));
        }

        bail!(format!("No appearance implemented for {name}"))
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::SettingsBackend;
use crate::domain::models::SettingsBundle;

/// Keeps the bundle for the lifetime of the process only. Clones share state.
/// Tests can switch either call to fail.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    bundle: Arc<Mutex<SettingsBundle>>,
    fail_load: Arc<AtomicBool>,
    fail_save: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl MemoryBackend {
    pub fn bundle(&self) -> Result<SettingsBundle> {
        let bundle = self
            .bundle
            .lock()
            .map_err(|_| return anyhow!("Memory settings lock poisoned"))?;
        return Ok(bundle.clone());
    }
}

#[cfg(test)]
impl MemoryBackend {
    pub fn with_bundle(bundle: SettingsBundle) -> MemoryBackend {
        let backend = MemoryBackend::default();
        *backend.bundle.lock().unwrap() = bundle;
        return backend;
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        return self.saves.load(Ordering::SeqCst);
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    #[allow(clippy::implicit_return)]
    async fn load(&self) -> Result<SettingsBundle> {
        if self.fail_load.load(Ordering::SeqCst) {
            bail!("Memory settings backend refused to load");
        }

        return self.bundle();
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, bundle: &SettingsBundle) -> Result<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            bail!("Memory settings backend refused to save");
        }

        let mut stored = self
            .bundle
            .lock()
            .map_err(|_| return anyhow!("Memory settings lock poisoned"))?;
        *stored = bundle.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);

        return Ok(());
    }
}

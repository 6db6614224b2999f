use anyhow::Result;

use super::MemoryBackend;
use crate::domain::models::SettingValue;
use crate::domain::models::SettingsBackend;
use crate::domain::models::SettingsBundle;
use crate::domain::models::SettingsKey;

fn bundle_with_key(value: &str) -> SettingsBundle {
    let mut bundle = SettingsBundle::default();
    bundle.insert(SettingsKey::ApiKey, SettingValue::Text(value.to_string()));
    return bundle;
}

#[tokio::test]
async fn it_loads_an_empty_bundle() -> Result<()> {
    let bundle = MemoryBackend::default().load().await?;
    assert!(bundle.is_empty());
    return Ok(());
}

#[tokio::test]
async fn it_saves_and_loads() -> Result<()> {
    let backend = MemoryBackend::default();
    backend.save(&bundle_with_key("sk-1")).await?;

    let bundle = backend.load().await?;
    assert_eq!(
        bundle.get(SettingsKey::ApiKey),
        Some(&SettingValue::Text("sk-1".to_string()))
    );
    assert_eq!(backend.save_count(), 1);
    return Ok(());
}

#[tokio::test]
async fn it_shares_state_between_clones() -> Result<()> {
    let backend = MemoryBackend::with_bundle(bundle_with_key("a"));
    let other = backend.clone();
    other.save(&bundle_with_key("b")).await?;

    assert_eq!(backend.bundle()?, bundle_with_key("b"));
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_request() -> Result<()> {
    let backend = MemoryBackend::with_bundle(bundle_with_key("a"));
    backend.set_fail_load(true);
    backend.set_fail_save(true);

    let load_err = backend.load().await.unwrap_err();
    insta::assert_snapshot!(load_err.to_string(), @"Memory settings backend refused to load");

    let save_err = backend.save(&bundle_with_key("b")).await.unwrap_err();
    insta::assert_snapshot!(save_err.to_string(), @"Memory settings backend refused to save");

    assert_eq!(backend.bundle()?, bundle_with_key("a"));
    assert_eq!(backend.save_count(), 0);
    return Ok(());
}

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::watch;
use tokio::time;

use super::ThemeStore;
use crate::domain::models::ResolvedTheme;
use crate::domain::models::ThemeCache;
use crate::domain::models::ThemeCacheBox;
use crate::domain::models::ThemePreference;
use crate::infrastructure::appearance::marker::ThemeMarker;
use crate::infrastructure::appearance::system::SystemAppearance;

#[derive(Clone, Default)]
struct RecordingCache {
    value: Arc<Mutex<Option<String>>>,
    broken: bool,
}

impl RecordingCache {
    fn with(value: &str) -> RecordingCache {
        return RecordingCache {
            value: Arc::new(Mutex::new(Some(value.to_string()))),
            broken: false,
        };
    }

    fn stored(&self) -> Option<String> {
        return self.value.lock().unwrap().clone();
    }
}

impl ThemeCache for RecordingCache {
    fn get(&self) -> Option<String> {
        return self.stored();
    }

    fn set(&self, value: &str) -> Result<()> {
        if self.broken {
            bail!("cache is read only");
        }
        *self.value.lock().unwrap() = Some(value.to_string());
        return Ok(());
    }
}

fn store_with(
    appearance: &SystemAppearance,
    marker: &ThemeMarker,
    cache: Option<&RecordingCache>,
) -> ThemeStore {
    let cache: Option<ThemeCacheBox> = match cache {
        Some(cache) => Some(Box::new(cache.clone())),
        None => None,
    };

    return ThemeStore::new(
        Box::new(appearance.clone()),
        Box::new(marker.clone()),
        cache,
    );
}

async fn next_marker(
    marker_rx: &mut watch::Receiver<Option<ResolvedTheme>>,
) -> Result<Option<ResolvedTheme>> {
    time::timeout(Duration::from_secs(2), marker_rx.changed()).await??;
    return Ok(*marker_rx.borrow_and_update());
}

#[test]
fn it_defaults_to_auto_without_a_cache() {
    let store = store_with(&SystemAppearance::fixed(false), &ThemeMarker::default(), None);
    assert_eq!(store.get(), ThemePreference::Auto);
}

#[test]
fn it_defaults_to_auto_with_an_empty_cache() {
    let cache = RecordingCache::default();
    let store = store_with(&SystemAppearance::fixed(false), &ThemeMarker::default(), Some(&cache));
    assert_eq!(store.get(), ThemePreference::Auto);
}

#[test]
fn it_defaults_to_auto_with_an_invalid_cache_value() {
    let cache = RecordingCache::with("sepia");
    let store = store_with(&SystemAppearance::fixed(false), &ThemeMarker::default(), Some(&cache));
    assert_eq!(store.get(), ThemePreference::Auto);
}

#[test]
fn it_starts_from_the_cached_preference() {
    let cache = RecordingCache::with("dark");
    let store = store_with(&SystemAppearance::fixed(false), &ThemeMarker::default(), Some(&cache));
    assert_eq!(store.get(), ThemePreference::Dark);
}

#[test]
fn it_resolves_fixed_preferences_regardless_of_the_signal() {
    for prefers_dark in [true, false] {
        let store = store_with(
            &SystemAppearance::fixed(prefers_dark),
            &ThemeMarker::default(),
            None,
        );
        assert_eq!(store.resolve(ThemePreference::Light), ResolvedTheme::Light);
        assert_eq!(store.resolve(ThemePreference::Dark), ResolvedTheme::Dark);
    }
}

#[test]
fn it_resolves_auto_from_the_signal_at_call_time() {
    let appearance = SystemAppearance::fixed(false);
    let store = store_with(&appearance, &ThemeMarker::default(), None);
    assert_eq!(store.resolve(ThemePreference::Auto), ResolvedTheme::Light);

    appearance.set_prefers_dark(true);
    assert_eq!(store.resolve(ThemePreference::Auto), ResolvedTheme::Dark);
}

#[test]
fn it_applies_the_resolved_theme_and_caches_the_raw_preference() {
    let marker = ThemeMarker::default();
    let cache = RecordingCache::default();
    let store = store_with(&SystemAppearance::fixed(true), &marker, Some(&cache));

    let resolved = store.apply(ThemePreference::Auto);

    assert_eq!(resolved, ResolvedTheme::Dark);
    assert_eq!(marker.current(), Some(ResolvedTheme::Dark));
    assert_eq!(cache.stored(), Some("auto".to_string()));
}

#[test]
fn it_applies_without_a_cache() {
    let marker = ThemeMarker::default();
    let store = store_with(&SystemAppearance::fixed(true), &marker, None);

    assert_eq!(store.apply(ThemePreference::Light), ResolvedTheme::Light);
    assert_eq!(marker.current(), Some(ResolvedTheme::Light));
}

#[test]
fn it_still_paints_when_the_cache_write_fails() {
    let marker = ThemeMarker::default();
    let cache = RecordingCache {
        broken: true,
        ..RecordingCache::default()
    };
    let store = store_with(&SystemAppearance::fixed(false), &marker, Some(&cache));

    store.apply(ThemePreference::Dark);

    assert_eq!(marker.current(), Some(ResolvedTheme::Dark));
    assert_eq!(cache.stored(), None);
}

#[test]
fn it_sets_stores_and_applies() {
    let marker = ThemeMarker::default();
    let cache = RecordingCache::default();
    let store = store_with(&SystemAppearance::fixed(false), &marker, Some(&cache));
    let mut rx = store.subscribe();

    store.set(ThemePreference::Dark);

    assert_eq!(store.get(), ThemePreference::Dark);
    assert_eq!(*rx.borrow_and_update(), ThemePreference::Dark);
    assert_eq!(marker.current(), Some(ResolvedTheme::Dark));
    assert_eq!(cache.stored(), Some("dark".to_string()));
}

#[tokio::test]
async fn it_reapplies_auto_when_the_system_changes() -> Result<()> {
    let appearance = SystemAppearance::fixed(false);
    let marker = ThemeMarker::default();
    let store = store_with(&appearance, &marker, None);
    store.set(ThemePreference::Auto);

    let mut marker_rx = marker.subscribe();
    marker_rx.borrow_and_update();
    let system_watch = store.watch_system_change();

    appearance.set_prefers_dark(true);
    assert_eq!(next_marker(&mut marker_rx).await?, Some(ResolvedTheme::Dark));
    assert_eq!(store.get(), ThemePreference::Auto);

    appearance.set_prefers_dark(false);
    assert_eq!(next_marker(&mut marker_rx).await?, Some(ResolvedTheme::Light));

    system_watch.stop();
    return Ok(());
}

#[tokio::test]
async fn it_ignores_system_changes_for_fixed_preferences() -> Result<()> {
    let appearance = SystemAppearance::fixed(false);
    let marker = ThemeMarker::default();
    let store = store_with(&appearance, &marker, None);
    store.set(ThemePreference::Light);

    let mut marker_rx = marker.subscribe();
    marker_rx.borrow_and_update();
    let system_watch = store.watch_system_change();

    appearance.set_prefers_dark(true);
    let res = time::timeout(Duration::from_millis(100), marker_rx.changed()).await;

    assert!(res.is_err());
    assert_eq!(marker.current(), Some(ResolvedTheme::Light));
    system_watch.stop();
    return Ok(());
}

#[tokio::test]
async fn it_stops_listening_once_stopped() -> Result<()> {
    let appearance = SystemAppearance::fixed(false);
    let marker = ThemeMarker::default();
    let store = store_with(&appearance, &marker, None);
    store.set(ThemePreference::Auto);

    let system_watch = store.watch_system_change();
    assert!(system_watch.is_active());
    system_watch.stop();
    tokio::task::yield_now().await;

    let mut marker_rx = marker.subscribe();
    marker_rx.borrow_and_update();
    appearance.set_prefers_dark(true);
    let res = time::timeout(Duration::from_millis(100), marker_rx.changed()).await;

    assert!(res.is_err());
    assert_eq!(marker.current(), Some(ResolvedTheme::Light));
    return Ok(());
}

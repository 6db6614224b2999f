use tokio::sync::watch;

use crate::domain::models::DisplayTarget;
use crate::domain::models::ResolvedTheme;
use crate::domain::services::Writable;

/// The resolved theme currently painted, readable by whatever renders.
#[derive(Clone)]
pub struct ThemeMarker {
    current: Writable<Option<ResolvedTheme>>,
}

impl Default for ThemeMarker {
    fn default() -> ThemeMarker {
        return ThemeMarker {
            current: Writable::new(None),
        };
    }
}

impl ThemeMarker {
    pub fn current(&self) -> Option<ResolvedTheme> {
        return self.current.get();
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ResolvedTheme>> {
        return self.current.subscribe();
    }
}

impl DisplayTarget for ThemeMarker {
    fn set_theme(&self, theme: ResolvedTheme) {
        self.current.set(Some(theme));
    }
}

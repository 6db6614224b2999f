/// Result of a translation lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    Ready(String),
    /// No catalog has been loaded yet.
    Pending,
    /// A catalog is loaded but has no entry for the key.
    Missing,
}

impl Translation {
    pub fn is_ready(&self) -> bool {
        return matches!(self, Translation::Ready(_));
    }

    pub fn or(self, fallback: &str) -> String {
        match self {
            Translation::Ready(text) => return text,
            _ => return fallback.to_string(),
        }
    }
}

mod chat;
mod settings;
mod themes;
mod translations;
mod writable;

pub use chat::*;
pub use settings::*;
pub use themes::*;
pub use translations::*;
pub use writable::*;

mod appearance;
mod conversation;
mod message;
mod persistence;
mod settings;
mod theme;
mod translation;

pub use appearance::*;
pub use conversation::*;
pub use message::*;
pub use persistence::*;
pub use settings::*;
pub use theme::*;
pub use translation::*;

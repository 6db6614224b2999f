use super::Message;
use super::Role;

/// Where a conversation stands relative to the placeholder greeting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConversationPhase {
    Empty,
    /// Only the assistant greeting is present. The next user message replaces it.
    SeededOnly,
    Active,
}

impl ConversationPhase {
    pub fn of(messages: &[Message]) -> ConversationPhase {
        if messages.is_empty() {
            return ConversationPhase::Empty;
        }

        if messages.len() == 1 && messages[0].role == Role::Assistant {
            return ConversationPhase::SeededOnly;
        }

        return ConversationPhase::Active;
    }
}

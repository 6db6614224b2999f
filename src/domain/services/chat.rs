#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use tokio::sync::watch;

use super::Writable;
use crate::domain::models::Attachment;
use crate::domain::models::ConversationMessage;
use crate::domain::models::ConversationPhase;
use crate::domain::models::Message;

/// The ordered list of chat turns shown in the chat window.
#[derive(Clone)]
pub struct ChatStore {
    messages: Writable<Vec<Message>>,
}

impl Default for ChatStore {
    fn default() -> ChatStore {
        return ChatStore {
            messages: Writable::new(vec![]),
        };
    }
}

impl ChatStore {
    pub fn messages(&self) -> Vec<Message> {
        return self.messages.get();
    }

    pub fn len(&self) -> usize {
        return self.messages.with(|messages| return messages.len());
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    pub fn phase(&self) -> ConversationPhase {
        return self
            .messages
            .with(|messages| return ConversationPhase::of(messages));
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        return self.messages.subscribe();
    }

    /// Drops everything and leaves only the assistant greeting.
    pub fn clear(&self, initial_content: &str) {
        self.messages.set(vec![Message::assistant(initial_content)]);
    }

    pub fn seed_if_empty(&self, initial_content: &str) {
        self.messages.update_if(|messages| {
            if !messages.is_empty() {
                return false;
            }
            messages.push(Message::assistant(initial_content));
            return true;
        });
    }

    /// The first real input replaces the greeting rather than following it.
    pub fn add_user_message(&self, content: &str, attachment: Option<Attachment>) {
        let message = Message::user(content, attachment);
        self.messages.update(|messages| {
            match ConversationPhase::of(messages) {
                ConversationPhase::SeededOnly => {
                    *messages = vec![message];
                }
                ConversationPhase::Empty | ConversationPhase::Active => {
                    messages.push(message);
                }
            }
        });
    }

    pub fn add_assistant_message(&self, content: &str) {
        self.messages.update(|messages| {
            messages.push(Message::assistant(content));
        });
    }

    /// Messages in the shape a model backend expects.
    pub fn conversation(&self) -> Vec<ConversationMessage> {
        return self.messages.with(|messages| {
            return messages
                .iter()
                .map(|message| return message.to_conversation())
                .collect::<Vec<ConversationMessage>>();
        });
    }
}

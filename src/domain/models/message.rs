#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content: String,
}

impl Attachment {
    pub fn new(name: &str, content: &str) -> Attachment {
        return Attachment {
            name: name.to_string(),
            content: content.to_string(),
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// The `{role, content}` pair a model backend receives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            role,
            content: content.to_string(),
            attachment: None,
        };
    }

    pub fn user(content: &str, attachment: Option<Attachment>) -> Message {
        return Message {
            role: Role::User,
            content: content.to_string(),
            attachment,
        };
    }

    pub fn assistant(content: &str) -> Message {
        return Message::new(Role::Assistant, content);
    }

    /// Flattens the attachment, if any, into a fenced block after the content.
    pub fn to_conversation(&self) -> ConversationMessage {
        let content = match &self.attachment {
            Some(attachment) => {
                let name = &attachment.name;
                let body = &attachment.content;
                if self.content.is_empty() {
                    format!("{name}:\n```\n{body}\n```")
                } else {
                    format!("{}\n\n{name}:\n```\n{body}\n```", self.content)
                }
            }
            None => self.content.to_string(),
        };

        return ConversationMessage {
            role: self.role,
            content,
        };
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Product;

use super::stylist::{GREETING, OPENING_SUGGESTIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a stylist conversation. Messages are created once and never
/// mutated; recommendations and follow-up suggestions ride on assistant
/// turns only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub suggestions: Vec<String>,
    pub products: Vec<Product>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
            suggestions: Vec::new(),
            products: Vec::new(),
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        products: Vec<Product>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
            suggestions,
            products,
        }
    }
}

/// Append-only conversation log, seeded with the stylist greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        let greeting = Message::assistant(
            GREETING,
            Vec::new(),
            OPENING_SUGGESTIONS
                .iter()
                .map(|item| (*item).to_string())
                .collect(),
        );
        Self {
            messages: vec![greeting],
        }
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.messages
            .last()
            .expect("conversation never empty after push")
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, Message, Role};

    #[test]
    fn new_conversation_opens_with_the_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.len(), 1);
        let opening = &conversation.messages()[0];
        assert_eq!(opening.role, Role::Assistant);
        assert!(opening.content.starts_with("Hi! I'm your AI personal stylist."));
        assert_eq!(opening.suggestions.len(), 4);
        assert!(opening.products.is_empty());
    }

    #[test]
    fn push_appends_in_order_and_returns_the_stored_message() {
        let mut conversation = Conversation::new();
        let user_id = {
            let stored = conversation.push(Message::user("hello"));
            assert_eq!(stored.role, Role::User);
            stored.id.clone()
        };
        conversation.push(Message::assistant("hi", Vec::new(), Vec::new()));

        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.messages()[1].id, user_id);
        assert_eq!(
            conversation.last().map(|message| message.role),
            Some(Role::Assistant)
        );
    }

    #[test]
    fn message_ids_are_unique() {
        let first = Message::user("a");
        let second = Message::user("a");
        assert_ne!(first.id, second.id);
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	System,
	User,
	Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role:    Role,
	pub content: String,
}

impl ChatMessage {
	pub fn user(content: impl Into<String>) -> Self {
		Self {
			role:    Role::User,
			content: content.into(),
		}
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self {
			role:    Role::Assistant,
			content: content.into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
	pub id:       Uuid,
	pub messages: Vec<ChatMessage>,
}

impl Conversation {
	pub fn new() -> Self {
		Self {
			id:       Uuid::new_v4(),
			messages: Vec::new(),
		}
	}

	/// Appends a message, dropping the oldest ones beyond `limit`.
	pub fn push_bounded(&mut self, message: ChatMessage, limit: usize) {
		self.messages.push(message);
		if self.messages.len() > limit {
			let excess = self.messages.len() - limit;
			self.messages.drain(..excess);
		}
	}
}

impl Default for Conversation {
	fn default() -> Self {
		Self::new()
	}
}

/// Conversation state keyed by chat id.
pub trait ConversationStore: Send + Sync + 'static {
	fn get(&self, chat_id: i64) -> Option<Conversation>;

	/// Stores `conversation` for `chat_id`, replacing whatever was there.
	fn put(&self, chat_id: i64, conversation: Conversation);
}

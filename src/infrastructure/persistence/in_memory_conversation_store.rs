use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::conversation_store::{Conversation, ConversationStore};

#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
	conversations: Arc<RwLock<HashMap<i64, Conversation>>>,
}

impl InMemoryConversationStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl ConversationStore for InMemoryConversationStore {
	fn get(&self, chat_id: i64) -> Option<Conversation> {
		let conversations =
			self.conversations.read().unwrap_or_else(|e| e.into_inner());
		conversations.get(&chat_id).cloned()
	}

	fn put(&self, chat_id: i64, conversation: Conversation) {
		let mut conversations =
			self.conversations.write().unwrap_or_else(|e| e.into_inner());
		conversations.insert(chat_id, conversation);
	}
}

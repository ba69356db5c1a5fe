use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::chat_backend::{ChatBackend, ChatError};
use crate::domain::conversation_store::{
	ChatMessage, Conversation, ConversationStore,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
	pub base_url:      String,
	pub api_key:       String,
	pub model:         String,
	pub history_limit: usize,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
	model:    &'a str,
	messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
	choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
	message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
	content: Option<String>,
}

/// Chat backend speaking the OpenAI chat-completions protocol. History lives
/// in the injected store, one bounded conversation per chat.
#[derive(Clone)]
pub struct OpenAiChatBackend<S: ConversationStore> {
	store:       S,
	http_client: Client,
	settings:    OpenAiSettings,
}

impl<S: ConversationStore> OpenAiChatBackend<S> {
	pub fn new(store: S, http_client: Client, settings: OpenAiSettings) -> Self {
		Self {
			store,
			http_client,
			settings,
		}
	}

	async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
		let url = format!(
			"{}/chat/completions",
			self.settings.base_url.trim_end_matches('/')
		);

		let response = self
			.http_client
			.post(url)
			.bearer_auth(&self.settings.api_key)
			.json(&CompletionRequest {
				model: &self.settings.model,
				messages,
			})
			.send()
			.await
			.map_err(|e| ChatError::Transport {
				reason: e.to_string(),
			})?;

		let status = response.status();
		if !status.is_success() {
			error!("Chat backend returned non-success status: {status}");
			return Err(ChatError::Remote {
				status: status.as_u16(),
			});
		}

		let completion: CompletionResponse =
			response.json().await.map_err(|e| ChatError::Protocol {
				reason: e.to_string(),
			})?;

		completion
			.choices
			.into_iter()
			.next()
			.and_then(|choice| choice.message.content)
			.ok_or_else(|| ChatError::Protocol {
				reason: "completion has no content".to_string(),
			})
	}
}

#[async_trait]
impl<S: ConversationStore> ChatBackend for OpenAiChatBackend<S> {
	async fn reset_conversation(&self, chat_id: i64) -> Result<(), ChatError> {
		let conversation = Conversation::new();
		info!("Chat {chat_id} starts conversation {}", conversation.id);
		self.store.put(chat_id, conversation);
		Ok(())
	}

	async fn send_message(
		&self,
		chat_id: i64,
		text: &str,
	) -> Result<String, ChatError> {
		let limit = self.settings.history_limit;
		let mut conversation = self.store.get(chat_id).unwrap_or_default();
		conversation.push_bounded(ChatMessage::user(text), limit);

		let reply = self.complete(&conversation.messages).await?;

		conversation.push_bounded(ChatMessage::assistant(reply.clone()), limit);
		self.store.put(chat_id, conversation);

		Ok(reply)
	}
}

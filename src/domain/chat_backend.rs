use async_trait::async_trait;
use derive_more::derive::{Display, Error};

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ChatError {
	#[display("could not reach the chat backend: {reason}")]
	Transport { reason: String },
	#[display("chat backend answered with status {status}")]
	Remote { status: u16 },
	#[display("chat backend sent a malformed response: {reason}")]
	Protocol { reason: String },
}

/// The conversational service behind the bot. Owns one conversation per
/// chat.
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
	async fn reset_conversation(&self, chat_id: i64) -> Result<(), ChatError>;

	async fn send_message(
		&self,
		chat_id: i64,
		text: &str,
	) -> Result<String, ChatError>;
}

use async_trait::async_trait;
use derive_more::derive::{Display, Error};

/// One inbound chat message, stripped of everything the bot does not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
	pub chat_id:    i64,
	pub message_id: i32,
	pub user_id:    u64,
	pub text:       String,
}

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum TransportError {
	#[display("could not deliver message to chat {chat_id}: {reason}")]
	Send { chat_id: i64, reason: String },
}

#[async_trait]
pub trait MessageSink: Send + Sync + 'static {
	async fn send(
		&self,
		chat_id: i64,
		reply_to_message_id: i32,
		text: &str,
	) -> Result<(), TransportError>;
}

#[async_trait]
pub trait UpdateHandler: Send + Sync + 'static {
	async fn handle(&self, update: InboundUpdate);
}

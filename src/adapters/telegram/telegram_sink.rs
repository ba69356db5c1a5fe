use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ReplyParameters};

use crate::domain::transport::{MessageSink, TransportError};

#[derive(Clone)]
pub struct TelegramSink {
	bot: Bot,
}

impl TelegramSink {
	pub fn new(bot: Bot) -> Self {
		Self { bot }
	}
}

#[async_trait]
impl MessageSink for TelegramSink {
	async fn send(
		&self,
		chat_id: i64,
		reply_to_message_id: i32,
		text: &str,
	) -> Result<(), TransportError> {
		self.bot
			.send_message(ChatId(chat_id), text)
			.reply_parameters(ReplyParameters::new(MessageId(reply_to_message_id)))
			.await
			.map(|_| ())
			.map_err(|e| TransportError::Send {
				chat_id,
				reason: e.to_string(),
			})
	}
}

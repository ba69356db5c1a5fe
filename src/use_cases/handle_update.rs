use async_trait::async_trait;
use log::{error, warn};

use crate::domain::authorization::AuthorizationPolicy;
use crate::domain::chat_backend::ChatBackend;
use crate::domain::command::Command;
use crate::domain::payment_provider::PaymentProvider;
use crate::domain::transport::{InboundUpdate, MessageSink, UpdateHandler};
use crate::use_cases::dispatch_command::{CommandDispatcher, DispatchContext};

pub const UNAUTHORIZED_TEXT: &str = "You are not authorized to use this bot.";

#[derive(Clone)]
pub struct HandleUpdateUseCase<P, C, S>
where
	P: PaymentProvider,
	C: ChatBackend,
	S: MessageSink,
{
	policy:     AuthorizationPolicy,
	dispatcher: CommandDispatcher<P, C>,
	sink:       S,
}

impl<P, C, S> HandleUpdateUseCase<P, C, S>
where
	P: PaymentProvider,
	C: ChatBackend,
	S: MessageSink,
{
	pub fn new(
		policy: AuthorizationPolicy,
		dispatcher: CommandDispatcher<P, C>,
		sink: S,
	) -> Self {
		Self {
			policy,
			dispatcher,
			sink,
		}
	}

	pub async fn execute(&self, update: InboundUpdate) {
		let reply = if self.policy.is_authorized(update.user_id) {
			let context = DispatchContext {
				chat_id: update.chat_id,
				user_id: update.user_id,
			};
			self.dispatcher
				.dispatch(Command::parse(&update.text), context)
				.await
		} else {
			warn!("User {} is not allowed to use this bot", update.user_id);
			UNAUTHORIZED_TEXT.to_string()
		};

		if let Err(e) = self
			.sink
			.send(update.chat_id, update.message_id, &reply)
			.await
		{
			error!("Error sending message: {e}");
		}
	}
}

#[async_trait]
impl<P, C, S> UpdateHandler for HandleUpdateUseCase<P, C, S>
where
	P: PaymentProvider,
	C: ChatBackend,
	S: MessageSink,
{
	async fn handle(&self, update: InboundUpdate) {
		self.execute(update).await
	}
}

use std::time::Duration;

use log::{error, info, warn};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::domain::chat_backend::ChatBackend;
use crate::domain::command::Command;
use crate::domain::payment::{
	OrderId, PaymentRequest, PaymentVerificationRequest,
};
use crate::domain::payment_provider::{
	CallContext, PaymentError, PaymentProvider,
};

pub const HELP_TEXT: &str = "Use /reload to reset conversation history, /pay \
                             to get a payment link and /check_payment to \
                             check its status.";
pub const WELCOME_TEXT: &str = "Welcome! Use /pay to initiate payment.";
pub const RELOAD_TEXT: &str = "Started a new conversation.";
pub const UNKNOWN_COMMAND_TEXT: &str =
	"Unknown command. Send /help to see available commands.";
pub const PAYMENT_CREATION_FAILED_TEXT: &str =
	"Could not create a payment. Please contact support.";
pub const PAYMENT_CHECK_FAILED_TEXT: &str =
	"Could not check the payment. Please contact support.";
pub const PAYMENT_RETRY_TEXT: &str =
	"The payment service is not responding. Please try again later.";
pub const PAYMENT_PENDING_TEXT: &str = "⏳ The payment has not been completed yet.";
pub const PAYMENT_NOT_FOUND_TEXT: &str =
	"No payment found for your account. Use /pay to get a payment link.";
pub const CHAT_FAILED_TEXT: &str =
	"The chat service is unavailable right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchContext {
	pub chat_id: i64,
	pub user_id: u64,
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
	pub payment_amount: Decimal,
	pub call_timeout:   Duration,
}

#[derive(Clone)]
pub struct CommandDispatcher<P: PaymentProvider, C: ChatBackend> {
	payment_provider: P,
	chat_backend:     C,
	settings:         DispatchSettings,
	shutdown:         CancellationToken,
}

impl<P: PaymentProvider, C: ChatBackend> CommandDispatcher<P, C> {
	pub fn new(
		payment_provider: P,
		chat_backend: C,
		settings: DispatchSettings,
		shutdown: CancellationToken,
	) -> Self {
		Self {
			payment_provider,
			chat_backend,
			settings,
			shutdown,
		}
	}

	/// Runs one command and returns the reply text. Never fails: collaborator
	/// errors are logged and turned into a reply.
	pub async fn dispatch(&self, command: Command, context: DispatchContext) -> String {
		match command {
			Command::Help => HELP_TEXT.to_string(),
			Command::Start => WELCOME_TEXT.to_string(),
			Command::Reload => self.reload(context).await,
			Command::Pay => self.pay(context).await,
			Command::CheckPayment => self.check_payment(context).await,
			Command::Unknown(label) => {
				info!("Unknown command '{label}' from user {}", context.user_id);
				UNKNOWN_COMMAND_TEXT.to_string()
			}
		}
	}

	fn call_context(&self) -> CallContext {
		CallContext::new(self.settings.call_timeout, self.shutdown.child_token())
	}

	async fn reload(&self, context: DispatchContext) -> String {
		match self.chat_backend.reset_conversation(context.chat_id).await {
			Ok(()) => RELOAD_TEXT.to_string(),
			Err(e) => {
				error!("Failed to reset conversation for chat {}: {e}", context.chat_id);
				CHAT_FAILED_TEXT.to_string()
			}
		}
	}

	async fn pay(&self, context: DispatchContext) -> String {
		let request = PaymentRequest {
			order_id:      OrderId::for_user(context.user_id),
			amount:        self.settings.payment_amount,
			payer_contact: payer_contact(context.user_id),
		};

		match self
			.payment_provider
			.create_payment(&self.call_context(), request)
			.await
		{
			Ok(response) => format!("Pay using this link: {}", response.payment_url),
			Err(e) => {
				error!("Failed to create payment for user {}: {e}", context.user_id);
				failure_reply(&e, PAYMENT_CREATION_FAILED_TEXT)
			}
		}
	}

	async fn check_payment(&self, context: DispatchContext) -> String {
		let request =
			PaymentVerificationRequest::for_order(OrderId::for_user(context.user_id));

		match self
			.payment_provider
			.verify_payment(&self.call_context(), request)
			.await
		{
			Ok(response) if response.is_paid => {
				info!("Payment confirmed for user {}", context.user_id);
				format!("✅ Payment confirmed. Amount: {}", response.amount)
			}
			Ok(_) => PAYMENT_PENDING_TEXT.to_string(),
			Err(PaymentError::NotFound { order_id }) => {
				warn!("No gateway order for {order_id}");
				PAYMENT_NOT_FOUND_TEXT.to_string()
			}
			Err(e) => {
				error!("Failed to verify payment for user {}: {e}", context.user_id);
				failure_reply(&e, PAYMENT_CHECK_FAILED_TEXT)
			}
		}
	}
}

fn payer_contact(user_id: u64) -> String {
	format!("user{user_id}@example.com")
}

fn failure_reply(error: &PaymentError, fallback: &str) -> String {
	match error {
		PaymentError::Transport { .. } => PAYMENT_RETRY_TEXT.to_string(),
		_ => fallback.to_string(),
	}
}

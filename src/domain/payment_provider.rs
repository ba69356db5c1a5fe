use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use tokio_util::sync::CancellationToken;

use crate::domain::payment::{
	PaymentRequest, PaymentResponse, PaymentVerificationRequest,
	PaymentVerificationResponse,
};

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum PaymentError {
	#[display("payment provider is misconfigured: {reason}")]
	Configuration { reason: String },
	#[display("could not reach the payment gateway: {reason}")]
	Transport { reason: String },
	#[display("payment gateway answered with status {status}")]
	Remote { status: u16 },
	#[display("payment gateway sent a malformed response: {reason}")]
	Protocol { reason: String },
	#[display("no order found for {order_id}")]
	NotFound { order_id: String },
}

impl PaymentError {
	pub fn configuration(reason: impl Into<String>) -> Self {
		PaymentError::Configuration {
			reason: reason.into(),
		}
	}

	pub fn transport(reason: impl Into<String>) -> Self {
		PaymentError::Transport {
			reason: reason.into(),
		}
	}

	pub fn protocol(reason: impl Into<String>) -> Self {
		PaymentError::Protocol {
			reason: reason.into(),
		}
	}
}

/// Cancellable execution context handed to every provider call.
#[derive(Debug, Clone)]
pub struct CallContext {
	timeout:      Duration,
	cancellation: CancellationToken,
}

impl CallContext {
	pub fn new(timeout: Duration, cancellation: CancellationToken) -> Self {
		Self {
			timeout,
			cancellation,
		}
	}

	pub fn with_timeout(timeout: Duration) -> Self {
		Self::new(timeout, CancellationToken::new())
	}

	/// Drives `operation` until it finishes, the deadline passes or the
	/// context is cancelled. The last two surface as transport errors.
	pub async fn run<T, F>(&self, operation: F) -> Result<T, PaymentError>
	where
		F: Future<Output = Result<T, PaymentError>>,
	{
		tokio::select! {
			_ = self.cancellation.cancelled() => {
				Err(PaymentError::transport("call cancelled"))
			}
			outcome = tokio::time::timeout(self.timeout, operation) => {
				outcome.unwrap_or_else(|_| {
					Err(PaymentError::transport(format!(
						"call timed out after {:?}",
						self.timeout
					)))
				})
			}
		}
	}
}

#[async_trait]
pub trait PaymentProvider: Send + Sync + 'static {
	/// Builds the link the payer follows to pay. Never waits for the payment
	/// itself and may be called again for the same order.
	async fn create_payment(
		&self,
		ctx: &CallContext,
		request: PaymentRequest,
	) -> Result<PaymentResponse, PaymentError>;

	/// Asks the gateway for the current state of an order. Unknown orders are
	/// reported as [`PaymentError::NotFound`], not as unpaid.
	async fn verify_payment(
		&self,
		ctx: &CallContext,
		request: PaymentVerificationRequest,
	) -> Result<PaymentVerificationResponse, PaymentError>;
}

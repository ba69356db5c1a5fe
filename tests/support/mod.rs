#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use paywall_bot::domain::chat_backend::{ChatBackend, ChatError};
use paywall_bot::domain::payment::{
	PaymentRequest, PaymentResponse, PaymentVerificationRequest,
	PaymentVerificationResponse,
};
use paywall_bot::domain::payment_provider::{
	CallContext, PaymentError, PaymentProvider,
};
use paywall_bot::domain::transport::{MessageSink, TransportError};

#[derive(Clone)]
pub struct FakePaymentProvider {
	pub created:    Arc<Mutex<Vec<PaymentRequest>>>,
	pub verified:   Arc<Mutex<Vec<PaymentVerificationRequest>>>,
	create_outcome: Option<PaymentError>,
	verify_outcome: Result<PaymentVerificationResponse, PaymentError>,
}

impl FakePaymentProvider {
	pub fn new() -> Self {
		Self {
			created:        Arc::new(Mutex::new(Vec::new())),
			verified:       Arc::new(Mutex::new(Vec::new())),
			create_outcome: None,
			verify_outcome: Err(PaymentError::NotFound {
				order_id: "unset".to_string(),
			}),
		}
	}

	pub fn failing_creation(mut self, error: PaymentError) -> Self {
		self.create_outcome = Some(error);
		self
	}

	pub fn verifying_with(
		mut self,
		outcome: Result<PaymentVerificationResponse, PaymentError>,
	) -> Self {
		self.verify_outcome = outcome;
		self
	}

	pub fn created(&self) -> Vec<PaymentRequest> {
		self.created.lock().unwrap().clone()
	}

	pub fn verified(&self) -> Vec<PaymentVerificationRequest> {
		self.verified.lock().unwrap().clone()
	}
}

#[async_trait]
impl PaymentProvider for FakePaymentProvider {
	async fn create_payment(
		&self,
		_ctx: &CallContext,
		request: PaymentRequest,
	) -> Result<PaymentResponse, PaymentError> {
		let order_id = request.order_id;
		self.created.lock().unwrap().push(request);
		match &self.create_outcome {
			Some(error) => Err(error.clone()),
			None => Ok(PaymentResponse {
				payment_url: format!("https://pay.test/?order={order_id}"),
			}),
		}
	}

	async fn verify_payment(
		&self,
		_ctx: &CallContext,
		request: PaymentVerificationRequest,
	) -> Result<PaymentVerificationResponse, PaymentError> {
		self.verified.lock().unwrap().push(request);
		self.verify_outcome.clone()
	}
}

#[derive(Clone)]
pub struct FakeChatBackend {
	pub resets:   Arc<Mutex<Vec<i64>>>,
	pub messages: Arc<Mutex<Vec<(i64, String)>>>,
	failure:      Option<ChatError>,
}

impl FakeChatBackend {
	pub fn new() -> Self {
		Self {
			resets:   Arc::new(Mutex::new(Vec::new())),
			messages: Arc::new(Mutex::new(Vec::new())),
			failure:  None,
		}
	}

	pub fn failing(mut self, error: ChatError) -> Self {
		self.failure = Some(error);
		self
	}

	pub fn resets(&self) -> Vec<i64> {
		self.resets.lock().unwrap().clone()
	}

	pub fn messages(&self) -> Vec<(i64, String)> {
		self.messages.lock().unwrap().clone()
	}
}

#[async_trait]
impl ChatBackend for FakeChatBackend {
	async fn reset_conversation(&self, chat_id: i64) -> Result<(), ChatError> {
		self.resets.lock().unwrap().push(chat_id);
		match &self.failure {
			Some(error) => Err(error.clone()),
			None => Ok(()),
		}
	}

	async fn send_message(
		&self,
		chat_id: i64,
		text: &str,
	) -> Result<String, ChatError> {
		self.messages.lock().unwrap().push((chat_id, text.to_string()));
		match &self.failure {
			Some(error) => Err(error.clone()),
			None => Ok(format!("echo: {text}")),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
	pub chat_id:             i64,
	pub reply_to_message_id: i32,
	pub text:                String,
}

#[derive(Clone, Default)]
pub struct RecordingSink {
	pub sent: Arc<Mutex<Vec<SentMessage>>>,
	failing:  bool,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing() -> Self {
		Self {
			failing: true,
			..Self::default()
		}
	}

	pub fn sent(&self) -> Vec<SentMessage> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl MessageSink for RecordingSink {
	async fn send(
		&self,
		chat_id: i64,
		reply_to_message_id: i32,
		text: &str,
	) -> Result<(), TransportError> {
		self.sent.lock().unwrap().push(SentMessage {
			chat_id,
			reply_to_message_id,
			text: text.to_string(),
		});
		if self.failing {
			return Err(TransportError::Send {
				chat_id,
				reason: "chat not found".to_string(),
			});
		}
		Ok(())
	}
}

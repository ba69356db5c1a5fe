use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::adapters::chat::openai_chat_backend::{
	DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiSettings,
};
use crate::adapters::payment::signed_gateway::{
	DEFAULT_API_URL, DEFAULT_PAY_URL, GatewayCredentials,
};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub telegram_token:       String,
	#[serde(default)]
	pub allowed_user_ids:     Vec<u64>,
	pub gateway_merchant_id:  String,
	pub gateway_secret_word:  String,
	pub gateway_api_key:      Option<String>,
	#[serde(default = "default_gateway_pay_url")]
	pub gateway_pay_url:      String,
	#[serde(default = "default_gateway_api_url")]
	pub gateway_api_url:      String,
	#[serde(default = "default_gateway_timeout_secs")]
	pub gateway_timeout_secs: u64,
	#[serde(default = "default_payment_amount")]
	pub payment_amount:       Decimal,
	pub openai_api_key:       String,
	#[serde(default = "default_openai_base_url")]
	pub openai_base_url:      String,
	#[serde(default = "default_openai_model")]
	pub openai_model:         String,
	#[serde(default = "default_chat_timeout_secs")]
	pub chat_timeout_secs:    u64,
	#[serde(default = "default_chat_history_limit")]
	pub chat_history_limit:   usize,
	#[serde(default = "default_worker_idle_secs")]
	pub worker_idle_secs:     u64,
}

fn default_gateway_pay_url() -> String {
	DEFAULT_PAY_URL.to_string()
}

fn default_gateway_api_url() -> String {
	DEFAULT_API_URL.to_string()
}

fn default_gateway_timeout_secs() -> u64 {
	10
}

fn default_payment_amount() -> Decimal {
	Decimal::new(10000, 2)
}

fn default_openai_base_url() -> String {
	DEFAULT_BASE_URL.to_string()
}

fn default_openai_model() -> String {
	DEFAULT_MODEL.to_string()
}

fn default_chat_timeout_secs() -> u64 {
	60
}

fn default_chat_history_limit() -> usize {
	20
}

fn default_worker_idle_secs() -> u64 {
	300
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.add_source(
				config::Environment::with_prefix("APP")
					.list_separator(",")
					.with_list_parse_key("allowed_user_ids")
					.ignore_empty(true),
			)
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn gateway_credentials(&self) -> GatewayCredentials {
		GatewayCredentials {
			merchant_id: self.gateway_merchant_id.clone(),
			secret_word: self.gateway_secret_word.clone(),
			api_key:     self.gateway_api_key.clone(),
			pay_url:     self.gateway_pay_url.clone(),
			api_url:     self.gateway_api_url.clone(),
		}
	}

	pub fn openai_settings(&self) -> OpenAiSettings {
		OpenAiSettings {
			base_url:      self.openai_base_url.clone(),
			api_key:       self.openai_api_key.clone(),
			model:         self.openai_model.clone(),
			history_limit: self.chat_history_limit,
		}
	}

	pub fn gateway_timeout(&self) -> Duration {
		Duration::from_secs(self.gateway_timeout_secs)
	}

	pub fn chat_timeout(&self) -> Duration {
		Duration::from_secs(self.chat_timeout_secs)
	}

	pub fn worker_idle_timeout(&self) -> Duration {
		Duration::from_secs(self.worker_idle_secs)
	}
}

use std::error::Error;
use std::sync::Arc;

use log::info;
use reqwest::Client;
use teloxide::Bot;
use tokio_util::sync::CancellationToken;

use crate::adapters::chat::openai_chat_backend::OpenAiChatBackend;
use crate::adapters::payment::signed_gateway::SignedGatewayProvider;
use crate::adapters::telegram::telegram_sink::TelegramSink;
use crate::adapters::telegram::update_listener::listen;
use crate::domain::authorization::AuthorizationPolicy;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::persistence::in_memory_conversation_store::InMemoryConversationStore;
use crate::infrastructure::workers::chat_update_worker::ChatUpdateWorkerPool;
use crate::use_cases::dispatch_command::{CommandDispatcher, DispatchSettings};
use crate::use_cases::handle_update::HandleUpdateUseCase;

pub mod adapters {
	pub mod chat {
		pub mod openai_chat_backend;
	}
	pub mod payment {
		pub mod schema;
		pub mod signed_gateway;
	}
	pub mod telegram {
		pub mod telegram_sink;
		pub mod update_listener;
	}
}

pub mod domain {
	pub mod authorization;
	pub mod chat_backend;
	pub mod command;
	pub mod conversation_store;
	pub mod payment;
	pub mod payment_provider;
	pub mod transport;
}

pub mod infrastructure {
	pub mod config {
		pub mod settings;
	}
	pub mod persistence {
		pub mod in_memory_conversation_store;
	}
	pub mod workers {
		pub mod chat_update_worker;
	}
}

pub mod use_cases {
	pub mod dispatch_command;
	pub mod handle_update;
}

pub async fn run(config: Arc<Config>) -> Result<(), Box<dyn Error>> {
	let gateway_client = Client::builder().timeout(config.gateway_timeout()).build()?;
	let chat_client = Client::builder().timeout(config.chat_timeout()).build()?;

	let payment_provider =
		SignedGatewayProvider::new(config.gateway_credentials(), gateway_client);
	let chat_backend = OpenAiChatBackend::new(
		InMemoryConversationStore::new(),
		chat_client,
		config.openai_settings(),
	);

	let policy = AuthorizationPolicy::new(config.allowed_user_ids.iter().copied());
	if policy.is_open() {
		info!("No allow-list configured, the bot is open to every user");
	} else {
		info!("Bot restricted to {} users", config.allowed_user_ids.len());
	}

	let shutdown = CancellationToken::new();
	let dispatcher = CommandDispatcher::new(
		payment_provider,
		chat_backend,
		DispatchSettings {
			payment_amount: config.payment_amount,
			call_timeout:   config.gateway_timeout(),
		},
		shutdown.clone(),
	);

	let bot = Bot::new(&config.telegram_token);
	let handle_update =
		HandleUpdateUseCase::new(policy, dispatcher, TelegramSink::new(bot.clone()));
	let pool =
		ChatUpdateWorkerPool::new(Arc::new(handle_update), config.worker_idle_timeout());

	info!("Starting Telegram bot...");
	listen(bot, pool.clone()).await;

	info!("Telegram dispatcher stopped, finishing queued updates");
	pool.drain().await;
	shutdown.cancel();
	info!("Shutdown complete");
	Ok(())
}

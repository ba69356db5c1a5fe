use log::{debug, info, warn};
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;

use crate::domain::transport::{InboundUpdate, UpdateHandler};
use crate::infrastructure::workers::chat_update_worker::ChatUpdateWorkerPool;

/// Keeps what the bot needs from a Telegram message. Messages without a
/// sender are skipped; media without text still gets an update with empty
/// text so the sender receives a reply.
pub fn inbound_update(msg: &Message) -> Option<InboundUpdate> {
	let user = msg.from.as_ref()?;
	let text = msg.text().unwrap_or_default();

	Some(InboundUpdate {
		chat_id:    msg.chat.id.0,
		message_id: msg.id.0,
		user_id:    user.id.0,
		text:       text.to_string(),
	})
}

/// Long-polls Telegram and hands every message to the worker pool. Returns
/// once the dispatcher stops on Ctrl-C or SIGTERM.
pub async fn listen<H: UpdateHandler>(bot: Bot, pool: ChatUpdateWorkerPool<H>) {
	let handler = Update::filter_message().endpoint(move |msg: Message| {
		let pool = pool.clone();
		async move {
			match inbound_update(&msg) {
				Some(update) => pool.submit(update),
				None => debug!("Ignoring message {} in chat {}", msg.id.0, msg.chat.id.0),
			}
			respond(())
		}
	});

	info!("Listening for Telegram updates...");
	let mut dispatcher = Dispatcher::builder(bot, handler)
		.enable_ctrlc_handler()
		.build();
	stop_on_sigterm(dispatcher.shutdown_token());
	dispatcher.dispatch().await;
}

#[cfg(unix)]
fn stop_on_sigterm(token: ShutdownToken) {
	use tokio::signal::unix::{SignalKind, signal};

	tokio::spawn(async move {
		let mut terminate = match signal(SignalKind::terminate()) {
			Ok(terminate) => terminate,
			Err(e) => {
				warn!("Could not listen for SIGTERM: {e}");
				return;
			}
		};
		terminate.recv().await;

		info!("SIGTERM received, stopping the dispatcher");
		match token.shutdown() {
			Ok(stopped) => stopped.await,
			Err(e) => warn!("Dispatcher could not be stopped: {e}"),
		}
	});
}

#[cfg(not(unix))]
fn stop_on_sigterm(_token: ShutdownToken) {}

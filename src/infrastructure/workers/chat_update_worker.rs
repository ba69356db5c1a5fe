use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::task::TaskTracker;

use crate::domain::transport::{InboundUpdate, UpdateHandler};

type Workers = Arc<Mutex<HashMap<i64, UnboundedSender<InboundUpdate>>>>;

/// Fans updates out to one worker task per chat.
///
/// Updates of the same chat are handled one at a time, in arrival order.
/// Different chats do not wait for each other. A worker that stays idle for
/// `idle_timeout` leaves the pool; the next update for its chat starts a new
/// one.
pub struct ChatUpdateWorkerPool<H: UpdateHandler> {
	handler:      Arc<H>,
	workers:      Workers,
	tasks:        TaskTracker,
	idle_timeout: Duration,
}

impl<H: UpdateHandler> Clone for ChatUpdateWorkerPool<H> {
	fn clone(&self) -> Self {
		Self {
			handler:      self.handler.clone(),
			workers:      self.workers.clone(),
			tasks:        self.tasks.clone(),
			idle_timeout: self.idle_timeout,
		}
	}
}

impl<H: UpdateHandler> ChatUpdateWorkerPool<H> {
	pub fn new(handler: Arc<H>, idle_timeout: Duration) -> Self {
		Self {
			handler,
			workers: Arc::new(Mutex::new(HashMap::new())),
			tasks: TaskTracker::new(),
			idle_timeout,
		}
	}

	/// Queues `update` behind earlier updates of the same chat. Must be called
	/// from within a tokio runtime.
	pub fn submit(&self, update: InboundUpdate) {
		let chat_id = update.chat_id;
		let mut workers = self.workers.lock().unwrap_or_else(|e| e.into_inner());

		let update = match workers.get(&chat_id) {
			Some(sender) => match sender.send(update) {
				Ok(()) => return,
				Err(mpsc::error::SendError(update)) => update,
			},
			None => update,
		};

		let (sender, receiver) = mpsc::unbounded_channel();
		if sender.send(update).is_err() {
			error!("Worker for chat {chat_id} dropped its queue before starting");
			return;
		}
		workers.insert(chat_id, sender);
		debug!("Started worker for chat {chat_id}");

		self.tasks.spawn(run_worker(
			chat_id,
			receiver,
			self.handler.clone(),
			self.workers.clone(),
			self.idle_timeout,
		));
	}

	pub fn active_workers(&self) -> usize {
		self.workers.lock().unwrap_or_else(|e| e.into_inner()).len()
	}

	/// Closes every chat queue and waits until the workers have handled what
	/// was already queued. Updates submitted afterwards start fresh workers
	/// that are not waited for.
	pub async fn drain(&self) {
		let queues = {
			let mut workers = self.workers.lock().unwrap_or_else(|e| e.into_inner());
			std::mem::take(&mut *workers)
		};
		debug!("Draining {} chat workers", queues.len());
		drop(queues);

		self.tasks.close();
		self.tasks.wait().await;
	}
}

async fn run_worker<H: UpdateHandler>(
	chat_id: i64,
	mut receiver: UnboundedReceiver<InboundUpdate>,
	handler: Arc<H>,
	workers: Workers,
	idle_timeout: Duration,
) {
	loop {
		let update = match tokio::time::timeout(idle_timeout, receiver.recv()).await
		{
			Ok(Some(update)) => update,
			Ok(None) => break,
			Err(_) => {
				// Re-check under the pool lock so no update slips in between
				// the idle timeout and leaving the pool.
				let pending = {
					let mut workers = workers.lock().unwrap_or_else(|e| e.into_inner());
					match receiver.try_recv() {
						Ok(update) => Some(update),
						Err(_) => {
							workers.remove(&chat_id);
							None
						}
					}
				};
				match pending {
					Some(update) => update,
					None => break,
				}
			}
		};

		handler.handle(update).await;
	}

	debug!("Worker for chat {chat_id} stopped");
}

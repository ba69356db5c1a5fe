use std::collections::HashSet;

/// Decides who may talk to the bot. An empty allow-list leaves the bot open
/// to everyone.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
	allowed_users: HashSet<u64>,
}

impl AuthorizationPolicy {
	pub fn new<I>(allowed_users: I) -> Self
	where
		I: IntoIterator<Item = u64>,
	{
		Self {
			allowed_users: allowed_users.into_iter().collect(),
		}
	}

	pub fn open() -> Self {
		Self::default()
	}

	pub fn is_open(&self) -> bool {
		self.allowed_users.is_empty()
	}

	pub fn is_authorized(&self, user_id: u64) -> bool {
		self.is_open() || self.allowed_users.contains(&user_id)
	}
}

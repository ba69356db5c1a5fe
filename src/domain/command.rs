/// Everything a chat message can ask the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Help,
	Start,
	Reload,
	Pay,
	CheckPayment,
	/// Anything else. Carries the slash label as typed, empty for text that
	/// is not a command at all.
	Unknown(String),
}

impl Command {
	/// Reads a message text. Slash commands may carry a `@botname` suffix and
	/// trailing arguments, both ignored; labels match exactly.
	pub fn parse(text: &str) -> Self {
		let Some(rest) = text.trim().strip_prefix('/') else {
			return Command::Unknown(String::new());
		};

		let token = rest.split_whitespace().next().unwrap_or_default();
		let label = token.split('@').next().unwrap_or_default();

		match label {
			"help" => Command::Help,
			"start" => Command::Start,
			"reload" => Command::Reload,
			"pay" => Command::Pay,
			"check_payment" => Command::CheckPayment,
			other => Command::Unknown(other.to_string()),
		}
	}
}

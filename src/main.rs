use std::sync::Arc;

use paywall_bot::infrastructure::config::settings::Config;
use paywall_bot::run;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();
	env_logger::init();

	let config = Arc::new(Config::load().expect("Failed to load configuration"));
	run(config).await
}

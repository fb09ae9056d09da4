use std::error::Error;

use nordicflight_advisor::RiskAdvisor;
use nordicflight_core::{Fixtures, RiskSnapshot};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Optional first argument: a fixture file to analyze instead of the built-in fleet.
    let fixtures = match std::env::args().nth(1) {
        Some(path) => Fixtures::from_path(path)?,
        None => Fixtures::load_default()?,
    };

    let snapshot = RiskSnapshot::new(&fixtures.drones, &fixtures.weather, &fixtures.alerts);
    let summary = RiskAdvisor::from_env().summarize(&snapshot).await;
    println!("{summary}");

    Ok(())
}

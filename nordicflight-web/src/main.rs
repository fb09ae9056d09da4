use macroquad::prelude::*;

fn window_conf() -> Conf {
    Conf {
        window_title: "NordicFlight Ops".to_owned(),
        window_width: 1440,
        window_height: 900,
        high_dpi: true,
        sample_count: 4,
        ..Default::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        dotenvy::dotenv().ok();
        init_tracing();
    }

    nordicflight_web_lib::run().await;
}

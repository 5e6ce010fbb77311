use anyhow::Context;
use clap::Parser;
use realpic_checkout::{routes, CheckoutConfig, PayPalClient};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,realpic_checkout=debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CheckoutConfig::parse();
    init_tracing(config.json);

    config.validate().context("refusing to start")?;

    let provider = Arc::new(PayPalClient::new(&config));
    let app = routes(provider, config.static_dir.clone());

    tracing::info!(
        "PayPal backend running on {} (provider {}, callbacks under {})",
        config.bind,
        config.api_base,
        config.public_url
    );
    warp::serve(app).run(config.bind).await;
    Ok(())
}

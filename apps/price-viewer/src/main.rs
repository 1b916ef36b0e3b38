//! Price Viewer Binary
//!
//! Subscribes to the configured symbol's live candle stream and prints one
//! rendered view per state change as a JSON line.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin price-viewer
//! ```
//!
//! # Environment Variables
//!
//! - `PRICE_ENGINE_URL`: Price engine gRPC endpoint (default: <http://localhost:8080>)
//! - `PRICE_SYMBOL`: Symbol to watch (default: BTCUSDT)
//! - `PRICE_INTERVAL_MS`: Aggregation window in milliseconds (default: 1000)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use price_viewer::infrastructure::telemetry;
use price_viewer::presentation::{PriceView, render};
use price_viewer::{
    BindingParams, ClientHolder, GrpcCandleSource, StreamBinding, StreamSubscriber, ViewerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    let config = ViewerConfig::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint_url,
        symbol = %config.symbol,
        interval_ms = config.interval_ms,
        "Starting price viewer"
    );

    let holder = Arc::new(ClientHolder::new(config.endpoint_url.clone()));
    let source = Arc::new(GrpcCandleSource::new(holder));
    let subscriber = StreamSubscriber::new(source);
    let mut binding = StreamBinding::new(subscriber);
    let mut snapshots = binding.watch();

    binding.set_params(BindingParams::new(config.symbol, config.interval_ms));

    let shutdown = await_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = render(&snapshots.borrow());
                print_view(&view)?;
            }
            () = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    drop(binding);
    Ok(())
}

/// Print one view as a JSON line, with a human-readable log beside it.
fn print_view(view: &PriceView) -> anyhow::Result<()> {
    match view {
        PriceView::Quote(quote) => {
            tracing::info!(
                symbol = %quote.symbol,
                price = %quote.price_label(),
                volume = %quote.volume,
                vwap = %quote.vwap,
                status = quote.status,
                "Candle"
            );
        }
        PriceView::ErrorPanel { message } => {
            tracing::error!(error = %message, "Stream failed");
        }
        PriceView::Connecting => {
            tracing::info!("Connecting to price stream");
        }
        PriceView::Idle => {}
    }

    let line = serde_json::to_string(view).context("failed to serialize view")?;
    println!("{line}");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM");
        }
    }
}

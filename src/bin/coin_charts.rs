use anyhow::{Context, Result};
use dialoguer::console::style;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging().context("initializing logging")?;

    print_welcome();

    coin_charts::run().await
}

/// Directives used when `RUST_LOG` is unset.
const DEFAULT_DIAGNOSTICS: &str = "warn,coin_charts=info";

fn init_logging() -> anyhow::Result<()> {
    // Prompts, status lines and misses as bare text
    let console_format = tracing_subscriber::fmt::format()
        .without_time()
        .with_level(false)
        .with_target(false)
        .compact();
    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(console_format)
        .with_filter(Targets::new().with_target("plain", LevelFilter::TRACE));

    // Request and session traces, kept off stdout
    let diagnostics_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIAGNOSTICS));
    let diagnostics_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(diagnostics_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(diagnostics_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

fn print_welcome() {
    let sep = style("◆").blue().bold();
    let title = style("Welcome to Coin Charts").bold();
    let subtitle = style("Chart live CoinGecko prices for the coins you pick.").dim();

    info!(target: "plain", "\n{sep} {title} {sep}\n{subtitle}\n");
}

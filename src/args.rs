use clap::ValueHint;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_HISTORY_PER_PAGE: u32 = 250;
pub const DEFAULT_PRICES_PER_PAGE: u32 = 100; // upstream default page size
pub const DEFAULT_HISTORY_DAYS: u32 = 365;

/// Chart CoinGecko market data in the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Line chart of each selected coin's price over time
    History(HistoryArgs),

    /// Bar chart of the current price of each selected coin
    Prices(PricesArgs),
}

/// Settings shared by both charts
#[derive(Args, Clone, Debug)]
pub(crate) struct CommonArgs {
    /// Path to environment file (default: ./.env). Can also use APP_ENV_FILE.
    #[arg(
        long,
        value_hint = ValueHint::FilePath,
        default_value = ".env",
        env = "APP_ENV_FILE"
    )]
    pub(crate) env_file: PathBuf,

    /// Base URL of the CoinGecko API
    #[arg(
        long,
        env = "COINGECKO_API_URL",
        value_hint = ValueHint::Url,
        default_value = DEFAULT_API_BASE_URL
    )]
    pub(crate) api_base_url: String,

    /// Quote currency (vs_currency)
    #[arg(
        long,
        env = "COIN_CURRENCY",
        value_parser = parse_currency,
        default_value = DEFAULT_CURRENCY
    )]
    pub(crate) currency: String,

    /// Number of coins to load into the catalog (1-250)
    #[arg(long, env = "COIN_PER_PAGE", value_parser = clap::value_parser!(u32).range(1..=250))]
    pub(crate) per_page: Option<u32>,

    /// HTTP request timeout in seconds (no timeout when unset)
    #[arg(long, env = "COIN_TIMEOUT_SECS")]
    pub(crate) timeout_secs: Option<u64>,

    /// Stop after the first query instead of prompting again
    #[arg(long, default_value_t = false)]
    pub(crate) once: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,

    /// Number of days of history to fetch per coin
    #[arg(
        long,
        env = "COIN_HISTORY_DAYS",
        value_parser = clap::value_parser!(u32).range(1..),
        default_value_t = DEFAULT_HISTORY_DAYS
    )]
    pub(crate) days: u32,
}

#[derive(Args, Debug)]
pub(crate) struct PricesArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

fn parse_currency(s: &str) -> Result<String, String> {
    let currency = s.trim().to_ascii_lowercase();
    if currency.is_empty() || !currency.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "invalid COIN_CURRENCY '{}'; expected a currency code such as usd, eur, btc",
            s
        ));
    }
    Ok(currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_is_normalized() {
        assert_eq!(parse_currency(" USD ").unwrap(), "usd");
        assert!(parse_currency("").is_err());
        assert!(parse_currency("us d").is_err());
    }

    #[test]
    fn history_defaults() {
        let cli = Cli::try_parse_from(["coin-charts", "history"]).unwrap();
        let Command::History(args) = cli.cmd else {
            panic!("expected history subcommand");
        };

        assert_eq!(args.days, DEFAULT_HISTORY_DAYS);
        assert_eq!(args.common.currency, "usd");
        assert_eq!(args.common.per_page, None);
        assert!(!args.common.once);
    }

    #[test]
    fn prices_flags() {
        let cli = Cli::try_parse_from([
            "coin-charts",
            "prices",
            "--currency",
            "EUR",
            "--per-page",
            "50",
            "--once",
        ])
        .unwrap();
        let Command::Prices(args) = cli.cmd else {
            panic!("expected prices subcommand");
        };

        assert_eq!(args.common.currency, "eur");
        assert_eq!(args.common.per_page, Some(50));
        assert!(args.common.once);
    }

    #[test]
    fn per_page_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["coin-charts", "prices", "--per-page", "0"]).is_err());
        assert!(Cli::try_parse_from(["coin-charts", "prices", "--per-page", "251"]).is_err());
    }
}

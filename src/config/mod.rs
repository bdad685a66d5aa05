use crate::args::{
    CommonArgs, HistoryArgs, PricesArgs, DEFAULT_CURRENCY, DEFAULT_HISTORY_DAYS,
    DEFAULT_HISTORY_PER_PAGE, DEFAULT_PRICES_PER_PAGE,
};
use crate::config::load_api_key::load_api_key;
use anyhow::{Context, Result};
use derive_builder::Builder;
use dialoguer::console::style;
use std::fmt;
use std::time::Duration;
use tracing::info;
use url::Url;

mod load_api_key;

/// Which chart a session draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// Price over time, one line per coin.
    History,
    /// Current price, one bar per coin.
    Prices,
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::History => write!(f, "history (line chart)"),
            Self::Prices => write!(f, "prices (bar chart)"),
        }
    }
}

#[derive(Builder, Clone, Debug)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub(crate) base_url: Url,
    /// Demo API key sent with every request
    #[builder(setter(into))]
    pub(crate) api_key: String,
    /// Per-request timeout, client default when `None`
    #[builder(default)]
    pub(crate) timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }
}

#[derive(Builder, Clone, Debug)]
pub struct SessionConfig {
    pub(crate) mode: ChartMode,
    /// Quote currency, lower case
    #[builder(setter(into), default = "DEFAULT_CURRENCY.to_string()")]
    pub(crate) currency: String,
    /// Catalog page size
    pub(crate) per_page: u32,
    /// History window, only used in `History` mode
    #[builder(default = "DEFAULT_HISTORY_DAYS")]
    pub(crate) days: u32,
    /// Stop after the first query
    #[builder(default)]
    pub(crate) once: bool,
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    pub(crate) fn prompt(&self) -> &'static str {
        match self.mode {
            ChartMode::History => {
                "Enter one or more coin IDs separated by a comma (e.g., bitcoin, ethereum):\n\
                 Enter 'quit' to exit the session."
            }
            ChartMode::Prices => {
                "Enter one or more coins separated by a comma (e.g., bitcoin, ethereum):\n\
                 Enter 'quit' to exit the session."
            }
        }
    }

    pub(crate) fn invalid_input_message(&self) -> &'static str {
        match self.mode {
            ChartMode::History => "Please enter a valid coin ID.",
            ChartMode::Prices => "Please enter a valid Coin.",
        }
    }
}

#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct AppConfig {
    pub(crate) api: ApiConfig,
    pub(crate) session: SessionConfig,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub(crate) fn setup_history(args: HistoryArgs) -> Result<AppConfig> {
        let session = Self::session_builder(&args.common, ChartMode::History)
            .per_page(args.common.per_page.unwrap_or(DEFAULT_HISTORY_PER_PAGE))
            .days(args.days)
            .build()
            .context("Failed to build session config")?;

        Self::setup(args.common, session)
    }

    pub(crate) fn setup_prices(args: PricesArgs) -> Result<AppConfig> {
        let session = Self::session_builder(&args.common, ChartMode::Prices)
            .per_page(args.common.per_page.unwrap_or(DEFAULT_PRICES_PER_PAGE))
            .build()
            .context("Failed to build session config")?;

        Self::setup(args.common, session)
    }

    fn session_builder(common: &CommonArgs, mode: ChartMode) -> SessionConfigBuilder {
        let mut builder = SessionConfig::builder();
        builder
            .mode(mode)
            .currency(common.currency.clone())
            .once(common.once);
        builder
    }

    fn setup(common: CommonArgs, session: SessionConfig) -> Result<AppConfig> {
        let _ = dotenvy::from_filename(&common.env_file);

        let api_key = load_api_key().context("Failed to load API key")?;
        let base_url = Url::parse(&common.api_base_url)
            .with_context(|| format!("Invalid API base URL '{}'", common.api_base_url))?;

        let api = ApiConfig::builder()
            .base_url(base_url)
            .api_key(api_key)
            .timeout(common.timeout_secs.map(Duration::from_secs))
            .build()
            .context("Failed to build API config")?;

        let config = Self::builder().api(api).session(session).build()?;

        Self::print_config_summary(&config);

        Ok(config)
    }

    fn print_config_summary(config: &AppConfig) {
        let check = || style("✔").green().bold();

        let kv = |k: &str, v: String| {
            format!(
                "{} {} {}",
                check(),
                style(k).bold(),
                style(format!("· {}", v)).dim()
            )
        };

        let session = &config.session;

        info!(target: "plain", "{}", kv("Market Data API", config.api.base_url.to_string()));
        info!(target: "plain", "{}", kv("API Key", mask_key(&config.api.api_key)));
        info!(target: "plain", "{}", kv("Chart", session.mode.to_string()));
        info!(target: "plain", "{}", kv("Currency", session.currency.to_uppercase()));
        info!(target: "plain", "{}", kv("Catalog Size", format!("{} coins", session.per_page)));
        if session.mode == ChartMode::History {
            info!(target: "plain", "{}", kv("History Window", format!("{} days", session.days)));
        }
        if let Some(timeout) = config.api.timeout {
            info!(target: "plain", "{}", kv("Request Timeout", format!("{:?}", timeout)));
        }

        info!(target: "plain",
            "{} {} {}\n",
            style("✔").blue(),
            style("Configuration complete").bold(),
            style("✔").blue()
        );
    }
}

/// Shows only the last four characters of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("****{visible}")
}

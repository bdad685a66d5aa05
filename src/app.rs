use crate::args::{Cli, Command};
use crate::chart::TerminalRenderer;
use crate::config::AppConfig;
use crate::market::CoinGeckoClient;
use crate::session::Session;
use crate::ui::io_input::StdinInputSource;
use clap::Parser;

pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn init() -> anyhow::Result<Application> {
        // Preload environment variables from .env file if it exists before parsing CLI args
        dotenvy::dotenv().ok();

        let cli = Cli::parse();

        let config = match cli.cmd {
            Command::History(history_args) => AppConfig::setup_history(history_args)?,
            Command::Prices(prices_args) => AppConfig::setup_prices(prices_args)?,
        };

        Ok(Application { config })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let client = CoinGeckoClient::new(&self.config.api)?;
        let mut renderer = TerminalRenderer::new();

        let mut session = Session::start(&self.config.session, &client, &mut renderer).await?;
        session.run(&mut StdinInputSource).await
    }
}

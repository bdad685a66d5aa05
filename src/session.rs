//! The interactive prompt loop.
//!
//! A session loads the catalog once, then for every prompt line resolves the
//! requested coins, builds the chart for its mode and hands it to the renderer.
//! Per-coin and rendering failures are reported and never end the session.

use crate::catalog::CoinCatalog;
use crate::chart::{BarChart, Chart, ChartRenderer, LineChart, PriceBar};
use crate::config::{ChartMode, SessionConfig};
use crate::history::{process_market_chart, PriceSeries};
use crate::market::MarketDataSource;
use crate::selection::{resolve, SelectionResult, UserCommand};
use crate::ui::io_input::InputSource;
use crate::ui::spinner::with_spinner;
use crate::ui::user_messages::{
    print_catalog_loaded, print_chart_error, print_exit, print_fetch_error, print_invalid_input,
    print_not_found, print_processing_error,
};
use anyhow::{Context, Result};
use tracing::debug;

/// Outcome of a single query.
#[derive(Debug, Default)]
pub struct QueryReport {
    pub selection: SelectionResult,
    /// Found coins left off the chart because their data could not be used.
    pub skipped: Vec<String>,
    /// The chart handed to the renderer, if any.
    pub chart: Option<Chart>,
}

pub struct Session<'a> {
    config: &'a SessionConfig,
    source: &'a dyn MarketDataSource,
    renderer: &'a mut dyn ChartRenderer,
    catalog: CoinCatalog,
}

impl<'a> Session<'a> {
    /// Fetches the catalog. Failing here is fatal for the session.
    pub async fn start(
        config: &'a SessionConfig,
        source: &'a dyn MarketDataSource,
        renderer: &'a mut dyn ChartRenderer,
    ) -> Result<Session<'a>> {
        let coins = with_spinner(
            "Loading market data…",
            source.markets(&config.currency, config.per_page),
        )
        .await
        .context("Error fetching market data")?;

        let catalog = CoinCatalog::from_markets(coins);
        let catalog = match config.mode {
            ChartMode::Prices => catalog.sorted_by_price_desc(),
            ChartMode::History => catalog,
        };
        print_catalog_loaded(catalog.len());

        Ok(Self {
            config,
            source,
            renderer,
            catalog,
        })
    }

    pub fn catalog(&self) -> &CoinCatalog {
        &self.catalog
    }

    /// Prompts until `quit`, end of input, or the first query with `once` set.
    pub async fn run(&mut self, input: &mut dyn InputSource) -> Result<()> {
        loop {
            let Some(line) = input
                .next_line(self.config.prompt())
                .context("failed to read user input")?
            else {
                print_exit();
                return Ok(());
            };

            match UserCommand::parse(&line) {
                UserCommand::Quit => {
                    print_exit();
                    return Ok(());
                }
                UserCommand::Empty => {
                    print_invalid_input(self.config.invalid_input_message());
                }
                UserCommand::Coins(ids) => {
                    let report = self.handle_query(&ids).await;
                    debug!(
                        found = report.selection.found.len(),
                        not_found = report.selection.not_found.len(),
                        skipped = report.skipped.len(),
                        "query handled"
                    );

                    if self.config.once {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Resolves `ids`, draws the chart for whatever was found and reports misses.
    pub async fn handle_query(&mut self, ids: &[String]) -> QueryReport {
        let mut report = QueryReport {
            selection: resolve(ids, &self.catalog),
            ..QueryReport::default()
        };

        if !report.selection.found.is_empty() {
            let chart = match self.config.mode {
                ChartMode::History => Chart::Line(
                    self.history_chart(&report.selection, &mut report.skipped)
                        .await,
                ),
                ChartMode::Prices => Chart::Bar(self.price_chart(&report.selection)),
            };

            if let Err(e) = self.renderer.show(&chart) {
                print_chart_error(format!("{e:#}"));
            }
            report.chart = Some(chart);
        }

        if !report.selection.not_found.is_empty() {
            print_not_found(&report.selection.not_found);
        }

        report
    }

    /// One request per found coin, in selection order.
    async fn history_chart(
        &self,
        selection: &SelectionResult,
        skipped: &mut Vec<String>,
    ) -> LineChart {
        let mut series = Vec::with_capacity(selection.found.len());

        for record in &selection.found {
            let fetched = with_spinner(
                format!("Fetching {} price history…", record.name),
                self.source
                    .market_chart(&record.id, &self.config.currency, self.config.days),
            )
            .await;

            let chart = match fetched {
                Ok(chart) => chart,
                Err(e) => {
                    print_fetch_error(&record.id, format!("{e:#}"));
                    skipped.push(record.id.clone());
                    continue;
                }
            };

            match process_market_chart(&chart) {
                Ok(points) => series.push(PriceSeries::new(record.name.clone(), points)),
                Err(e) => {
                    print_processing_error(&record.id, format!("{e:#}"));
                    skipped.push(record.id.clone());
                }
            }
        }

        LineChart::new(&self.config.currency, series)
    }

    fn price_chart(&self, selection: &SelectionResult) -> BarChart {
        let bars = selection
            .found
            .iter()
            .map(|record| PriceBar {
                label: record.name.clone(),
                price: record.price,
            })
            .collect();

        BarChart::new(&self.config.currency, bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{MarketChart, MarketCoin};
    use crate::ui::io_input::VecInputSource;
    use anyhow::{anyhow, bail};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        coins: Vec<MarketCoin>,
        charts: HashMap<String, MarketChart>,
        fail_markets: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with_coins(coins: &[(&str, &str, f64)]) -> Self {
            Self {
                coins: coins
                    .iter()
                    .map(|&(id, name, price)| MarketCoin {
                        id: id.to_string(),
                        name: name.to_string(),
                        current_price: Some(price),
                    })
                    .collect(),
                ..Self::default()
            }
        }

        fn chart(mut self, id: &str, chart: MarketChart) -> Self {
            self.charts.insert(id.to_string(), chart);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketDataSource for FakeSource {
        async fn markets(&self, currency: &str, per_page: u32) -> Result<Vec<MarketCoin>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("markets:{currency}:{per_page}"));
            if self.fail_markets {
                bail!("connection refused");
            }
            Ok(self.coins.clone())
        }

        async fn market_chart(
            &self,
            coin_id: &str,
            currency: &str,
            days: u32,
        ) -> Result<MarketChart> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("chart:{coin_id}:{currency}:{days}"));
            self.charts
                .get(coin_id)
                .cloned()
                .ok_or_else(|| anyhow!("HTTP status server error (500)"))
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        shown: Vec<Chart>,
        fail: bool,
    }

    impl ChartRenderer for RecordingRenderer {
        fn show(&mut self, chart: &Chart) -> Result<()> {
            self.shown.push(chart.clone());
            if self.fail {
                bail!("Charts need an interactive terminal (TTY)");
            }
            Ok(())
        }
    }

    fn config(mode: ChartMode) -> SessionConfig {
        SessionConfig::builder()
            .mode(mode)
            .per_page(match mode {
                ChartMode::History => 250,
                ChartMode::Prices => 100,
            })
            .build()
            .unwrap()
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn prices(points: &[(i64, f64)]) -> MarketChart {
        MarketChart {
            prices: Some(points.to_vec()),
        }
    }

    fn sample_source() -> FakeSource {
        FakeSource::with_coins(&[
            ("bitcoin", "Bitcoin", 50000.0),
            ("dogecoin", "Dogecoin", 0.08),
            ("ethereum", "Ethereum", 3000.0),
        ])
    }

    #[tokio::test]
    async fn history_skips_failed_coins_and_reports_misses() {
        let config = config(ChartMode::History);
        let source = sample_source()
            .chart(
                "bitcoin",
                prices(&[(1_700_000_000_000, 36500.0), (1_700_086_400_000, 37000.0)]),
            )
            // no `prices` key
            .chart("ethereum", MarketChart::default());
        let mut renderer = RecordingRenderer::default();

        let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
        let report = session
            .handle_query(&ids(&["bitcoin", "ethereum", "dogecoin", "nope"]))
            .await;

        assert_eq!(report.selection.found.len(), 3);
        assert_eq!(report.selection.not_found, vec!["nope"]);
        assert_eq!(report.skipped, vec!["ethereum", "dogecoin"]);

        let Some(Chart::Line(chart)) = report.chart else {
            panic!("expected a line chart");
        };
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].label, "Bitcoin");
        assert_eq!(chart.series[0].points.len(), 2);

        assert_eq!(
            source.calls(),
            vec![
                "markets:usd:250",
                "chart:bitcoin:usd:365",
                "chart:ethereum:usd:365",
                "chart:dogecoin:usd:365",
            ]
        );
    }

    #[tokio::test]
    async fn history_with_every_coin_failing_still_shows_empty_chart() {
        let config = config(ChartMode::History);
        let source = sample_source();
        let mut renderer = RecordingRenderer::default();

        {
            let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
            let report = session.handle_query(&ids(&["bitcoin"])).await;
            assert_eq!(report.skipped, vec!["bitcoin"]);
        }

        assert_eq!(renderer.shown.len(), 1);
        let Chart::Line(chart) = &renderer.shown[0] else {
            panic!("expected a line chart");
        };
        assert!(chart.series.is_empty());
    }

    #[tokio::test]
    async fn prices_catalog_is_sorted_and_bars_follow_request_order() {
        let config = config(ChartMode::Prices);
        let source = sample_source();
        let mut renderer = RecordingRenderer::default();

        let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
        let catalog_ids: Vec<&str> = session.catalog().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(catalog_ids, ["bitcoin", "ethereum", "dogecoin"]);

        let report = session.handle_query(&ids(&["dogecoin", "bitcoin"])).await;
        let Some(Chart::Bar(chart)) = report.chart else {
            panic!("expected a bar chart");
        };
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Dogecoin", "Bitcoin"]);
        assert_eq!(chart.bars[1].price, 50000.0);

        // Current prices come from the catalog, no extra requests
        assert_eq!(source.calls(), vec!["markets:usd:100"]);
    }

    #[tokio::test]
    async fn nothing_found_renders_nothing() {
        let config = config(ChartMode::Prices);
        let source = sample_source();
        let mut renderer = RecordingRenderer::default();

        {
            let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
            let report = session.handle_query(&ids(&["solana", "cardano"])).await;
            assert!(report.chart.is_none());
            assert_eq!(report.selection.not_found, vec!["solana", "cardano"]);
        }

        assert!(renderer.shown.is_empty());
    }

    #[tokio::test]
    async fn run_reprompts_on_blank_input_until_quit() {
        let config = config(ChartMode::Prices);
        let source = sample_source();
        let mut renderer = RecordingRenderer::default();
        let mut input = VecInputSource::new(["", "   ", "Bitcoin, dogecoin", "QUIT", "ethereum"]);

        {
            let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
            session.run(&mut input).await.unwrap();
        }

        assert_eq!(renderer.shown.len(), 1);
        // The line after `quit` is never read
        assert_eq!(input.next_line("").unwrap().as_deref(), Some("ethereum"));
    }

    #[tokio::test]
    async fn run_ends_at_end_of_input() {
        let config = config(ChartMode::Prices);
        let source = sample_source();
        let mut renderer = RecordingRenderer::default();
        let mut input = VecInputSource::new(["bitcoin", "ethereum"]);

        {
            let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
            session.run(&mut input).await.unwrap();
        }

        assert_eq!(renderer.shown.len(), 2);
    }

    #[tokio::test]
    async fn once_stops_after_first_query() {
        let mut config = config(ChartMode::Prices);
        config.once = true;
        let source = sample_source();
        let mut renderer = RecordingRenderer::default();
        let mut input = VecInputSource::new(["", "nope", "bitcoin"]);

        {
            let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
            session.run(&mut input).await.unwrap();
        }

        // Blank lines don't count as a query; "nope" does
        assert!(renderer.shown.is_empty());
        assert_eq!(input.next_line("").unwrap().as_deref(), Some("bitcoin"));
    }

    #[tokio::test]
    async fn renderer_failure_does_not_end_session() {
        let config = config(ChartMode::Prices);
        let source = sample_source();
        let mut renderer = RecordingRenderer {
            fail: true,
            ..RecordingRenderer::default()
        };
        let mut input = VecInputSource::new(["bitcoin", "ethereum", "quit"]);

        {
            let mut session = Session::start(&config, &source, &mut renderer).await.unwrap();
            session.run(&mut input).await.unwrap();
        }

        assert_eq!(renderer.shown.len(), 2);
    }

    #[tokio::test]
    async fn catalog_failure_is_fatal() {
        let config = config(ChartMode::History);
        let source = FakeSource {
            fail_markets: true,
            ..FakeSource::default()
        };
        let mut renderer = RecordingRenderer::default();

        let err = Session::start(&config, &source, &mut renderer)
            .await
            .err()
            .unwrap();

        let message = format!("{err:#}");
        assert!(message.starts_with("Error fetching market data"));
        assert!(message.contains("connection refused"));
    }
}

use crate::config::ApiConfig;
use crate::market::{MarketChart, MarketCoin, MarketDataSource};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko-backed market data source.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl CoinGeckoClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Appends path segments to the configured base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<(u16, T)> {
        debug!("GET {url} {query:?}");

        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .context("CoinGecko request failed")?
            .error_for_status()
            .context("CoinGecko API error")?;

        let status = resp.status().as_u16();
        let body = resp
            .json::<T>()
            .await
            .context("Failed to parse CoinGecko response")?;

        Ok((status, body))
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn markets(&self, currency: &str, per_page: u32) -> Result<Vec<MarketCoin>> {
        let url = self.endpoint(&["coins", "markets"])?;
        let query = [
            ("vs_currency", currency.to_string()),
            ("per_page", per_page.to_string()),
        ];

        let (status, coins) = self.get_json::<Vec<MarketCoin>>(url, &query).await?;
        info!(target: "plain", "Status code (market data): {status}");

        Ok(coins)
    }

    async fn market_chart(&self, coin_id: &str, currency: &str, days: u32) -> Result<MarketChart> {
        let url = self.endpoint(&["coins", coin_id, "market_chart"])?;
        let query = [
            ("vs_currency", currency.to_string()),
            ("days", days.to_string()),
        ];

        let (status, chart) = self.get_json::<MarketChart>(url, &query).await?;
        info!(target: "plain", "ID: {coin_id}\tStatus Code (historical data): {status}");

        Ok(chart)
    }
}

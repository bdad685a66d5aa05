//! Upstream market-data access.
//!
//! The session only talks to the [`MarketDataSource`] trait so the loop can be
//! driven by an in-memory source in tests.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

mod coingecko;

pub use coingecko::CoinGeckoClient;

/// One entry of the `/coins/markets` response. Only the fields we use are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub name: String,
    // Illiquid coins come back with `null`
    #[serde(default)]
    pub current_price: Option<f64>,
}

/// Response of `/coins/{id}/market_chart`.
///
/// `prices` is optional on purpose: a body without it is a data-format error
/// raised while processing, not a transport failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Option<Vec<(i64, f64)>>,
}

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Current market snapshot, one page of `per_page` coins.
    async fn markets(&self, currency: &str, per_page: u32) -> Result<Vec<MarketCoin>>;

    /// Price history of one coin over the last `days` days.
    async fn market_chart(&self, coin_id: &str, currency: &str, days: u32) -> Result<MarketChart>;
}

use crate::market::MarketCoin;

/// A coin as known to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl From<MarketCoin> for CoinRecord {
    fn from(coin: MarketCoin) -> Self {
        Self {
            id: coin.id,
            name: coin.name,
            price: coin.current_price.unwrap_or_default(),
        }
    }
}

/// Snapshot of all coins fetched at session start. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoinCatalog {
    records: Vec<CoinRecord>,
}

impl CoinCatalog {
    pub fn new(records: Vec<CoinRecord>) -> Self {
        Self { records }
    }

    pub fn from_markets(coins: Vec<MarketCoin>) -> Self {
        Self::new(coins.into_iter().map(CoinRecord::from).collect())
    }

    /// Reorders by price, highest first. Ties keep upstream order.
    pub fn sorted_by_price_desc(mut self) -> Self {
        self.records.sort_by(|a, b| b.price.total_cmp(&a.price));
        self
    }

    pub fn get(&self, id: &str) -> Option<&CoinRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoinRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

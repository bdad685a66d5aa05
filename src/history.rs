use crate::market::MarketChart;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};

/// A single observation on a price history.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: DateTime<Local>,
    pub price: f64,
}

/// One labeled line on the history chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub label: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(label: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

/// Converts the `prices` field of a market-chart response into dated points,
/// keeping upstream order.
pub fn process_market_chart(chart: &MarketChart) -> Result<Vec<PricePoint>> {
    let prices = chart
        .prices
        .as_ref()
        .ok_or_else(|| anyhow!("Key 'prices' not found in historical data."))?;

    prices
        .iter()
        .map(|&(timestamp_ms, price)| -> Result<PricePoint> {
            let date = DateTime::from_timestamp_millis(timestamp_ms)
                .ok_or_else(|| anyhow!("Timestamp {timestamp_ms} is out of range"))?;
            Ok(PricePoint {
                date: date.with_timezone(&Local),
                price,
            })
        })
        .collect()
}

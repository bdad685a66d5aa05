//! Chart models and rendering.
//!
//! Charts are plain data; a [`ChartRenderer`] decides how to put them on screen.

use crate::history::PriceSeries;
use anyhow::Result;
use chrono::{DateTime, Local};

mod terminal;

pub use terminal::TerminalRenderer;

pub const DATE_FORMAT: &str = "%b %Y";

/// Displays a chart and returns once the user has dismissed it.
pub trait ChartRenderer {
    fn show(&mut self, chart: &Chart) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Self::Line(chart) => &chart.title,
            Self::Bar(chart) => &chart.title,
        }
    }
}

/// Price over time, one line per coin.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<PriceSeries>,
}

impl LineChart {
    pub fn new(currency: &str, series: Vec<PriceSeries>) -> Self {
        let currency = currency.to_uppercase();
        Self {
            title: format!("Prices of Selected Coins Over Past Year ({currency})"),
            x_label: "Date".to_string(),
            y_label: format!("Price ({currency})"),
            series,
        }
    }

    fn points(&self) -> impl Iterator<Item = (DateTime<Local>, f64)> + '_ {
        self.series
            .iter()
            .flat_map(|series| series.points.iter().map(|p| (p.date, p.price)))
    }

    /// `[min, max]` of the x axis in unix seconds and of the y axis in price,
    /// or `None` when there is nothing to plot.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut points = self.points();
        let (first_date, first_price) = points.next()?;
        let first_x = first_date.timestamp() as f64;

        let (x, y) = points.fold(
            ([first_x, first_x], [first_price, first_price]),
            |([x_min, x_max], [y_min, y_max]), (date, price)| {
                let x = date.timestamp() as f64;
                (
                    [x_min.min(x), x_max.max(x)],
                    [y_min.min(price), y_max.max(price)],
                )
            },
        );

        Some((pad(x), pad(y)))
    }

    /// `count` evenly spaced date labels across the x bounds.
    pub fn date_labels(&self, count: usize) -> Vec<String> {
        let Some(([start, end], _)) = self.bounds() else {
            return Vec::new();
        };
        if count < 2 {
            return vec![format_date(start)];
        }

        let step = (end - start) / (count - 1) as f64;
        (0..count)
            .map(|i| format_date(start + step * i as f64))
            .collect()
    }
}

/// Current price per coin.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<PriceBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub label: String,
    pub price: f64,
}

impl BarChart {
    pub fn new(currency: &str, bars: Vec<PriceBar>) -> Self {
        Self {
            title: format!("Prices of Selected Coins ({})", currency.to_uppercase()),
            x_label: "Name".to_string(),
            y_label: "Price".to_string(),
            bars,
        }
    }

    /// Bar heights scaled so the highest price maps to `resolution`.
    ///
    /// Terminal bars are integers; prices below one cent would otherwise all
    /// collapse to zero.
    pub fn scaled_heights(&self, resolution: u64) -> Vec<u64> {
        let max = self
            .bars
            .iter()
            .map(|bar| bar.price)
            .fold(0.0_f64, f64::max);

        self.bars
            .iter()
            .map(|bar| {
                if max <= 0.0 || bar.price <= 0.0 {
                    0
                } else {
                    ((bar.price / max) * resolution as f64).round().max(1.0) as u64
                }
            })
            .collect()
    }
}

/// Price text as shown on axes and bars.
pub fn format_price(price: f64) -> String {
    if price >= 1.0 {
        format!("{price:.2}")
    } else {
        format!("{price:.6}")
    }
}

fn format_date(unix_secs: f64) -> String {
    DateTime::from_timestamp(unix_secs as i64, 0)
        .map(|date| date.with_timezone(&Local).format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

// Flat series would give a zero-height axis
fn pad([min, max]: [f64; 2]) -> [f64; 2] {
    if min == max {
        let delta = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
        [min - delta, max + delta]
    } else {
        [min, max]
    }
}

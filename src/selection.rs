//! Turning a raw input line into a set of catalog matches.

use crate::catalog::{CoinCatalog, CoinRecord};

const QUIT_COMMAND: &str = "quit";

/// What the user asked for on one prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Quit,
    /// Blank line; the caller re-prompts.
    Empty,
    /// Normalized identifiers in input order.
    Coins(Vec<String>),
}

impl UserCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line.is_empty() {
            return Self::Empty;
        }
        if line.eq_ignore_ascii_case(QUIT_COMMAND) {
            return Self::Quit;
        }

        Self::Coins(line.split(',').map(normalize_id).collect())
    }
}

/// Lower-cases and trims a requested identifier.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionResult {
    /// Matched records, in request order, duplicates included.
    pub found: Vec<CoinRecord>,
    /// Unmatched identifiers, normalized, in request order.
    pub not_found: Vec<String>,
}

impl SelectionResult {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.found.iter().map(|record| record.id.as_str())
    }
}

/// Partitions `requested` into catalog hits and misses.
///
/// Matching is exact on the normalized identifier. An empty request is the
/// caller's problem and simply yields an empty result.
pub fn resolve<S: AsRef<str>>(requested: &[S], catalog: &CoinCatalog) -> SelectionResult {
    let mut result = SelectionResult::default();

    for raw in requested {
        let id = normalize_id(raw.as_ref());
        match catalog.get(&id) {
            Some(record) => result.found.push(record.clone()),
            None => result.not_found.push(id),
        }
    }

    result
}

//! Ticker symbol resolution for issuer names.
//!
//! 13F tables carry no ticker column, so report rows resolve symbols from
//! an embedded name table. Follows the compile-time `include_str!`
//! pattern used for the other seed data files.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickerTableError {
    #[error("failed to parse ticker symbol YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("duplicate issuer name in ticker symbol file: {0}")]
    DuplicateName(String),
}

#[derive(Deserialize, Debug)]
struct TickerSymbolFile {
    symbols: Vec<TickerSymbol>,
}

#[derive(Deserialize, Debug)]
struct TickerSymbol {
    name: String,
    symbol: String,
}

/// Immutable issuer-name → ticker mapping, loaded once per analyzer.
pub struct TickerTable {
    exact: HashMap<String, String>,
    /// File order, for the deterministic substring scan.
    entries: Vec<(String, String)>,
}

impl TickerTable {
    /// Loads the table embedded at compile time.
    pub fn load() -> Result<Self, TickerTableError> {
        Self::parse(include_str!("../../seed_data/ticker_symbols.yml"))
    }

    /// Parses a table from YAML content, rejecting duplicate issuer names.
    pub fn parse(yaml_content: &str) -> Result<Self, TickerTableError> {
        let file: TickerSymbolFile = serde_yml::from_str(yaml_content)?;

        let mut exact = HashMap::new();
        let mut entries = Vec::with_capacity(file.symbols.len());
        for entry in file.symbols {
            if exact.contains_key(&entry.name) {
                return Err(TickerTableError::DuplicateName(entry.name));
            }
            exact.insert(entry.name.clone(), entry.symbol.clone());
            entries.push((entry.name, entry.symbol));
        }
        Ok(Self { exact, entries })
    }

    /// An empty table; every lookup resolves to `"N/A"`. For tests.
    pub fn empty() -> Self {
        Self {
            exact: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Resolves an issuer name to a ticker: exact match first, then
    /// substring containment in either direction, else `"N/A"`.
    pub fn lookup(&self, company_name: &str) -> String {
        let name = company_name.trim().to_uppercase();
        if name.is_empty() {
            return "N/A".to_string();
        }
        if let Some(symbol) = self.exact.get(&name) {
            return symbol.clone();
        }
        for (pattern, symbol) in &self.entries {
            if name.contains(pattern) || pattern.contains(&name) {
                return symbol.clone();
            }
        }
        "N/A".to_string()
    }
}

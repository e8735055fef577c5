//! Instrument records and the pure derivation rules shared by every search path.
//!
//! An instrument listing is identified by `(exchange, token)` and stored in the
//! contract cache under two hashes:
//!
//! | Hash | Key shape | Example |
//! |------|-----------|---------|
//! | [`STOCK_KEY_HASH`] | `{EXCHANGE}_{TOKEN}` | `NSE_2885` |
//! | [`ISIN_HASH`] | `{EXCHANGE}-{ISIN}` | `BSE-INE002A01018` |

pub mod derive;
pub mod symbol;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hash holding instruments keyed by exchange and token.
pub const STOCK_KEY_HASH: &str = "stock_key";

/// Hash holding instruments keyed by exchange and ISIN.
pub const ISIN_HASH: &str = "isin_data";

/// Series value that marks an index instrument.
pub const INDEX_SERIES: &str = "INDICES";

/// Exchanges an instrument can be listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// National Stock Exchange, cash segment.
    Nse,
    /// Bombay Stock Exchange, cash segment.
    Bse,
    /// NSE futures and options.
    Nfo,
    /// BSE futures and options.
    Bfo,
    /// Currency derivatives.
    Cds,
    /// Multi Commodity Exchange.
    Mcx,
}

impl Exchange {
    /// All known exchanges.
    pub const ALL: [Exchange; 6] = [
        Exchange::Nse,
        Exchange::Bse,
        Exchange::Nfo,
        Exchange::Bfo,
        Exchange::Cds,
        Exchange::Mcx,
    ];

    /// Wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nse => "NSE",
            Self::Bse => "BSE",
            Self::Nfo => "NFO",
            Self::Bfo => "BFO",
            Self::Cds => "CDS",
            Self::Mcx => "MCX",
        }
    }

    /// Whether this is one of the two primary equity exchanges.
    #[must_use]
    pub fn is_primary_equity(self) -> bool {
        matches!(self, Self::Nse | Self::Bse)
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ex| ex.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown exchange: {}", s))
    }
}

/// The canonical per-listing record stored in the contract cache.
///
/// Field names follow the JSON stored by the ingestion pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRecord {
    /// Exchange-assigned identifier, unique per exchange.
    pub token: String,
    /// Exchange code (NSE, BSE, NFO, BFO, CDS, MCX).
    pub exchange: String,
    /// Base symbol (e.g. "NIFTY").
    #[serde(default)]
    pub symbol: String,
    /// Full trading symbol (e.g. "NIFTY24APR22000CE").
    #[serde(default)]
    pub trading_symbol: String,
    /// Company or instrument name.
    #[serde(default)]
    pub name: String,
    /// ISIN, empty for derivatives and indices.
    #[serde(default)]
    pub isin: String,
    /// Series; [`INDEX_SERIES`] marks an index.
    #[serde(default)]
    pub series: String,
    /// Token of the same instrument on the other primary exchange.
    #[serde(default)]
    pub alternate_token: String,
    /// Expiry date as stored by ingestion.
    #[serde(default)]
    pub expiry: String,
    /// Strike price, zero for non-options.
    #[serde(default)]
    pub strike: f64,
    /// Previous close.
    #[serde(default)]
    pub close_price: f64,
    /// Margin trading eligibility.
    #[serde(default)]
    pub is_mtf_eligible: bool,
    /// Ordering key, higher sorts first in search results.
    #[serde(default)]
    pub inst_identifier: i64,
}

impl InstrumentRecord {
    /// Key of this record in [`STOCK_KEY_HASH`].
    #[must_use]
    pub fn stock_key(&self) -> String {
        stock_key(&self.exchange, &self.token)
    }

    /// Key of this record in [`ISIN_HASH`], if it carries an ISIN.
    #[must_use]
    pub fn isin_key(&self) -> Option<String> {
        if self.isin.is_empty() {
            None
        } else {
            Some(isin_key(&self.exchange, &self.isin))
        }
    }

    /// Parsed exchange, `None` for codes outside the known set.
    #[must_use]
    pub fn parsed_exchange(&self) -> Option<Exchange> {
        self.exchange.parse().ok()
    }
}

/// Builds a `{EXCHANGE}_{TOKEN}` key.
#[must_use]
pub fn stock_key(exchange: &str, token: &str) -> String {
    format!("{}_{}", exchange, token)
}

/// Builds a `{EXCHANGE}-{ISIN}` key.
#[must_use]
pub fn isin_key(exchange: &str, isin: &str) -> String {
    format!("{}-{}", exchange, isin)
}

/// Projection of an [`InstrumentRecord`] exposed to the search index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexEntry {
    /// Exchange code, the tag field of exchange-scoped queries.
    pub exchange: String,
    /// Full trading symbol.
    pub trading_symbol: String,
    /// Base symbol.
    pub symbol: String,
    /// Instrument name.
    pub name: String,
    /// ISIN, empty when absent.
    pub isin: String,
    /// Strike as indexed, see [`format_strike`].
    pub strike: String,
    /// Sort key, descending.
    pub inst_identifier: i64,
    /// Key of the backing record in [`STOCK_KEY_HASH`].
    pub stock_key: String,
}

impl From<&InstrumentRecord> for SearchIndexEntry {
    fn from(record: &InstrumentRecord) -> Self {
        Self {
            exchange: record.exchange.clone(),
            trading_symbol: record.trading_symbol.clone(),
            symbol: record.symbol.clone(),
            name: record.name.clone(),
            isin: record.isin.clone(),
            strike: format_strike(record.strike),
            inst_identifier: record.inst_identifier,
            stock_key: record.stock_key(),
        }
    }
}

/// Renders a strike the way it is indexed: integral strikes without decimals,
/// zero as empty.
#[must_use]
pub fn format_strike(strike: f64) -> String {
    if strike <= 0.0 {
        String::new()
    } else if strike.fract() == 0.0 {
        format!("{}", strike as i64)
    } else {
        format!("{}", strike)
    }
}

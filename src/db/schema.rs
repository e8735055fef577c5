//! Database schema types.

use crate::scrip::InstrumentRecord;
use sqlx::FromRow;

/// Row of the `instruments` table.
#[derive(Debug, Clone, FromRow)]
pub struct InstrumentRow {
    /// Exchange-assigned token.
    pub token: String,
    /// Exchange code.
    pub exchange: String,
    /// Base symbol.
    pub symbol: String,
    /// Full trading symbol.
    pub trading_symbol: String,
    /// Instrument name.
    pub name: String,
    /// ISIN, absent for derivatives and indices.
    pub isin: Option<String>,
    /// Series.
    pub series: Option<String>,
    /// Token on the other primary exchange.
    pub alternate_token: Option<String>,
    /// Expiry date.
    pub expiry: Option<String>,
    /// Strike price.
    pub strike: Option<f64>,
    /// Previous close.
    pub close_price: Option<f64>,
    /// Margin trading eligibility.
    pub is_mtf_eligible: bool,
    /// Ordering key, higher first.
    pub inst_identifier: i64,
}

impl From<InstrumentRow> for InstrumentRecord {
    fn from(row: InstrumentRow) -> Self {
        Self {
            token: row.token,
            exchange: row.exchange,
            symbol: row.symbol,
            trading_symbol: row.trading_symbol,
            name: row.name,
            isin: row.isin.unwrap_or_default(),
            series: row.series.unwrap_or_default(),
            alternate_token: row.alternate_token.unwrap_or_default(),
            expiry: row.expiry.unwrap_or_default(),
            strike: row.strike.unwrap_or_default(),
            close_price: row.close_price.unwrap_or_default(),
            is_mtf_eligible: row.is_mtf_eligible,
            inst_identifier: row.inst_identifier,
        }
    }
}

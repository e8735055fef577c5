//! Field derivation shared by the index search, the legacy search and
//! watchlist hydration. Everything here is pure.

use super::symbol::build_display_name;
use super::{Exchange, INDEX_SERIES, InstrumentRecord, isin_key, stock_key};
use crate::models::SearchResultRecord;

/// Segment of NSE/BSE cash listings.
pub const EQUITY_SEGMENT: &str = "Equity";

/// Segment of index instruments.
pub const INDEX_SEGMENT: &str = "indices";

/// Segment of MCX listings.
pub const COMMODITY_SEGMENT: &str = "Commodities";

/// Whether the record is an index.
#[must_use]
pub fn is_index(record: &InstrumentRecord) -> bool {
    record.series.eq_ignore_ascii_case(INDEX_SERIES)
}

/// Coarse asset-class classification. Indices win over the exchange rule.
#[must_use]
pub fn segment(record: &InstrumentRecord) -> String {
    if is_index(record) {
        return INDEX_SEGMENT.to_string();
    }
    match record.parsed_exchange() {
        Some(Exchange::Nse | Exchange::Bse) => EQUITY_SEGMENT.to_string(),
        Some(Exchange::Mcx) => COMMODITY_SEGMENT.to_string(),
        _ => record.exchange.clone(),
    }
}

/// Stock key of the alternate listing referenced by `alternateToken`.
///
/// Records not on NSE look on NSE; NSE records look on BSE.
#[must_use]
pub fn alternate_stock_key(record: &InstrumentRecord) -> Option<String> {
    if record.alternate_token.is_empty() {
        return None;
    }
    let target = if record.parsed_exchange() == Some(Exchange::Nse) {
        Exchange::Bse
    } else {
        Exchange::Nse
    };
    Some(stock_key(target.as_str(), &record.alternate_token))
}

/// ISIN key of the same equity on the other primary exchange.
#[must_use]
pub fn alternate_isin_key(record: &InstrumentRecord) -> Option<String> {
    if record.isin.is_empty() {
        return None;
    }
    let target = match record.parsed_exchange()? {
        Exchange::Nse => Exchange::Bse,
        Exchange::Bse => Exchange::Nse,
        _ => return None,
    };
    Some(isin_key(target.as_str(), &record.isin))
}

/// An alternate is only usable when it lives on a different exchange.
#[must_use]
pub fn is_cross_exchange(primary: &InstrumentRecord, alternate: &InstrumentRecord) -> bool {
    !primary.exchange.eq_ignore_ascii_case(&alternate.exchange)
}

/// Assembles the outward record, with the alternate nested when present.
#[must_use]
pub fn to_result_record(
    record: &InstrumentRecord,
    alternate: Option<&InstrumentRecord>,
) -> SearchResultRecord {
    let mut result = base_result(record);
    result.alternate = alternate.map(|alt| Box::new(base_result(alt)));
    result
}

fn base_result(record: &InstrumentRecord) -> SearchResultRecord {
    SearchResultRecord {
        token: record.token.clone(),
        exchange: record.exchange.clone(),
        company: record.name.clone(),
        symbol: record.symbol.clone(),
        isin: record.isin.clone(),
        trading_symbol: record.trading_symbol.clone(),
        display_name: build_display_name(
            &record.symbol,
            &record.exchange,
            &record.trading_symbol,
        ),
        series: record.series.clone(),
        segment: segment(record),
        expiry: record.expiry.clone(),
        strike: record.strike,
        is_tradable: !is_index(record),
        is_mtf_eligible: record.is_mtf_eligible,
        alternate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(exchange: &str, token: &str) -> InstrumentRecord {
        InstrumentRecord {
            token: token.to_string(),
            exchange: exchange.to_string(),
            symbol: "RELIANCE".to_string(),
            trading_symbol: "RELIANCE".to_string(),
            name: "Reliance Industries".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_segment_primary_equity() {
        assert_eq!(segment(&record("NSE", "2885")), "Equity");
        assert_eq!(segment(&record("BSE", "500325")), "Equity");
    }

    #[test]
    fn test_segment_commodities_and_raw() {
        assert_eq!(segment(&record("MCX", "1")), "Commodities");
        assert_eq!(segment(&record("NFO", "1")), "NFO");
        assert_eq!(segment(&record("XYZ", "1")), "XYZ");
    }

    #[test]
    fn test_segment_index_overrides_exchange() {
        let mut nifty = record("NSE", "26000");
        nifty.series = "INDICES".to_string();
        assert_eq!(segment(&nifty), "indices");
        assert!(is_index(&nifty));

        let result = to_result_record(&nifty, None);
        assert!(!result.is_tradable);
        assert_eq!(result.segment, "indices");
    }

    #[test]
    fn test_alternate_stock_key_direction() {
        let mut nse = record("NSE", "2885");
        nse.alternate_token = "500325".to_string();
        assert_eq!(alternate_stock_key(&nse).as_deref(), Some("BSE_500325"));

        let mut bse = record("BSE", "500325");
        bse.alternate_token = "2885".to_string();
        assert_eq!(alternate_stock_key(&bse).as_deref(), Some("NSE_2885"));

        assert!(alternate_stock_key(&record("NSE", "2885")).is_none());
    }

    #[test]
    fn test_alternate_isin_key() {
        let mut nse = record("NSE", "2885");
        nse.isin = "INE002A01018".to_string();
        assert_eq!(
            alternate_isin_key(&nse).as_deref(),
            Some("BSE-INE002A01018")
        );

        let mut nfo = record("NFO", "1");
        nfo.isin = "INE002A01018".to_string();
        assert!(alternate_isin_key(&nfo).is_none());
    }

    #[test]
    fn test_cross_exchange_check() {
        assert!(is_cross_exchange(&record("NSE", "1"), &record("BSE", "2")));
        assert!(!is_cross_exchange(&record("NSE", "1"), &record("nse", "2")));
    }

    #[test]
    fn test_to_result_record_nests_alternate() {
        let primary = record("NSE", "2885");
        let alternate = record("BSE", "500325");
        let result = to_result_record(&primary, Some(&alternate));

        assert_eq!(result.company, "Reliance Industries");
        assert_eq!(result.display_name, "RELIANCE");
        assert!(result.is_tradable);
        let alt = result.alternate.expect("alternate");
        assert_eq!(alt.exchange, "BSE");
        assert_eq!(alt.token, "500325");
        assert!(alt.alternate.is_none());
    }
}

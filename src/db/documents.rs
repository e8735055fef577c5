//! PostgreSQL-backed instrument document store.

use super::{DatabasePool, InstrumentRow};
use crate::scrip::{Exchange, InstrumentRecord};
use crate::search::{InstrumentDocuments, SearchError};
use async_trait::async_trait;
use tracing::{debug, error};

const FULL_TEXT_QUERY: &str = r#"
    SELECT token, exchange, symbol, trading_symbol, name, isin, series,
           alternate_token, expiry, strike, close_price, is_mtf_eligible,
           inst_identifier
    FROM instruments
    WHERE search_vector @@ to_tsquery('simple', $1)
      AND ($2::TEXT IS NULL OR exchange = $2)
    ORDER BY inst_identifier DESC
    LIMIT $3 OFFSET $4
"#;

/// [`InstrumentDocuments`] over the `instruments` table.
#[derive(Clone)]
pub struct PgInstrumentDocuments {
    db: DatabasePool,
}

impl PgInstrumentDocuments {
    /// Searches through `db`.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InstrumentDocuments for PgInstrumentDocuments {
    async fn full_text_search(
        &self,
        terms: &[String],
        exchange: Option<Exchange>,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<InstrumentRecord>, SearchError> {
        let Some((limit, offset)) = page_bounds(page, page_size) else {
            debug!(page, page_size, "Page offset out of range");
            return Ok(Vec::new());
        };
        let rows: Vec<InstrumentRow> = sqlx::query_as(FULL_TEXT_QUERY)
            .bind(prefix_tsquery(terms))
            .bind(exchange.map(Exchange::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| {
                error!("Full-text search failed: {}", e);
                SearchError::Documents(e.to_string())
            })?;

        Ok(rows.into_iter().map(InstrumentRecord::from).collect())
    }
}

/// SQL `LIMIT` and `OFFSET` for a 1-based page, `None` past `i64` range.
fn page_bounds(page: usize, page_size: usize) -> Option<(i64, i64)> {
    let size = i64::try_from(page_size).ok()?;
    let skipped = i64::try_from(page.max(1) - 1).ok()?;
    Some((size, skipped.checked_mul(size)?))
}

/// `to_tsquery` text requiring every term as a word prefix.
///
/// Terms are alphanumeric, so no tsquery operator can reach the query.
fn prefix_tsquery(terms: &[String]) -> String {
    terms
        .iter()
        .map(|term| format!("{}:*", term))
        .collect::<Vec<_>>()
        .join(" & ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 20), Some((20, 0)));
        assert_eq!(page_bounds(3, 20), Some((20, 40)));
        assert_eq!(page_bounds(0, 20), Some((20, 0)));
    }

    #[test]
    fn test_page_bounds_out_of_range() {
        assert_eq!(page_bounds(usize::MAX, 20), None);
        assert_eq!(page_bounds(usize::MAX / 10, 20), None);
        assert_eq!(page_bounds(2, usize::MAX), None);
    }

    #[test]
    fn test_prefix_tsquery() {
        let terms = vec!["reliance".to_string(), "ind".to_string()];
        assert_eq!(prefix_tsquery(&terms), "reliance:* & ind:*");
        assert_eq!(prefix_tsquery(&["reli".to_string()]), "reli:*");
    }
}

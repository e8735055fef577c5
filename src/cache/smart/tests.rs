//! Unit tests for smart cache module.

use super::*;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Index double that records every query and replays canned results.
#[derive(Default)]
struct ScriptedIndex {
    calls: Mutex<Vec<(IndexQuery, usize, usize)>>,
    replies: Mutex<VecDeque<Vec<String>>>,
}

impl ScriptedIndex {
    fn with_replies(replies: Vec<Vec<&str>>) -> Arc<Self> {
        let replies = replies
            .into_iter()
            .map(|keys| keys.into_iter().map(String::from).collect())
            .collect();
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies),
        })
    }

    fn calls(&self) -> Vec<(IndexQuery, usize, usize)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SearchIndex for ScriptedIndex {
    async fn execute(
        &self,
        query: &IndexQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, CacheError> {
        self.calls.lock().push((query.clone(), offset, limit));
        Ok(self.replies.lock().pop_front().unwrap_or_default())
    }
}

// ============================================================================
// Query Rendering Tests
// ============================================================================

#[test]
fn test_prefix_query_scoped_to_exchange() {
    let query = IndexQuery::Prefix {
        exchange: Some(Exchange::Nse),
        term: "RELI".to_string(),
    };
    assert_eq!(
        query.to_redisearch(),
        "@exchange:{NSE} ((@tradingSymbol:RELI*)|(@symbol:RELI*)|(@name:RELI*)|(@isin:RELI*))"
    );
}

#[test]
fn test_prefix_query_unscoped() {
    let query = IndexQuery::Prefix {
        exchange: None,
        term: "RELI".to_string(),
    };
    assert_eq!(
        query.to_string(),
        "(@tradingSymbol:RELI*)|(@symbol:RELI*)|(@name:RELI*)|(@isin:RELI*)"
    );
}

#[test]
fn test_substring_query() {
    let query = IndexQuery::Substring {
        term: "BANK".to_string(),
    };
    assert_eq!(
        query.to_redisearch(),
        "(@tradingSymbol:*BANK*)|(@symbol:*BANK*)|(@name:*BANK*)|(@isin:*BANK*)"
    );
}

#[test]
fn test_fuzzy_query_excludes_isin() {
    let query = IndexQuery::Fuzzy {
        exchange: Some(Exchange::Bse),
        term: "RELAINCE".to_string(),
    };
    assert_eq!(
        query.to_redisearch(),
        "@exchange:{BSE} ((@tradingSymbol:%%RELAINCE%%)|(@symbol:%%RELAINCE%%)|(@name:%%RELAINCE%%))"
    );
}

#[test]
fn test_strike_query() {
    let query = IndexQuery::Strike {
        term: "22000".to_string(),
    };
    assert_eq!(query.to_redisearch(), "@strike:22000*");
}

#[test]
fn test_is_numeric() {
    assert!(is_numeric("22000"));
    assert!(!is_numeric("22000CE"));
    assert!(!is_numeric(""));
}

// ============================================================================
// Pass Strategy Tests
// ============================================================================

#[tokio::test]
async fn test_exchange_scoped_prefix_is_single_pass() {
    let index = ScriptedIndex::with_replies(vec![vec!["NSE_2885"]]);
    let smart = SmartCache::new(index.clone());

    let keys = smart
        .perform_new_search(Some("nse"), "RELI", 0, 10, false)
        .await
        .unwrap();

    assert_eq!(keys, vec!["NSE_2885"]);
    let calls = index.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        IndexQuery::Prefix {
            exchange: Some(Exchange::Nse),
            term: "RELI".to_string()
        }
    );
}

#[tokio::test]
async fn test_numeric_term_without_exchange_searches_strike() {
    let index = ScriptedIndex::with_replies(vec![vec!["NFO_1"]]);
    let smart = SmartCache::new(index.clone());

    smart
        .perform_new_search(None, "22000", 0, 10, false)
        .await
        .unwrap();

    let calls = index.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        IndexQuery::Strike {
            term: "22000".to_string()
        }
    );
}

#[tokio::test]
async fn test_numeric_term_with_exchange_searches_names() {
    let index = ScriptedIndex::with_replies(vec![vec![]]);
    let smart = SmartCache::new(index.clone());

    smart
        .perform_new_search(Some("BSE"), "500325", 0, 10, false)
        .await
        .unwrap();

    assert!(matches!(index.calls()[0].0, IndexQuery::Prefix { .. }));
}

#[tokio::test]
async fn test_unscoped_prefix_fills_with_substring() {
    let index = ScriptedIndex::with_replies(vec![
        vec!["NSE_1", "BSE_2"],
        vec!["NSE_3", "NSE_1"],
    ]);
    let smart = SmartCache::new(index.clone());

    let keys = smart
        .perform_new_search(Some("  "), "BANK", 5, 4, false)
        .await
        .unwrap();

    assert_eq!(keys, vec!["NSE_1", "BSE_2", "NSE_3", "NSE_1"]);
    let calls = index.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0].0, IndexQuery::Prefix { exchange: None, .. }));
    assert_eq!((calls[0].1, calls[0].2), (5, 4));
    assert!(matches!(calls[1].0, IndexQuery::Substring { .. }));
    assert_eq!((calls[1].1, calls[1].2), (5, 2));
}

#[tokio::test]
async fn test_unscoped_prefix_full_page_skips_substring() {
    let index = ScriptedIndex::with_replies(vec![vec!["NSE_1", "NSE_2"]]);
    let smart = SmartCache::new(index.clone());

    let keys = smart
        .perform_new_search(None, "BANK", 0, 2, false)
        .await
        .unwrap();

    assert_eq!(keys.len(), 2);
    assert_eq!(index.calls().len(), 1);
}

#[tokio::test]
async fn test_fuzzy_without_exchange_queries_nse_then_bse() {
    let index = ScriptedIndex::with_replies(vec![vec!["NSE_2885"], vec!["BSE_500325"]]);
    let smart = SmartCache::new(index.clone());

    let keys = smart
        .perform_new_search(None, "RELAINCE", 0, 10, true)
        .await
        .unwrap();

    assert_eq!(keys, vec!["NSE_2885", "BSE_500325"]);
    let calls = index.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].0,
        IndexQuery::Fuzzy {
            exchange: Some(Exchange::Nse),
            term: "RELAINCE".to_string()
        }
    );
    assert_eq!(
        calls[1].0,
        IndexQuery::Fuzzy {
            exchange: Some(Exchange::Bse),
            term: "RELAINCE".to_string()
        }
    );
}

#[tokio::test]
async fn test_fuzzy_second_pass_runs_even_when_first_is_full() {
    let index = ScriptedIndex::with_replies(vec![vec!["NSE_1"], vec![]]);
    let smart = SmartCache::new(index.clone());

    smart
        .perform_new_search(None, "X", 0, 1, true)
        .await
        .unwrap();

    assert_eq!(index.calls().len(), 2);
}

#[tokio::test]
async fn test_zero_capacity_or_empty_term_issues_no_query() {
    let index = ScriptedIndex::with_replies(vec![]);
    let smart = SmartCache::new(index.clone());

    assert!(smart
        .perform_new_search(None, "RELI", 0, 0, false)
        .await
        .unwrap()
        .is_empty());
    assert!(smart
        .perform_new_search(None, "", 0, 10, false)
        .await
        .unwrap()
        .is_empty());
    assert!(index.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_exchange_issues_no_query() {
    let index = ScriptedIndex::with_replies(vec![vec!["NSE_1"]]);
    let smart = SmartCache::new(index.clone());

    for exchange in ["NSE} | @name:{*", "XYZ", "@exchange"] {
        for fuzzy in [false, true] {
            let keys = smart
                .perform_new_search(Some(exchange), "RELI", 0, 10, fuzzy)
                .await
                .unwrap();
            assert!(keys.is_empty());
        }
    }
    assert!(index.calls().is_empty());
}

#[test]
fn test_parse_exchange() {
    assert_eq!(parse_exchange(None), Ok(None));
    assert_eq!(parse_exchange(Some("  ")), Ok(None));
    assert_eq!(parse_exchange(Some(" mcx ")), Ok(Some(Exchange::Mcx)));
    assert_eq!(parse_exchange(Some("NSE}|")), Err("NSE}|"));
}

// ============================================================================
// Reply Parsing Tests
// ============================================================================

fn bulk(s: &str) -> Value {
    Value::BulkString(s.as_bytes().to_vec())
}

#[test]
fn test_parse_search_reply() {
    let reply = vec![
        Value::Int(2),
        bulk("scrip:NSE_2885"),
        Value::Array(vec![bulk("stockKey"), bulk("NSE_2885")]),
        bulk("scrip:BSE_500325"),
        Value::Array(vec![bulk("stockKey"), bulk("BSE_500325")]),
    ];

    let keys = parse_search_reply(&reply).unwrap();
    assert_eq!(keys, vec!["NSE_2885", "BSE_500325"]);
}

#[test]
fn test_parse_search_reply_skips_documents_without_stock_key() {
    let reply = vec![
        Value::Int(2),
        bulk("scrip:orphan"),
        Value::Array(vec![]),
        bulk("scrip:NSE_1"),
        Value::Array(vec![bulk("stockKey"), bulk("NSE_1")]),
    ];

    assert_eq!(parse_search_reply(&reply).unwrap(), vec!["NSE_1"]);
}

#[test]
fn test_parse_search_reply_empty_hits() {
    assert!(parse_search_reply(&[Value::Int(0)]).unwrap().is_empty());
}

#[test]
fn test_parse_search_reply_rejects_empty_reply() {
    assert!(matches!(
        parse_search_reply(&[]),
        Err(CacheError::Protocol(_))
    ));
}

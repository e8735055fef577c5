//! Per-instrument cache of hydrated records with a fixed daily expiry.
//!
//! Contract data is refreshed once a day before market open, so hydrated
//! records stay valid until the next reset time (08:30 IST by default).

use crate::models::SearchResultRecord;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use dashmap::DashMap;

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Present and not yet expired.
    Fresh(T),
    /// Present but past its expiry.
    Expired(T),
    /// Never cached.
    Missing,
}

/// Cache of hydrated records keyed by stock key.
pub trait HydrationCache: Send + Sync {
    /// Looks up `key` as of `now`.
    fn get(&self, key: &str, now: DateTime<Utc>) -> Lookup<SearchResultRecord>;

    /// Stores `record` until `expiry`. Concurrent writers of the same key
    /// race; the last write wins.
    fn put(&self, key: &str, record: SearchResultRecord, expiry: DateTime<Utc>);

    /// Number of cached entries, expired ones included.
    fn len(&self) -> usize;

    /// Whether nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`HydrationCache`] backed by a concurrent map.
#[derive(Debug, Default)]
pub struct DailyExpiryCache {
    entries: DashMap<String, (SearchResultRecord, DateTime<Utc>)>,
}

impl DailyExpiryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HydrationCache for DailyExpiryCache {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Lookup<SearchResultRecord> {
        match self.entries.get(key) {
            Some(entry) => {
                let (record, expiry) = entry.value();
                if now < *expiry {
                    Lookup::Fresh(record.clone())
                } else {
                    Lookup::Expired(record.clone())
                }
            }
            None => Lookup::Missing,
        }
    }

    fn put(&self, key: &str, record: SearchResultRecord, expiry: DateTime<Utc>) {
        self.entries.insert(key.to_string(), (record, expiry));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Daily reset time in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSchedule {
    time: NaiveTime,
    offset: FixedOffset,
}

impl ResetSchedule {
    /// Builds a schedule for `hour:minute` at `utc_offset_minutes` east of UTC.
    ///
    /// # Errors
    /// Returns an error if the time or offset is out of range.
    pub fn new(hour: u32, minute: u32, utc_offset_minutes: i32) -> Result<Self, String> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| format!("invalid reset time {:02}:{:02}", hour, minute))?;
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60)
            .ok_or_else(|| format!("invalid utc offset {} minutes", utc_offset_minutes))?;
        Ok(Self { time, offset })
    }

    /// The first reset strictly after `now`.
    #[must_use]
    pub fn next_reset(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_today = now.with_timezone(&self.offset).date_naive().and_time(self.time);
        let candidate = self
            .offset
            .from_local_datetime(&local_today)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(1)
        }
    }
}

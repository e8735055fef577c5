//! Cache layer: the contract cache (metadata store), the smart cache (search
//! index) and the daily hydration cache.

pub mod contract;
mod error;
pub mod hydration;
pub mod memory;
pub mod redis;
pub mod smart;

pub use contract::{ContractStore, RedisContractStore};
pub use error::CacheError;
pub use hydration::{DailyExpiryCache, HydrationCache, Lookup, ResetSchedule};
pub use memory::{MemoryContractStore, MemorySearchIndex};
pub use redis::RedisHandle;
pub use smart::{IndexQuery, RedisSearchIndex, SearchIndex, SmartCache, parse_exchange};

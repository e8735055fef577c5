//! Instrument document store: PostgreSQL full-text search and an in-process
//! fallback.

mod documents;
mod memory;
mod pool;
mod schema;

pub use documents::PgInstrumentDocuments;
pub use memory::MemoryDocuments;
pub use pool::DatabasePool;
pub use schema::*;

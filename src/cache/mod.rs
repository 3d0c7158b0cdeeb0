//! Persistent summary cache keyed by content fingerprint.

pub mod schema;
pub mod store;

pub use store::SummaryCache;

//! Access resolution for premium tracking.
//!
//! Two sources say whether a tracking identifier has been unlocked:
//! the durable [`AccessStatusStore`] and a device-local [`LocalAccessCache`].
//! The store wins; the cache is only a hint, and a hint the store does not
//! know about is written back to it (cache → store, never the reverse).
//!
//! # Architecture
//!
//! ```text
//! resolve(id)
//!      │
//!      ▼
//! ┌─────────────────────┐
//! │ Query access store  │
//! └─────────┬───────────┘
//!           │
//!    ┌──────┼───────────────┐
//!    │      │               │
//!  FOUND  MISSING      UNAVAILABLE
//!    │      │               │
//!    ▼      ▼               ▼
//! GRANTED  Read cache     Read cache
//!           │               │
//!      ┌────┴────┐     ┌────┴────┐
//!   UNLOCKED   other  UNLOCKED  other
//!      │         │     │         │
//!      ▼         ▼     ▼         ▼
//!  Append +   DENIED  GRANTED   DENIED
//!  GRANTED           (no write)
//! ```

mod cache;
mod resolver;
mod store;

pub use cache::{CacheStats, LocalAccessCache, LruAccessCache};
pub use resolver::{
    AccessPolicy, AccessStatus, PaymentStatusResolver, ResolverConfig, ResolverStats, StoreAnswer,
};
pub use store::{AccessRecord, AccessStatusStore, InMemoryAccessStore, Price};

//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use cpamm_execution::prelude::*;
//! ```

pub use crate::cache::{CacheConfig, PoolSet, PoolStateCache, RefreshOutcome, RefreshReport};
pub use crate::error::CacheError;
pub use crate::positions::PositionTracker;
pub use crate::quote_service::QuoteService;
pub use crate::scheduler::{RefreshEvent, RefreshScheduler};

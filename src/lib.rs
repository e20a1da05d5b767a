//! # quant-est
//!
//! Bounded-memory approximate quantile summaries.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`quant_core`]: error type, observation trait, growable buffer and the
//!   [`QuantileSummary`](quant_core::QuantileSummary) query trait
//! - [`quant_summary`]: batch rank-band summaries and Greenwald-Khanna
//!   streaming summaries
//!
//! ## Quick start
//!
//! ```rust
//! use quant_est::prelude::*;
//!
//! let mut stream = StreamingSummary::new(0.01, 100_000).unwrap();
//! for i in 0..100_000u64 {
//!     stream.update((i * 7919) % 100_000).unwrap();
//! }
//! let summary = stream.finish().unwrap();
//!
//! let p50 = summary.quantile(0.5).unwrap();
//! assert!(p50.abs_diff(50_000) <= 1_000);
//! ```

pub use quant_core;
pub use quant_summary;

pub use quant_core::{Error, GrowableBuffer, Observation, QuantileSummary, Result};
pub use quant_summary::{
    BatchSummary, FinishedSummary, GkTuple, RankTuple, StreamConfig, StreamingSummary,
    SummaryState,
};

/// Commonly used items
pub mod prelude {
    pub use quant_core::{Error, Observation, QuantileSummary, Result};
    pub use quant_summary::{
        BatchSummary, FinishedSummary, RankTuple, StreamConfig, StreamingSummary, SummaryState,
    };
}

//! Approximate quantile summaries
//!
//! Two summary kinds share the [`QuantileSummary`] query surface:
//!
//! - [`BatchSummary`]: a bounded collection of observations with rank bands.
//!   It supports exact rank queries, compression to evenly spaced ranks, and
//!   combining two summaries into one.
//! - [`StreamingSummary`]: a Greenwald-Khanna summary over an unbounded stream
//!   using a hierarchy of compressed levels. [`StreamingSummary::finish`]
//!   turns it into a [`FinishedSummary`] whose answers are within about
//!   `epsilon * n` ranks of the true quantile (see
//!   [`FinishedSummary::quantile`] for short streams).
//!
//! # Example
//!
//! ```rust
//! use quant_summary::{BatchSummary, QuantileSummary, StreamConfig, StreamingSummary};
//!
//! // batch
//! let mut batch = BatchSummary::new(100).unwrap();
//! for i in 0..100 {
//!     batch.insert(i as f64).unwrap();
//! }
//! batch.compress(10).unwrap();
//! let p90 = batch.quantile(0.9).unwrap();
//! assert_eq!(p90, 89.0);
//!
//! // streaming
//! let config = StreamConfig::default().with_epsilon(0.05);
//! let mut stream = StreamingSummary::<i32>::from_config(config).unwrap();
//! for i in 0..1000 {
//!     stream.update(i).unwrap();
//! }
//! let summary = stream.finish().unwrap();
//! let median = summary.quantile(0.5).unwrap();
//! assert!((median - 500).abs() <= 50);
//! ```

pub mod batch;
pub mod config;
pub mod stream;

pub use batch::{rank_binary_search, BatchSummary, RankTuple, SummaryState};
pub use config::StreamConfig;
pub use stream::{FinishedSummary, GkTuple, StreamingSummary};

// Re-export core types
pub use quant_core::{Error, Observation, QuantileSummary, Result};

//! Core traits and types for approximate quantile summaries
//!
//! This crate holds the pieces shared by every summary implementation:
//!
//! - [`Error`] / [`Result`]: the single error taxonomy (full, out of memory,
//!   invalid parameter, not found, ...)
//! - [`Observation`]: the numeric scalar bound for stored values
//! - [`GrowableBuffer`]: fallible, geometrically growing array/stack
//! - [`QuantileSummary`]: the query trait summaries implement
//!
//! # Example
//!
//! ```rust
//! use quant_core::{GrowableBuffer, Result};
//!
//! fn fill() -> Result<GrowableBuffer<f64>> {
//!     let mut buf = GrowableBuffer::with_capacity(4)?;
//!     for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!         buf.push(v)?;
//!     }
//!     Ok(buf)
//! }
//!
//! let buf = fill().unwrap();
//! assert_eq!(buf.len(), 5);
//! assert_eq!(buf.peek(), Some(&5.0));
//! ```

pub mod buffer;
pub mod error;
pub mod numeric;
pub mod traits;

// Re-export core types
pub use buffer::GrowableBuffer;
pub use error::{Error, Result};
pub use numeric::Observation;
pub use traits::QuantileSummary;

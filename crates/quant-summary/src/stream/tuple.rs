//! Greenwald-Khanna tuples

use quant_core::Observation;

/// A stored value with its Greenwald-Khanna rank information
///
/// `g` is the difference between this tuple's minimum rank and the previous
/// tuple's minimum rank, so the minimum rank of a tuple is the running sum of
/// `g`. `delta` bounds how far its maximum rank lies above the minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GkTuple<T> {
    pub value: T,
    pub g: u64,
    pub delta: u64,
}

impl<T: Observation> GkTuple<T> {
    pub fn new(value: T, g: u64, delta: u64) -> Self {
        Self { value, g, delta }
    }

    /// Tuple for a freshly observed value
    #[inline]
    pub fn fresh(value: T) -> Self {
        Self::new(value, 1, 0)
    }
}

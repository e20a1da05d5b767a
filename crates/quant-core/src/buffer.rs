//! Geometrically growing buffer used as both dynamic array and stack
//!
//! `GrowableBuffer` backs every variable-length sequence in the summaries:
//! batch tuple arrays, the raw level-0 stream buffer, compressed levels and
//! the level list itself.
//!
//! Growth is explicit and fallible. When a push finds the buffer full the
//! new capacity is `floor(max(capacity, requested) * 1.3) + 5`, and the
//! allocation goes through `try_reserve_exact` so an allocator failure is
//! reported as [`Error::OutOfMemory`] instead of aborting. A failed grow leaves
//! the buffer untouched.

use std::ops::{Deref, DerefMut};

use crate::{Error, Result};

/// Capacity used when a buffer is created with a requested capacity of zero
pub const DEFAULT_CAPACITY: usize = 16;

/// Multiplicative growth factor
pub const GROWTH_FACTOR: f64 = 1.3;

/// Fixed slack added on every grow so tiny buffers don't realloc constantly
pub const GROWTH_SLACK: usize = 5;

/// Dynamically growing indexable sequence with stack operations
///
/// The buffer keeps its own logical capacity, which is what growth decisions
/// and [`push_unchecked`](Self::push_unchecked) are based on.
///
/// An optional release hook turns on the "free on teardown" mode: every
/// element discarded by [`truncate`](Self::truncate), [`clear`](Self::clear)
/// or by dropping the buffer is handed to the hook instead of being dropped
/// silently.
#[derive(Debug, Clone)]
pub struct GrowableBuffer<E> {
    items: Vec<E>,
    capacity: usize,
    release: Option<fn(E)>,
}

impl<E> GrowableBuffer<E> {
    /// Create an empty buffer with the default capacity
    ///
    /// # Panics
    /// If the default capacity cannot be allocated.
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
            release: None,
        }
    }

    /// Create an empty buffer able to hold `capacity` elements without growing
    ///
    /// A requested capacity of zero falls back to [`DEFAULT_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self {
            items,
            capacity,
            release: None,
        })
    }

    /// Wrap an existing vector; capacity becomes its length
    pub fn from_vec(items: Vec<E>) -> Self {
        let capacity = items.len().max(1);
        Self {
            items,
            capacity,
            release: None,
        }
    }

    /// Enable the teardown mode with a per-element release hook
    pub fn with_release(mut self, release: fn(E)) -> Self {
        self.release = Some(release);
        self
    }

    /// Whether discarded elements go through a release hook
    #[inline]
    pub fn releases_elements(&self) -> bool {
        self.release.is_some()
    }

    /// Number of elements stored
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Logical capacity of the buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Make sure at least `extra` more elements fit without growing again
    pub fn reserve(&mut self, extra: usize) -> Result<()> {
        let required = self
            .items
            .len()
            .checked_add(extra)
            .ok_or_else(|| Error::InvalidParameter(format!("cannot reserve {extra} more elements")))?;
        if self.capacity < required {
            self.grow(required)?;
        }
        Ok(())
    }

    /// Append an element, growing the buffer if it is full
    #[inline]
    pub fn push(&mut self, elem: E) -> Result<()> {
        if self.items.len() == self.capacity {
            self.grow(self.capacity + 1)?;
        }
        self.items.push(elem);
        Ok(())
    }

    /// Append an element without checking for space
    ///
    /// The caller must have ensured capacity, e.g. through
    /// [`with_capacity`](Self::with_capacity) or [`reserve`](Self::reserve).
    #[inline]
    pub fn push_unchecked(&mut self, elem: E) {
        debug_assert!(
            self.items.len() < self.capacity,
            "push_unchecked on a full buffer"
        );
        self.items.push(elem);
    }

    /// Remove and return the top element
    #[inline]
    pub fn pop(&mut self) -> Option<E> {
        self.items.pop()
    }

    /// Remove and return the top element of a buffer known to be non-empty
    ///
    /// # Panics
    /// If the buffer is empty.
    #[inline]
    pub fn pop_unchecked(&mut self) -> E {
        match self.items.pop() {
            Some(elem) => elem,
            None => panic!("pop_unchecked on an empty buffer"),
        }
    }

    /// The top element without removing it
    #[inline]
    pub fn peek(&self) -> Option<&E> {
        self.items.last()
    }

    /// Mutable access to the top element
    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut E> {
        self.items.last_mut()
    }

    /// Shorten the buffer to `new_len` elements
    ///
    /// Does nothing if the buffer is already that short. Dropped elements go
    /// through the release hook when one is set.
    pub fn truncate(&mut self, new_len: usize) {
        if self.items.len() <= new_len {
            return;
        }
        match self.release {
            Some(release) => self.items.drain(new_len..).for_each(release),
            None => self.items.truncate(new_len),
        }
    }

    /// Remove every element, keeping the allocation
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shrink the backing storage to exactly `len + 1` elements
    pub fn compact(&mut self) {
        let min_capacity = self.items.len() + 1;
        if self.capacity > min_capacity {
            self.items.shrink_to(min_capacity);
            self.capacity = min_capacity;
        }
    }

    /// Convert into a plain vector, bypassing the release hook
    pub fn into_vec(mut self) -> Vec<E> {
        std::mem::take(&mut self.items)
    }

    /// View the contents as a slice
    #[inline]
    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    /// View the contents as a mutable slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [E] {
        &mut self.items
    }

    fn grow(&mut self, requested: usize) -> Result<()> {
        let base = self.capacity.max(requested);
        let new_capacity = (base as f64 * GROWTH_FACTOR) as usize + GROWTH_SLACK;
        self.items
            .try_reserve_exact(new_capacity - self.items.len())?;
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<E> Default for GrowableBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Deref for GrowableBuffer<E> {
    type Target = [E];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<E> DerefMut for GrowableBuffer<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<'a, E> IntoIterator for &'a GrowableBuffer<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<E> Drop for GrowableBuffer<E> {
    fn drop(&mut self) {
        if let Some(release) = self.release {
            self.items.drain(..).for_each(release);
        }
    }
}

//! Operations on single levels of a streaming summary
//!
//! A level is a value-sorted sequence of [`GkTuple`]s. Fresh buffers are
//! reduced with [`merge_values`] and [`prune`]; two levels covering disjoint
//! parts of the stream are folded with [`gk_merge`].

use quant_core::{GrowableBuffer, Observation, Result};
use tracing::trace;

use super::GkTuple;

/// Storage for one level
pub type Level<T> = GrowableBuffer<GkTuple<T>>;

/// Collapse runs of equal values in a sorted level
///
/// Each run keeps its last tuple. The survivor absorbs the `g` of the removed
/// tuples and keeps its own `delta`, so the total `g` is unchanged.
pub fn merge_values<T: Observation>(level: &mut Level<T>) {
    let mut write = 0;
    for read in 0..level.len() {
        let t = level[read];
        if write > 0 && level[write - 1].value == t.value {
            let survivor = &mut level[write - 1];
            survivor.g += t.g;
            survivor.delta = t.delta;
        } else {
            level[write] = t;
            write += 1;
        }
    }
    level.truncate(write);
}

/// Number of observations a level accounts for: total `g` plus the last `delta`
pub fn level_size<T>(level: &[GkTuple<T>]) -> u64 {
    let mass: u64 = level.iter().map(|t| t.g).sum();
    mass + level.last().map_or(0, |t| t.delta)
}

/// Keep the tuples closest to `bins + 1` evenly spaced ranks
///
/// Target `i` is `max(1, ceil(size * i / bins))`. For each target the first
/// tuple whose minimum rank reaches it is picked, or its predecessor when that
/// one is strictly nearer and not emitted yet. Each target emits at most one
/// tuple, so the output holds at most `bins + 1` tuples. Target 0 keeps the
/// first tuple and the last target equals the level size, which no tuple's
/// minimum rank exceeds, so the last tuple is kept and the total `g` preserved.
pub fn prune<T: Observation>(level: &[GkTuple<T>], bins: usize) -> Result<Level<T>> {
    let bins = bins.max(1);
    let mut pruned = GrowableBuffer::with_capacity(bins.saturating_add(1))?;
    if level.is_empty() {
        return Ok(pruned);
    }
    let size = level_size(level) as u128;

    // cursor over the level: `rmin` is the minimum rank of `level[idx]`,
    // `prev_rmin` the one of `level[idx - 1]`
    let mut idx = 0;
    let mut rmin = level[0].g;
    let mut prev_rmin = 0;
    let mut emitted: Option<usize> = None;
    let mut emitted_rmin = 0;

    for i in 0..=bins as u128 {
        let target = ((size * i).div_ceil(bins as u128) as u64).max(1);
        while idx + 1 < level.len() && rmin < target {
            idx += 1;
            prev_rmin = rmin;
            rmin += level[idx].g;
        }

        let (pick, pick_rmin) = if idx > 0
            && emitted.map_or(true, |e| idx - 1 > e)
            && target - prev_rmin < rmin.saturating_sub(target)
        {
            (idx - 1, prev_rmin)
        } else {
            (idx, rmin)
        };
        if emitted.is_some_and(|e| pick <= e) {
            continue;
        }

        trace!("prune target {} picked tuple {} (rmin {})", target, pick, pick_rmin);
        pruned.push_unchecked(GkTuple::new(
            level[pick].value,
            pick_rmin - emitted_rmin,
            level[pick].delta,
        ));
        emitted = Some(pick);
        emitted_rmin = pick_rmin;
    }
    debug_assert_eq!(emitted, Some(level.len() - 1));
    Ok(pruned)
}

/// Merge two levels summarising disjoint parts of the stream
///
/// `count_a` and `count_b` are the numbers of observations behind each
/// level. Tuples are interleaved by value, ties taking `a` first. A tuple's
/// minimum rank grows by the minimum rank of the other level's preceding
/// tuple; its maximum rank by the other level's following maximum rank minus
/// one, or by that level's size when nothing follows. The first tuple gets
/// `delta = floor(eps * total)`; every `g + delta` is capped at
/// `floor(2 * eps * total)`. The result is value-merged.
pub fn gk_merge<T: Observation>(
    a: &[GkTuple<T>],
    b: &[GkTuple<T>],
    epsilon: f64,
    count_a: u64,
    count_b: u64,
) -> Result<Level<T>> {
    let total = count_a.saturating_add(count_b) as f64;
    let cap = (2.0 * epsilon * total).floor() as u64;
    let first_delta = (epsilon * total).floor() as u64;
    let (size_a, size_b) = (level_size(a), level_size(b));

    let mut merged = GrowableBuffer::with_capacity(a.len() + b.len())?;
    // minimum rank of the last consumed tuple on each side
    let (mut cum_a, mut cum_b) = (0u64, 0u64);
    let (mut i, mut j) = (0, 0);
    let mut prev_rmin = 0;

    while i < a.len() || j < b.len() {
        let take_a = j == b.len() || (i < a.len() && a[i].value <= b[j].value);
        let (t, own_rmin, preceding, following) = if take_a {
            let t = a[i];
            cum_a += t.g;
            i += 1;
            (t, cum_a, cum_b, following_rmax(b, j, cum_b, size_b))
        } else {
            let t = b[j];
            cum_b += t.g;
            j += 1;
            (t, cum_b, cum_a, following_rmax(a, i, cum_a, size_a))
        };

        let rmin = own_rmin + preceding;
        let rmax = (own_rmin + t.delta + following).max(rmin);
        let g = rmin - prev_rmin;
        prev_rmin = rmin;

        let room = cap.saturating_sub(g);
        let delta = if merged.is_empty() {
            first_delta
        } else {
            rmax - rmin
        };
        merged.push_unchecked(GkTuple::new(t.value, g, delta.min(room)));
    }

    merge_values(&mut merged);
    trace!(
        "gk_merge {} + {} tuples into {} (weights {} + {})",
        a.len(),
        b.len(),
        merged.len(),
        count_a,
        count_b
    );
    Ok(merged)
}

/// Maximum rank of `level[next]` minus one, or the level size past the end
///
/// `cum` is the minimum rank of `level[next - 1]`.
#[inline]
fn following_rmax<T>(level: &[GkTuple<T>], next: usize, cum: u64, size: u64) -> u64 {
    match level.get(next) {
        Some(t) => (cum + t.g + t.delta).saturating_sub(1),
        None => size,
    }
}

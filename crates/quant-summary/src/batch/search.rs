//! Binary search over rank bands

use super::RankTuple;

/// Locate the tuple whose band contains `rank` in a value-sorted tuple slice
///
/// Bands must be ordered with `tuples[i + 1].lower_rank > tuples[i].upper_rank`.
/// Returns `None` when `rank` is below the first band or above the last one.
/// A rank that falls in the gap between two neighbouring bands of a
/// compressed summary resolves to the nearer band, the lower one on ties.
pub fn rank_binary_search<T>(tuples: &[RankTuple<T>], rank: u64) -> Option<usize> {
    let first = tuples.first()?;
    let last = tuples.last()?;
    if rank < first.lower_rank || rank > last.upper_rank {
        return None;
    }
    if rank <= first.upper_rank {
        return Some(0);
    }

    let mut hi = tuples.len() - 1;
    if rank >= last.lower_rank {
        return Some(hi);
    }

    // tuples[lo].upper_rank < rank < tuples[hi].lower_rank
    let mut lo = 0;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        let band = &tuples[mid];
        if rank < band.lower_rank {
            hi = mid;
        } else if rank > band.upper_rank {
            lo = mid;
        } else {
            return Some(mid);
        }
    }

    let below = rank - tuples[lo].upper_rank;
    let above = tuples[hi].lower_rank - rank;
    Some(if below <= above { lo } else { hi })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands(ranks: &[(u64, u64)]) -> Vec<RankTuple<i32>> {
        ranks.iter()
            .enumerate()
            .map(|(i, &(lo, hi))| RankTuple {
                value: i as i32,
                lower_rank: lo,
                upper_rank: hi,
            })
            .collect()
    }

    #[test]
    fn test_exact_ranks() {
        let tuples = bands(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        for rank in 1..=5 {
            assert_eq!(rank_binary_search(&tuples, rank), Some(rank as usize - 1));
        }
        assert_eq!(rank_binary_search(&tuples, 0), None);
        assert_eq!(rank_binary_search(&tuples, 6), None);
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(rank_binary_search::<i32>(&[], 1), None);

        let tuples = bands(&[(3, 7)]);
        assert_eq!(rank_binary_search(&tuples, 2), None);
        assert_eq!(rank_binary_search(&tuples, 3), Some(0));
        assert_eq!(rank_binary_search(&tuples, 7), Some(0));
        assert_eq!(rank_binary_search(&tuples, 8), None);
    }

    #[test]
    fn test_wide_bands() {
        let tuples = bands(&[(1, 1), (2, 3), (4, 6), (7, 8), (9, 11), (12, 13)]);
        let expected = [0, 1, 1, 2, 2, 2, 3, 3, 4, 4, 4, 5, 5];
        for rank in 1..=13u64 {
            assert_eq!(
                rank_binary_search(&tuples, rank),
                Some(expected[rank as usize - 1]),
                "rank {rank}"
            );
        }
    }

    #[test]
    fn test_gaps_resolve_to_nearer_band() {
        // gaps at 2..=4, 6..=9 and 11
        let tuples = bands(&[(1, 1), (5, 5), (10, 10), (12, 20)]);
        assert_eq!(rank_binary_search(&tuples, 2), Some(0));
        // tie goes to the lower band
        assert_eq!(rank_binary_search(&tuples, 3), Some(0));
        assert_eq!(rank_binary_search(&tuples, 4), Some(1));
        assert_eq!(rank_binary_search(&tuples, 7), Some(1));
        assert_eq!(rank_binary_search(&tuples, 8), Some(2));
        assert_eq!(rank_binary_search(&tuples, 11), Some(2));
        assert_eq!(rank_binary_search(&tuples, 15), Some(3));
    }
}

//! Longest strictly increasing subsequence in O(n log n).

/// Indices of one longest strictly increasing subsequence of `seq`.
///
/// Indices are returned in ascending order. `piles[k]` holds the index of the
/// smallest value that ends an increasing run of length `k + 1`; `prev` links
/// each element to the pile top it extended, which is enough to walk the
/// answer back from the last pile.
#[must_use]
pub fn longest_increasing_subsequence<T: Ord>(seq: &[T]) -> Vec<usize> {
    let mut piles: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, value) in seq.iter().enumerate() {
        let k = piles.partition_point(|&top| seq[top] < *value);
        if k > 0 {
            prev[i] = Some(piles[k - 1]);
        }
        if k == piles.len() {
            piles.push(i);
        } else {
            piles[k] = i;
        }
    }

    let mut out = Vec::with_capacity(piles.len());
    let mut cursor = piles.last().copied();
    while let Some(i) = cursor {
        out.push(i);
        cursor = prev[i];
    }
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(seq: &[u32]) -> Vec<u32> {
        longest_increasing_subsequence(seq)
            .into_iter()
            .map(|i| seq[i])
            .collect()
    }

    #[test]
    fn empty_and_single() {
        assert!(longest_increasing_subsequence::<u32>(&[]).is_empty());
        assert_eq!(longest_increasing_subsequence(&[7]), [0]);
    }

    #[test]
    fn already_increasing_keeps_everything() {
        assert_eq!(longest_increasing_subsequence(&[1, 2, 5, 9]), [0, 1, 2, 3]);
    }

    #[test]
    fn decreasing_keeps_one() {
        assert_eq!(longest_increasing_subsequence(&[4, 3, 2, 1]).len(), 1);
    }

    #[test]
    fn one_out_of_place() {
        assert_eq!(longest_increasing_subsequence(&[0, 3, 1, 2]), [0, 2, 3]);
    }

    #[test]
    fn equal_values_are_not_increasing() {
        assert_eq!(values(&[2, 2, 2]), [2]);
    }

    #[test]
    fn classic_sequence() {
        let seq = [0, 8, 4, 12, 2, 10, 6, 14, 1, 9, 5, 13, 3, 11, 7, 15];
        let lis = values(&seq);
        assert_eq!(lis.len(), 6);
        assert!(lis.windows(2).all(|w| w[0] < w[1]));
    }
}

//! Where links go.

/// Paragraph indices after which links are inserted.
///
/// `k` is capped to `n`, then `step = n / (k + 1)` and the `i`-th point
/// (1-based) is `min(step * i, n - 1)`. The result has `min(k, n)` entries,
/// is non-decreasing and every entry is `< n`. When `step` is 0 all points
/// collapse onto paragraph 0.
pub fn calculate_insertion_points(n: usize, k: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let k = k.min(n);
    let step = n / (k + 1);
    (1..=k).map(|i| (step * i).min(n - 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ten_paragraphs_three_links() {
        assert_eq!(calculate_insertion_points(10, 3), vec![2, 4, 6]);
    }

    #[test]
    fn spreads_evenly() {
        assert_eq!(calculate_insertion_points(12, 5), vec![2, 4, 6, 8, 10]);
        assert_eq!(calculate_insertion_points(5, 1), vec![2]);
    }

    #[test]
    fn degenerate_step_collides() {
        assert_eq!(calculate_insertion_points(3, 3), vec![0, 0, 0]);
        assert_eq!(calculate_insertion_points(2, 9), vec![0, 0]);
        assert_eq!(calculate_insertion_points(1, 1), vec![0]);
    }

    #[test]
    fn nothing_to_place() {
        assert!(calculate_insertion_points(0, 4).is_empty());
        assert!(calculate_insertion_points(7, 0).is_empty());
    }

    proptest! {
        #[test]
        fn points_are_bounded_and_ordered(n in 1usize..500, k in 0usize..600) {
            let points = calculate_insertion_points(n, k);
            prop_assert_eq!(points.len(), k.min(n));
            prop_assert!(points.iter().all(|&p| p < n));
            prop_assert!(points.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

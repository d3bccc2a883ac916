//! Sampling and selection helpers shared by the policy strategies

use rand::{Rng, distr::StandardUniform, prelude::IndexedRandom};

/// Performs weighted random sampling from a collection of items.
///
/// Draws a threshold in `[0, total)` and walks the items, subtracting
/// weights until the threshold falls inside one of them.
///
/// # Returns
///
/// - `Some(item)` if sampling succeeds
/// - `None` if the items slice is empty
///
/// If all weights are zero or negative, falls back to uniform selection.
/// The last item is returned if rounding leaves the threshold unspent.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use bandit_ttt::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];
/// let sampled = weighted_sample(&mut rng, &items);
/// assert!(sampled.is_some());
/// ```
pub fn weighted_sample<R, T, W>(rng: &mut R, items: &[(T, W)]) -> Option<T>
where
    R: Rng + ?Sized,
    T: Clone,
    W: Into<f64> + Copy,
{
    if items.is_empty() {
        return None;
    }

    let total: f64 = items.iter().map(|(_, w)| (*w).into()).sum();

    if !total.is_finite() || total <= 0.0 {
        return items.choose(rng).map(|(item, _)| item.clone());
    }

    let mut threshold = rng.sample::<f64, _>(StandardUniform) * total;

    for (item, weight) in items {
        let w = (*weight).into();
        if threshold < w {
            return Some(item.clone());
        }
        threshold -= w;
    }

    items.last().map(|(item, _)| item.clone())
}

/// Index of the largest score, preferring the earliest on ties.
///
/// `Iterator::max_by` keeps the last maximum, which would bias bandit
/// selection toward high cell indices. NaN scores never win.
///
/// ```
/// use bandit_ttt::utils::argmax_first;
///
/// assert_eq!(argmax_first(&[0.5, 0.7, 0.7]), Some(1));
/// assert_eq!(argmax_first(&[]), None);
/// ```
pub fn argmax_first(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((idx, score)),
        }
    }
    let fallback = (!scores.is_empty()).then_some(0);
    best.map(|(idx, _)| idx).or(fallback)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_weighted_sample_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        let items: Vec<(i32, f64)> = vec![];
        assert_eq!(weighted_sample(&mut rng, &items), None);
    }

    #[test]
    fn test_weighted_sample_single_item() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = vec![("a", 1.0)];
        assert_eq!(weighted_sample(&mut rng, &items), Some("a"));
    }

    #[test]
    fn test_weighted_sample_zero_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = vec![("a", 0.0), ("b", 0.0), ("c", 0.0)];
        assert!(weighted_sample(&mut rng, &items).is_some());
    }

    #[test]
    fn test_weighted_sample_skips_zero_weight_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = vec![(0usize, 0.0), (1, 1.0), (2, 0.0)];
        for _ in 0..200 {
            assert_eq!(weighted_sample(&mut rng, &items), Some(1));
        }
    }

    #[test]
    fn test_weighted_sample_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];

        let mut counts = std::collections::HashMap::new();
        for _ in 0..1000 {
            let sample = weighted_sample(&mut rng, &items).unwrap();
            *counts.entry(sample).or_insert(0) += 1;
        }

        let count_a = counts.get(&"a").copied().unwrap_or(0);
        let count_b = counts.get(&"b").copied().unwrap_or(0);
        let count_c = counts.get(&"c").copied().unwrap_or(0);

        assert!(count_b > count_a, "b should appear more than a");
        assert!(count_b > count_c, "b should appear more than c");
        assert!(count_a > 0 && count_c > 0, "all items should appear");
    }

    #[test]
    fn test_weighted_sample_deterministic() {
        let items = vec![("a", 1.0), ("b", 2.0), ("c", 1.0)];

        let mut rng1 = StdRng::seed_from_u64(12345);
        let mut rng2 = StdRng::seed_from_u64(12345);

        assert_eq!(
            weighted_sample(&mut rng1, &items),
            weighted_sample(&mut rng2, &items)
        );
    }

    #[test]
    fn argmax_prefers_first_of_ties() {
        assert_eq!(argmax_first(&[0.5, 0.5, 0.5]), Some(0));
        assert_eq!(argmax_first(&[0.1, 0.9, 0.3, 0.9]), Some(1));
    }

    #[test]
    fn argmax_ignores_nan() {
        assert_eq!(argmax_first(&[f64::NAN, 0.2, 0.1]), Some(1));
        assert_eq!(argmax_first(&[f64::NAN]), Some(0));
    }
}

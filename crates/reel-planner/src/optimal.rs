//! Exact budgeted selection (0/1 knapsack).
//!
//! # Algorithm
//! 1. Quantize the budget (floor) and each segment duration (round) to ticks
//! 2. Fill `best[t]`, the max score achievable with capacity `t`, item by
//!    item in descending `t` so each row only reads the previous row
//! 3. Record in a take-bitmap whether item `i` improved `best[t]`
//! 4. Walk the bitmap backward from `(n, capacity)` and reverse the result
//!
//! Including an item must strictly beat excluding it, so on ties the earlier
//! items win and results are reproducible.
//!
//! Time is O(n × T) and memory is O(T) for scores plus n × T bits of
//! decisions, T being the capacity in ticks.

use reel_models::{Segment, Selection, SelectionStrategy};
use tracing::debug;

use crate::quantize::{capacity_ticks, weight_ticks, TICKS_PER_SECOND};
use crate::SegmentSelector;

/// Score-maximizing selector under a duration budget.
#[derive(Debug, Clone)]
pub struct OptimalSelector {
    ticks_per_second: u32,
}

impl Default for OptimalSelector {
    fn default() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND,
        }
    }
}

impl OptimalSelector {
    /// Create a selector with the default 100ms granularity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom quantization granularity.
    pub fn with_ticks_per_second(mut self, ticks_per_second: u32) -> Self {
        self.ticks_per_second = ticks_per_second.max(1);
        self
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }
}

impl SegmentSelector for OptimalSelector {
    fn select(&self, segments: &[Segment], target_sec: f64) -> Selection {
        if segments.is_empty() || !target_sec.is_finite() || target_sec <= 0.0 {
            return Selection::empty();
        }

        let weights: Vec<usize> = segments
            .iter()
            .map(|s| weight_ticks(s.duration(), self.ticks_per_second))
            .collect();

        // A budget larger than everything that fits behaves like that combined size.
        let budget = capacity_ticks(target_sec, self.ticks_per_second);
        let fitting_weight = weights
            .iter()
            .filter(|&&w| w <= budget)
            .fold(0usize, |acc, &w| acc.saturating_add(w));
        let capacity = budget.min(fitting_weight).min(usize::MAX - 1);
        let width = capacity + 1;

        let mut best = vec![0.0f64; width];
        let mut take = Bitmap::new(segments.len().saturating_mul(width));

        for (i, (segment, &weight)) in segments.iter().zip(&weights).enumerate() {
            if weight > capacity {
                continue;
            }
            let row = i * width;
            for t in (weight..=capacity).rev() {
                let candidate = best[t - weight] + segment.score;
                if candidate > best[t] {
                    best[t] = candidate;
                    take.set(row + t);
                }
            }
        }

        let mut remaining = capacity;
        let mut chosen = Vec::new();
        for i in (0..segments.len()).rev() {
            if take.get(i * width + remaining) {
                chosen.push(segments[i]);
                remaining -= weights[i];
            }
        }
        chosen.reverse();

        let selection = Selection::from_chosen(chosen);
        debug!(
            segments = segments.len(),
            capacity_ticks = capacity,
            chosen = selection.len(),
            total_duration = selection.total_duration,
            total_score = selection.total_score,
            "Optimal selection complete"
        );
        selection
    }

    fn strategy(&self) -> SelectionStrategy {
        SelectionStrategy::Optimal
    }
}

/// Packed decision table.
struct Bitmap {
    words: Vec<u64>,
}

impl Bitmap {
    fn new(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(64)],
        }
    }

    fn set(&mut self, index: usize) {
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    fn get(&self, index: usize) -> bool {
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantize::quantization_bound;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn windows(shape: &[(f64, f64)]) -> Vec<Segment> {
        let mut start = 0.0;
        shape.iter()
            .map(|&(duration, score)| {
                let seg = Segment::new(start, start + duration, score);
                start += duration;
                seg
            })
            .collect()
    }

    /// Max score over all subsets whose quantized weight fits.
    fn brute_force_best(segments: &[Segment], target_sec: f64) -> f64 {
        let capacity = capacity_ticks(target_sec, TICKS_PER_SECOND);
        let mut best = 0.0f64;
        for mask in 0u32..(1 << segments.len()) {
            let mut weight = 0;
            let mut score = 0.0;
            for (i, seg) in segments.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    weight += weight_ticks(seg.duration(), TICKS_PER_SECOND);
                    score += seg.score;
                }
            }
            if weight <= capacity && score > best {
                best = score;
            }
        }
        best
    }

    #[test]
    fn test_picks_best_pair() {
        let segments = windows(&[(4.0, 10.0), (4.0, 9.0), (4.0, 9.0), (4.0, 1.0)]);
        let selection = OptimalSelector::new().select(&segments, 8.0);

        assert_eq!(selection.chosen, vec![segments[0], segments[1]]);
        assert!((selection.total_score - 19.0).abs() < 1e-9);
        assert!((selection.total_duration - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_prefers_earlier_item() {
        // {0} and {1} tie; the later item must not displace the earlier one.
        let segments = windows(&[(4.0, 5.0), (4.0, 5.0)]);
        let selection = OptimalSelector::new().select(&segments, 4.0);
        assert_eq!(selection.chosen, vec![segments[0]]);
    }

    #[test]
    fn test_zero_score_is_not_taken() {
        let segments = windows(&[(2.0, 0.0), (2.0, 3.0)]);
        let selection = OptimalSelector::new().select(&segments, 10.0);
        assert_eq!(selection.chosen, vec![segments[1]]);
    }

    #[test]
    fn test_empty_input() {
        for target in [0.0, 1.0, 34.0, 600.0] {
            let selection = OptimalSelector::new().select(&[], target);
            assert!(selection.is_empty());
            assert_eq!(selection.total_duration, 0.0);
            assert_eq!(selection.total_score, 0.0);
        }
    }

    #[test]
    fn test_zero_target() {
        let segments = windows(&[(4.0, 10.0), (4.0, 9.0)]);
        let selection = OptimalSelector::new().select(&segments, 0.0);
        assert!(selection.is_empty());
        assert_eq!(selection.total_duration, 0.0);
        assert_eq!(selection.total_score, 0.0);
    }

    #[test]
    fn test_negative_target() {
        let segments = windows(&[(4.0, 10.0)]);
        assert!(OptimalSelector::new().select(&segments, -8.0).is_empty());
        assert!(OptimalSelector::new().select(&segments, f64::NAN).is_empty());
    }

    #[test]
    fn test_segment_longer_than_target() {
        let segments = windows(&[(5.0, 100.0)]);
        let selection = OptimalSelector::new().select(&segments, 4.0);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_large_budget_takes_everything() {
        let segments = windows(&[(4.0, 1.0), (4.0, 2.0), (3.2, 3.0)]);
        let selection = OptimalSelector::new().select(&segments, 600.0);
        assert_eq!(selection.chosen, segments);
    }

    #[test]
    fn test_huge_durations_do_not_shrink_budget() {
        let segments = vec![
            Segment::new(0.0, 1e300, 1.0),
            Segment::new(1e300, 2e300, 1.0),
            Segment::new(10.0, 14.0, 5.0),
        ];
        let selection = OptimalSelector::new().select(&segments, 8.0);

        assert_eq!(selection.chosen, vec![segments[2]]);
        assert_eq!(selection.total_score, 5.0);
        assert!((selection.total_duration - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_budget_with_huge_durations() {
        let segments = vec![Segment::new(0.0, 1e300, 1.0), Segment::new(0.0, 4.0, 2.0)];
        let selection = OptimalSelector::new().select(&segments, 100.0);
        assert_eq!(selection.chosen, vec![segments[1]]);
    }

    #[test]
    fn test_order_preserved() {
        let segments = windows(&[(3.0, 1.0), (2.0, 8.0), (5.0, 2.0), (2.0, 7.0), (1.0, 6.0)]);
        let selection = OptimalSelector::new().select(&segments, 5.0);

        assert_eq!(selection.chosen, vec![segments[1], segments[3], segments[4]]);
        let starts: Vec<f64> = selection.chosen.iter().map(|s| s.start).collect();
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_quantization_may_overrun_within_bound() {
        // Each 4.04s window rounds to 40 ticks, so two fit in an 8.0s budget.
        let segments = windows(&[(4.04, 5.0), (4.04, 5.0)]);
        let selection = OptimalSelector::new().select(&segments, 8.0);

        assert_eq!(selection.len(), 2);
        assert!(selection.total_duration > 8.0);
        assert!(selection.total_duration <= 8.0 + quantization_bound(selection.len()));
    }

    #[test]
    fn test_custom_granularity() {
        let selector = OptimalSelector::new().with_ticks_per_second(1);
        assert_eq!(selector.ticks_per_second(), 1);
        let segments = windows(&[(4.4, 5.0), (4.4, 5.0)]);
        // 4.4s rounds to 4 whole seconds; both fit in 8s.
        assert_eq!(selector.select(&segments, 8.0).len(), 2);
    }

    #[test]
    fn test_matches_brute_force_and_respects_budget() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let selector = OptimalSelector::new();

        for _ in 0..200 {
            let n = rng.random_range(1..=9);
            let shape: Vec<(f64, f64)> = (0..n)
                .map(|_| {
                    let duration = rng.random_range(5..=80) as f64 / 10.0
                        + rng.random_range(-0.04..0.04);
                    let score = rng.random_range(0..=50) as f64;
                    (duration, score)
                })
                .collect();
            let segments = windows(&shape);
            let target = rng.random_range(0..=200) as f64 / 10.0;

            let selection = selector.select(&segments, target);

            let expected = brute_force_best(&segments, target);
            assert!(
                (selection.total_score - expected).abs() < 1e-6,
                "score {} != brute force {} for target {}",
                selection.total_score,
                expected,
                target
            );
            assert!(
                selection.total_duration <= target + quantization_bound(selection.len()) + 1e-9,
                "duration {} exceeds target {}",
                selection.total_duration,
                target
            );

            let mut cursor = 0;
            for chosen in &selection.chosen {
                let pos = segments[cursor..]
                    .iter()
                    .position(|s| s == chosen)
                    .expect("chosen segment comes from the input in order");
                cursor += pos + 1;
            }
        }
    }
}

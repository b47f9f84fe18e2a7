//! Greedy budgeted selection.
//!
//! Sorts by score (highest first), accepts each segment that still fits and
//! stops once the accepted total reaches `stop_ratio` of the budget. Cheaper
//! than [`crate::OptimalSelector`] but not score-optimal: a single long,
//! high-scoring segment can crowd out a better combination of shorter ones.

use reel_models::{Segment, Selection, SelectionStrategy};
use tracing::debug;

use crate::SegmentSelector;

/// Default fraction of the budget after which selection stops.
pub const DEFAULT_STOP_RATIO: f64 = 0.95;

/// Highest-score-first selector.
#[derive(Debug, Clone)]
pub struct GreedySelector {
    stop_ratio: f64,
}

impl Default for GreedySelector {
    fn default() -> Self {
        Self {
            stop_ratio: DEFAULT_STOP_RATIO,
        }
    }
}

impl GreedySelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop once this fraction of the budget is filled (clamped to 0..=1).
    pub fn with_stop_ratio(mut self, stop_ratio: f64) -> Self {
        self.stop_ratio = if stop_ratio.is_finite() {
            stop_ratio.clamp(0.0, 1.0)
        } else {
            DEFAULT_STOP_RATIO
        };
        self
    }
}

impl SegmentSelector for GreedySelector {
    fn select(&self, segments: &[Segment], target_sec: f64) -> Selection {
        if segments.is_empty() || !target_sec.is_finite() || target_sec <= 0.0 {
            return Selection::empty();
        }

        let mut order: Vec<usize> = (0..segments.len()).collect();
        order.sort_by(|&a, &b| segments[b].score.total_cmp(&segments[a].score));

        let mut picked = Vec::new();
        let mut total = 0.0;
        for index in order {
            let duration = segments[index].duration();
            if total + duration <= target_sec {
                picked.push(index);
                total += duration;
            }
            if total >= target_sec * self.stop_ratio {
                break;
            }
        }

        picked.sort_unstable();
        let selection = Selection::from_chosen(picked.into_iter().map(|i| segments[i]).collect());
        debug!(
            segments = segments.len(),
            chosen = selection.len(),
            total_duration = selection.total_duration,
            total_score = selection.total_score,
            "Greedy selection complete"
        );
        selection
    }

    fn strategy(&self) -> SelectionStrategy {
        SelectionStrategy::Greedy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_highest_scores_first() {
        let segments = vec![
            Segment::new(0.0, 4.0, 1.0),
            Segment::new(4.0, 8.0, 9.0),
            Segment::new(8.0, 12.0, 10.0),
        ];
        let selection = GreedySelector::new().select(&segments, 8.0);
        assert_eq!(selection.chosen, vec![segments[1], segments[2]]);
    }

    #[test]
    fn test_stops_near_target() {
        // After 7.8s of 8.0s (>= 95%) no further segment is considered.
        let segments = vec![
            Segment::new(0.0, 7.8, 5.0),
            Segment::new(7.8, 8.0, 1.0),
        ];
        let selection = GreedySelector::new().select(&segments, 8.0);
        assert_eq!(selection.chosen, vec![segments[0]]);
    }

    #[test]
    fn test_skips_segments_that_do_not_fit() {
        let segments = vec![
            Segment::new(0.0, 10.0, 50.0),
            Segment::new(10.0, 13.0, 2.0),
        ];
        let selection = GreedySelector::new().select(&segments, 5.0);
        assert_eq!(selection.chosen, vec![segments[1]]);
    }

    #[test]
    fn test_never_exceeds_budget() {
        let segments: Vec<Segment> = (0..20)
            .map(|i| Segment::new(i as f64 * 3.3, (i + 1) as f64 * 3.3, (i * 7 % 11) as f64))
            .collect();
        let selection = GreedySelector::new().select(&segments, 20.0);
        assert!(selection.total_duration <= 20.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(GreedySelector::new().select(&[], 10.0).is_empty());
        let segments = vec![Segment::new(0.0, 4.0, 1.0)];
        assert!(GreedySelector::new().select(&segments, 0.0).is_empty());
    }
}

//! Budgeted selection of highlight segments.
//!
//! Given scored segments of heterogeneous duration and a duration budget,
//! pick the subset to keep in the highlight reel:
//! - [`OptimalSelector`]: exact 0/1 knapsack over durations quantized to ticks
//! - [`GreedySelector`]: highest score first, stop near the budget
//!
//! Both sit behind [`SegmentSelector`] so callers can swap strategies without
//! touching the pipeline.

pub mod greedy;
pub mod optimal;
pub mod quantize;

pub use greedy::GreedySelector;
pub use optimal::OptimalSelector;
pub use quantize::{quantization_bound, TICKS_PER_SECOND};

use reel_models::{Segment, Selection, SelectionStrategy};

/// Chooses a subset of segments whose total duration fits a budget.
pub trait SegmentSelector: Send + Sync {
    /// Select segments from `segments` for a budget of `target_sec` seconds.
    ///
    /// The returned segments keep their relative input order. A budget of
    /// zero, a negative budget or an empty input yields an empty selection.
    fn select(&self, segments: &[Segment], target_sec: f64) -> Selection;

    /// Strategy implemented by this selector.
    fn strategy(&self) -> SelectionStrategy;
}

/// Create the selector for a strategy with its default settings.
pub fn selector_for(strategy: SelectionStrategy) -> Box<dyn SegmentSelector> {
    match strategy {
        SelectionStrategy::Optimal => Box::new(OptimalSelector::default()),
        SelectionStrategy::Greedy => Box::new(GreedySelector::default()),
    }
}

/// Select segments with the given strategy.
pub fn select(strategy: SelectionStrategy, segments: &[Segment], target_sec: f64) -> Selection {
    selector_for(strategy).select(segments, target_sec)
}

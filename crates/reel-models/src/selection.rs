//! Budgeted selection results and strategies.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// Algorithm used to pick segments under a duration budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Exact 0/1 knapsack over quantized durations.
    #[default]
    Optimal,
    /// Highest score first, stop once the budget is nearly filled.
    Greedy,
}

impl SelectionStrategy {
    /// Stable name used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::Optimal => "optimal",
            SelectionStrategy::Greedy => "greedy",
        }
    }
}

impl std::fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Segments chosen by a selector, in their original relative order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Selection {
    /// Chosen segments (sub-sequence of the input)
    pub chosen: Vec<Segment>,

    /// Sum of the unquantized durations of `chosen`
    pub total_duration: f64,

    /// Sum of the scores of `chosen`
    pub total_score: f64,
}

impl Selection {
    /// An empty selection with zero duration and zero score.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a selection and compute its totals.
    pub fn from_chosen(chosen: Vec<Segment>) -> Self {
        let total_duration = chosen.iter().map(Segment::duration).sum();
        let total_score = chosen.iter().map(|s| s.score).sum();
        Self {
            chosen,
            total_duration,
            total_score,
        }
    }

    /// Number of chosen segments.
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

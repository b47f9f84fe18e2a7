//! Duration quantization for the knapsack table.
//!
//! Durations are real-valued; the DP works on integer ticks of 100ms. The
//! budget is floored and each segment weight is rounded, so each chosen
//! segment can be under-counted by at most half a tick (0.05s).

/// Ticks per second (1 tick = 100ms).
pub const TICKS_PER_SECOND: u32 = 10;

/// Absorbs float noise like `2.3 * 10.0 == 22.999999999999996`.
const TICK_EPSILON: f64 = 1e-9;

/// Budget in ticks: `floor(target_sec * ticks_per_second)`.
pub fn capacity_ticks(target_sec: f64, ticks_per_second: u32) -> usize {
    if !target_sec.is_finite() || target_sec <= 0.0 {
        return 0;
    }
    (target_sec * ticks_per_second as f64 + TICK_EPSILON).floor() as usize
}

/// Segment weight in ticks: `round(duration_sec * ticks_per_second)`.
pub fn weight_ticks(duration_sec: f64, ticks_per_second: u32) -> usize {
    if !duration_sec.is_finite() || duration_sec <= 0.0 {
        return 0;
    }
    (duration_sec * ticks_per_second as f64).round() as usize
}

/// Largest amount, in seconds, by which the unquantized total duration of
/// `chosen_len` segments may exceed the budget at the default granularity.
pub fn quantization_bound(chosen_len: usize) -> f64 {
    0.5 / TICKS_PER_SECOND as f64 * chosen_len as f64
}

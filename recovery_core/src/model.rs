//! Saturating recovery curve for a single biological metric.
//!
//! Each metric follows a Hill-type curve:
//!
//! ```text
//! recovery(d) = max * d^s / (h^s + d^s)
//! ```
//!
//! where `h` is the half-life in days and `s` the steepness. The curve starts
//! at zero, reaches `max / 2` at `d = h` and approaches `max` without ever
//! reaching it.
//!
//! It is evaluated as `max / (1 + (h / d)^s)`, which is the same value but
//! stays finite when `d^s` would overflow.

/// Default curve steepness
pub const DEFAULT_STEEPNESS: f64 = 1.2;

/// Unrounded recovery value after `days` of abstinence
///
/// Negative or NaN `days` yield 0.
pub fn saturating_recovery(days: f64, half_life: f64, max_recovery: f64, steepness: f64) -> f64 {
    if days.is_nan() || days <= 0.0 {
        return 0.0;
    }
    max_recovery / (1.0 + (half_life / days).powf(steepness))
}

/// Recovery value rounded to one decimal place for display
pub fn recover(days: f64, half_life: f64, max_recovery: f64, steepness: f64) -> f64 {
    round_to(
        saturating_recovery(days, half_life, max_recovery, steepness),
        1,
    )
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

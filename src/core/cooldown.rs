//! Countdown helper shared by every timed behavior in the simulation.
//!
//! All cooldowns follow the same pattern: a slot holds the remaining time in
//! milliseconds, possibly unset before first use. Each tick the owner calls
//! [`tick`] with the frame delta and stores the result back. When the
//! remaining time reaches zero the owner performs the associated action and
//! resets the slot to the ability's configured cooldown.

/// Advances a countdown by `dt` milliseconds.
///
/// An unset slot is initialized to `default_ms` before subtracting, so the
/// first observation of a timer behaves as if it had been armed at creation.
/// The function is pure: it never reads wall-clock time, which keeps the
/// simulation deterministic under any tick cadence.
pub fn tick(current: Option<f64>, dt: f64, default_ms: f64) -> f64 {
    current.unwrap_or(default_ms) - dt
}

/// True once a countdown has fully elapsed.
pub fn ready(remaining: f64) -> bool {
    remaining <= 0.0
}

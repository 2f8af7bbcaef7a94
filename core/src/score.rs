use crate::*;

/// Minutes of play that still earn a positive time bonus.
pub const TARGET_MINUTES: u64 = 100;

/// Scores a cleared board from its elapsed time and tier.
///
/// Each started minute under [`TARGET_MINUTES`] costs a point from a base of 100, beyond the target every minute
/// is worth half a point again. The base is scaled by the tier multiplier and rounded half up, all in integer
/// arithmetic so the result is exact.
pub fn score(elapsed_ms: Millis, difficulty: Difficulty) -> u32 {
    let minutes = elapsed_ms / 1000 / 60;

    // base in half points
    let base_halves = if minutes <= TARGET_MINUTES {
        2 * (TARGET_MINUTES - minutes)
    } else {
        minutes - TARGET_MINUTES
    };

    // halves * tenths = twentieths of a point, +10 rounds half up
    let scaled = base_halves.saturating_mul(difficulty.multiplier_tenths());
    u32::try_from(scaled.saturating_add(10) / 20).unwrap_or(u32::MAX)
}

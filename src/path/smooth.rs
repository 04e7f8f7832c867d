//! Smoothing kernel shared by every eased transition.

use crate::foundation::math::clamp01;

/// Quintic smootherstep `6r^5 - 15r^4 + 10r^3` with `r` clamped to `[0, 1]`.
///
/// First and second derivatives vanish at both ends, so chained transitions meet without
/// visible kinks.
#[inline]
pub fn smootherstep(r: f64) -> f64 {
    let r = clamp01(r);
    r * r * r * (r * (r * 6.0 - 15.0) + 10.0)
}

#[cfg(test)]
#[path = "../../tests/unit/path/smooth.rs"]
mod tests;

/// Tolerance used when bisecting a curve parameter against an X coordinate.
pub(crate) const X_TOLERANCE: f64 = 1e-6;

const MAX_BISECTIONS: usize = 100;

#[inline]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub(crate) fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

pub(crate) fn is_finite_all(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Find `t` in `[0, 1]` with `x_of(t) ≈ x`, assuming `x_of` is non-decreasing.
pub(crate) fn param_at_x(x: f64, x_of: impl Fn(f64) -> f64) -> f64 {
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    if x <= x_of(lo) {
        return lo;
    }
    if x >= x_of(hi) {
        return hi;
    }
    for _ in 0..MAX_BISECTIONS {
        let mid = (lo + hi) * 0.5;
        let mid_x = x_of(mid);
        if (mid_x - x).abs() < X_TOLERANCE {
            return mid;
        }
        if mid_x < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) * 0.5
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

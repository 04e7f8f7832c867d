use crate::{
    foundation::core::Outline,
    geometry::backfilter::{BackFilter, BoundarySide},
    path::{Scalable, baseline::Baseline},
};

/// Distance a width query is nudged toward the interior of the current piece.
pub(crate) const WIDTH_NUDGE: f64 = 1e-5;
/// Pieces narrower than this in X are vertical jumps and are not sampled.
const MIN_PIECE_DX: f64 = 1e-5;
const MIN_SAMPLES_PER_PIECE: usize = 2;

/// Rasterize a baseline and a width profile into two boundary sequences.
///
/// Each piece receives a share of `resolution` proportional to its arc length (at least
/// two samples). Boundary points sit at `±width/2` along the piece normal. Degenerate
/// pieces are skipped.
pub fn offset_baseline(baseline: &Baseline, resolution: usize, width: &impl Scalable) -> Outline {
    let total = baseline.arclen();
    if baseline.is_empty() || !total.is_finite() || total <= 0.0 {
        return Outline::default();
    }

    let mut upper = BackFilter::new(BoundarySide::Upper);
    let mut lower = BackFilter::new(BoundarySide::Lower);
    for piece in baseline.pieces() {
        if (piece.end().x - piece.start().x).abs() < MIN_PIECE_DX {
            tracing::trace!(x = piece.start().x, "skipping vertical baseline piece");
            continue;
        }
        let share = (resolution as f64) * (piece.arclen() / total);
        let samples = (share as usize).max(MIN_SAMPLES_PER_PIECE);
        let last = (samples - 1) as f64;
        for i in 0..samples {
            let t = i as f64 / last;
            let Some(normal) = piece.normal(t) else {
                continue;
            };
            let point = piece.eval(t);
            let query_x = if t < 0.5 {
                point.x + WIDTH_NUDGE
            } else {
                point.x - WIDTH_NUDGE
            };
            let half = width.width_at(query_x) * 0.5;
            upper.push(point + normal * half);
            lower.push(point - normal * half);
        }
    }
    Outline::new(upper.into_points(), lower.into_points())
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/offset.rs"]
mod tests;

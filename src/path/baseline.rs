//! X-monotonic baseline curves made of level runs and eased vertical transitions.

use kurbo::{ParamCurve, ParamCurveArclen, ParamCurveDeriv};

use crate::foundation::{
    core::{CubicBez, Line, Point, Vec2},
    math::param_at_x,
};
use crate::path::events::ResolvedShift;

const ARCLEN_ACCURACY: f64 = 1e-3;
const MIN_TANGENT: f64 = 1e-9;

/// One piece of a baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BaselinePiece {
    /// Level (or degenerate vertical) run.
    Straight(Line),
    /// Cubic transition whose controls sit at the horizontal midpoint, so it enters and
    /// leaves with zero slope.
    Transition(CubicBez),
}

impl BaselinePiece {
    fn transition(start: Point, end: Point) -> Self {
        let mid_x = (start.x + end.x) * 0.5;
        Self::Transition(CubicBez::new(
            start,
            Point::new(mid_x, start.y),
            Point::new(mid_x, end.y),
            end,
        ))
    }

    /// Point at local parameter `t`.
    pub fn eval(&self, t: f64) -> Point {
        match self {
            Self::Straight(l) => l.eval(t),
            Self::Transition(c) => c.eval(t),
        }
    }

    /// First point of the piece.
    pub fn start(&self) -> Point {
        match self {
            Self::Straight(l) => l.p0,
            Self::Transition(c) => c.p0,
        }
    }

    /// Last point of the piece.
    pub fn end(&self) -> Point {
        match self {
            Self::Straight(l) => l.p1,
            Self::Transition(c) => c.p3,
        }
    }

    /// Unnormalized derivative at `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        match self {
            Self::Straight(l) => l.p1 - l.p0,
            Self::Transition(c) => c.deriv().eval(t).to_vec2(),
        }
    }

    /// Unit normal at `t`, pointing to the left of the direction of travel in a Y-down
    /// frame (up for a rightward run). `None` where the tangent vanishes.
    pub fn normal(&self, t: f64) -> Option<Vec2> {
        let d = self.tangent(t);
        let len = d.hypot();
        if !len.is_finite() || len < MIN_TANGENT {
            return None;
        }
        Some(Vec2::new(d.y / len, -d.x / len))
    }

    /// Arc length of the piece.
    pub fn arclen(&self) -> f64 {
        match self {
            Self::Straight(l) => l.length(),
            Self::Transition(c) => c.arclen(ARCLEN_ACCURACY),
        }
    }

    fn x_span(&self) -> (f64, f64) {
        (self.start().x, self.end().x)
    }
}

/// A continuous curve from a start point to `end_x`, built from shift events.
#[derive(Clone, Debug, Default)]
pub struct Baseline {
    pieces: Vec<BaselinePiece>,
    // Cumulative arc length at the end of each piece.
    cumulative: Vec<f64>,
}

impl Baseline {
    /// Build the curve for `start`, the given shifts and a right edge at `end_x`.
    ///
    /// Shifts are walked in `from_x` order. Each emits a level run up to its `from_x`
    /// (skipped when coincident) followed by a transition to `(to_x, to_y)`. A final level
    /// run reaches `end_x`. Shifts that start behind the current point are clipped so the
    /// curve stays X-monotonic.
    pub fn build(start: Point, shifts: &[ResolvedShift], end_x: f64) -> Self {
        let mut ordered = shifts.to_vec();
        ordered.sort_by(|a, b| a.from_x.total_cmp(&b.from_x));

        let mut pieces = Vec::with_capacity(ordered.len() * 2 + 1);
        let mut last = start;
        for shift in ordered {
            if shift.to_x <= last.x {
                continue;
            }
            let shift_start = Point::new(shift.from_x.max(last.x), last.y);
            if shift_start != last {
                pieces.push(BaselinePiece::Straight(Line::new(last, shift_start)));
            }
            let shift_end = Point::new(shift.to_x, shift.to_y);
            if shift_end != shift_start {
                pieces.push(BaselinePiece::transition(shift_start, shift_end));
            }
            last = shift_end;
        }
        if end_x > last.x {
            pieces.push(BaselinePiece::Straight(Line::new(
                last,
                Point::new(end_x, last.y),
            )));
        }

        let mut cumulative = Vec::with_capacity(pieces.len());
        let mut acc = 0.0;
        for piece in &pieces {
            acc += piece.arclen();
            cumulative.push(acc);
        }
        Self { pieces, cumulative }
    }

    /// Pieces in drawing order.
    pub fn pieces(&self) -> &[BaselinePiece] {
        &self.pieces
    }

    /// `true` when the curve has no extent.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Total arc length.
    pub fn arclen(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point and normal at global parameter `t` in `[0, 1]`, distributed by arc length.
    pub fn eval_with_normal(&self, t: f64) -> Option<(Point, Vec2)> {
        let (piece, local_t) = self.locate(t)?;
        Some((piece.eval(local_t), piece.normal(local_t)?))
    }

    fn locate(&self, t: f64) -> Option<(&BaselinePiece, f64)> {
        let total = self.arclen();
        if self.pieces.is_empty() {
            return None;
        }
        if total <= 0.0 || !total.is_finite() {
            return self.pieces.first().map(|p| (p, 0.0));
        }
        let s = t.clamp(0.0, 1.0) * total;
        let idx = self
            .cumulative
            .partition_point(|&c| c < s)
            .min(self.pieces.len() - 1);
        let piece_start = if idx == 0 { 0.0 } else { self.cumulative[idx - 1] };
        let piece_len = self.cumulative[idx] - piece_start;
        let local_t = if piece_len > 0.0 {
            ((s - piece_start) / piece_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some((&self.pieces[idx], local_t))
    }

    /// Point and normal where the curve crosses `x`, clamped to the curve's X extent.
    ///
    /// The containing piece is found by binary search over piece X spans; the local
    /// parameter by bisection. The curve is X-monotonic, so the returned point carries the
    /// (clamped) query X exactly rather than the bisection's approximation.
    pub fn at_x(&self, x: f64) -> Option<(Point, Vec2)> {
        let last = self.pieces.len().checked_sub(1)?;
        let snapped_x = x.clamp(self.pieces[0].start().x, self.pieces[last].end().x);
        let idx = self
            .pieces
            .partition_point(|p| p.x_span().1 < x)
            .min(last);
        // A vertical piece has no usable normal; fall through to its neighbour.
        let candidates = [idx, idx.saturating_sub(1), (idx + 1).min(last)];
        for i in candidates {
            let piece = &self.pieces[i];
            let t = param_at_x(x, |t| piece.eval(t).x);
            if let Some(normal) = piece.normal(t) {
                let mut point = piece.eval(t);
                point.x = snapped_x;
                return Some((point, normal));
            }
        }
        None
    }

    /// Y coordinate of the curve at `x`.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        self.at_x(x).map(|(p, _)| p.y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/baseline.rs"]
mod tests;

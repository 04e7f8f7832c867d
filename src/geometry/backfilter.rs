//! Monotonic-X projection of an offset boundary.
//!
//! When a tight bend meets a wide band, the inner offset curve loops back on itself.
//! Samples that move backward in X are suppressed; once forward motion resumes, the new
//! sample is compared against the boundary already emitted at the same X. While it lies
//! inside the band it is dropped too. As soon as it lies on the outer side, the stale tail
//! of the loop (emitted points past the new X) is spliced out and appending resumes.

use crate::foundation::{core::Point, math::lerp};

/// Which side of the band a boundary sits on, in a Y-down frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundarySide {
    /// Outward is toward smaller Y.
    Upper,
    /// Outward is toward larger Y.
    Lower,
}

impl BoundarySide {
    const TOLERANCE: f64 = 1e-9;

    fn is_outside(self, y: f64, boundary_y: f64) -> bool {
        match self {
            Self::Upper => y <= boundary_y + Self::TOLERANCE,
            Self::Lower => y >= boundary_y - Self::TOLERANCE,
        }
    }
}

/// Stack of emitted boundary points with non-decreasing X.
#[derive(Clone, Debug)]
pub struct BackFilter {
    side: BoundarySide,
    points: Vec<Point>,
    prev_x: Option<f64>,
}

impl BackFilter {
    /// Empty boundary for `side`.
    pub fn new(side: BoundarySide) -> Self {
        Self {
            side,
            points: Vec::new(),
            prev_x: None,
        }
    }

    /// Feed the next raw sample.
    pub fn push(&mut self, p: Point) {
        let prev_x = self.prev_x.replace(p.x);
        let Some(front) = self.points.last() else {
            self.points.push(p);
            return;
        };
        if p.x >= front.x {
            self.points.push(p);
            return;
        }
        // Behind the emitted front: retreating, or advancing again inside the loop.
        let advancing = prev_x.is_some_and(|px| p.x > px);
        if !advancing {
            return;
        }
        let Some(boundary_y) = self.y_at(p.x) else {
            return;
        };
        if self.side.is_outside(p.y, boundary_y) {
            while self.points.last().is_some_and(|q| q.x > p.x) {
                self.points.pop();
            }
            self.points.push(p);
        }
    }

    /// Emitted boundary interpolated at `x`, when `x` lies within its extent.
    fn y_at(&self, x: f64) -> Option<f64> {
        let idx = self.points.partition_point(|q| q.x <= x);
        if idx == 0 || idx >= self.points.len() {
            return None;
        }
        let (a, b) = (self.points[idx - 1], self.points[idx]);
        let dx = b.x - a.x;
        if dx <= 0.0 {
            return Some(a.y);
        }
        Some(lerp(a.y, b.y, (x - a.x) / dx))
    }

    /// Consume the filter and return its points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/backfilter.rs"]
mod tests;

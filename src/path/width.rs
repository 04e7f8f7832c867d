//! Piecewise width profiles eased with [`smootherstep`].

use crate::foundation::math::lerp;
use crate::path::{Scalable, events::ScaleEvent, smooth::smootherstep};

/// Borrowed view of a start width, its scale events and an optional end.
#[derive(Clone, Copy, Debug)]
pub struct WidthProfile<'a> {
    start_w: f64,
    events: &'a [ScaleEvent],
    end_x: Option<f64>,
}

impl<'a> WidthProfile<'a> {
    /// `events` must be sorted by `from_x`.
    pub fn new(start_w: f64, events: &'a [ScaleEvent], end_x: Option<f64>) -> Self {
        Self {
            start_w,
            events,
            end_x,
        }
    }
}

impl Scalable for WidthProfile<'_> {
    fn width_at(&self, x: f64) -> f64 {
        if let Some(end_x) = self.end_x
            && x > end_x
        {
            return 0.0;
        }
        let mut last_w = self.start_w;
        for event in self.events {
            if x <= event.from_x {
                return last_w;
            }
            if x < event.to_x {
                let r = (x - event.from_x) / (event.to_x - event.from_x);
                return lerp(last_w, event.to_w, smootherstep(r));
            }
            last_w = event.to_w;
        }
        last_w
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/width.rs"]
mod tests;

//! Event records driving baselines, width profiles and bundle membership.

use crate::foundation::{
    core::{BundleId, LineageId},
    error::{LineageError, LineageResult},
    math::is_finite_all,
};

/// Where a shift lands vertically.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ShiftTarget {
    /// A concrete Y coordinate.
    Fixed(f64),
    /// Another lineage's position at the shift's `to_x`, plus `offset`.
    ///
    /// Resolved lazily while the owning lineage compiles.
    Lineage {
        /// Lineage whose position is quoted.
        lineage: LineageId,
        /// Vertical offset added to the quoted position.
        offset: f64,
    },
}

impl ShiftTarget {
    pub(crate) fn validate(&self) -> LineageResult<()> {
        let v = match *self {
            Self::Fixed(y) => y,
            Self::Lineage { offset, .. } => offset,
        };
        if !v.is_finite() {
            return Err(LineageError::validation("shift target must be finite"));
        }
        Ok(())
    }
}

/// Move the baseline to a new Y over `[from_x, to_x]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShiftEvent {
    /// Transition start.
    pub from_x: f64,
    /// Transition end; always greater than `from_x`.
    pub to_x: f64,
    /// Landing position.
    pub target: ShiftTarget,
}

impl ShiftEvent {
    /// Shift to a concrete Y.
    pub fn fixed(from_x: f64, to_x: f64, to_y: f64) -> Self {
        Self {
            from_x,
            to_x,
            target: ShiftTarget::Fixed(to_y),
        }
    }

    /// Shift to another lineage's position plus `offset`.
    pub fn to_lineage(from_x: f64, to_x: f64, lineage: LineageId, offset: f64) -> Self {
        Self {
            from_x,
            to_x,
            target: ShiftTarget::Lineage { lineage, offset },
        }
    }

    /// Concrete form when the target is static.
    pub fn resolved(&self) -> Option<ResolvedShift> {
        match self.target {
            ShiftTarget::Fixed(to_y) => Some(ResolvedShift::new(self.from_x, self.to_x, to_y)),
            ShiftTarget::Lineage { .. } => None,
        }
    }
}

/// A shift whose landing Y is known.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedShift {
    /// Transition start.
    pub from_x: f64,
    /// Transition end.
    pub to_x: f64,
    /// Landing Y.
    pub to_y: f64,
}

impl ResolvedShift {
    /// Create a resolved shift.
    pub fn new(from_x: f64, to_x: f64, to_y: f64) -> Self {
        Self { from_x, to_x, to_y }
    }
}

/// Change the band width to `to_w` over `[from_x, to_x]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleEvent {
    /// Transition start.
    pub from_x: f64,
    /// Transition end.
    pub to_x: f64,
    /// Width reached at `to_x`; never negative.
    pub to_w: f64,
}

impl ScaleEvent {
    /// Create a scale event.
    pub fn new(from_x: f64, to_x: f64, to_w: f64) -> Self {
        Self { from_x, to_x, to_w }
    }
}

/// Direction of a bundle membership transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MembershipKind {
    /// Enter a bundle.
    Join,
    /// Exit a bundle.
    Leave,
}

/// Entry into or exit from a bundle over `[from_x, to_x]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MembershipEvent {
    /// Transition start.
    pub from_x: f64,
    /// Transition end.
    pub to_x: f64,
    /// Join or leave.
    pub kind: MembershipKind,
    /// Bundle entered or exited.
    pub bundle: BundleId,
    /// Landing position after a leave; `None` for joins.
    pub target: Option<ShiftTarget>,
}

/// Anything occupying an X interval.
pub(crate) trait Span {
    fn from_x(&self) -> f64;
    fn to_x(&self) -> f64;
}

macro_rules! impl_span {
    ($($ty:ty),*) => {
        $(impl Span for $ty {
            fn from_x(&self) -> f64 {
                self.from_x
            }

            fn to_x(&self) -> f64 {
                self.to_x
            }
        })*
    };
}

impl_span!(ShiftEvent, ResolvedShift, ScaleEvent, MembershipEvent);

/// Events kept sorted by `from_x` on insertion, with non-overlapping intervals.
#[derive(Clone, Debug)]
pub struct EventList<E> {
    events: Vec<E>,
}

impl<E> Default for EventList<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventList<E> {
    /// Events in ascending `from_x` order.
    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    /// Iterate events in ascending `from_x` order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.events.iter()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` when no event was registered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E: Span> EventList<E> {
    /// Insert `event`, rejecting degenerate or overlapping intervals.
    ///
    /// Intervals may touch (`prev.to_x == next.from_x`) but not overlap.
    pub(crate) fn insert(&mut self, event: E, what: &str) -> LineageResult<()> {
        validate_span(event.from_x(), event.to_x(), what)?;
        let idx = self
            .events
            .partition_point(|e| e.from_x() <= event.from_x());
        if let Some(prev) = idx.checked_sub(1).and_then(|i| self.events.get(i))
            && prev.to_x() > event.from_x()
        {
            return Err(LineageError::validation(format!(
                "{what} [{}, {}] overlaps [{}, {}]",
                event.from_x(),
                event.to_x(),
                prev.from_x(),
                prev.to_x()
            )));
        }
        if let Some(next) = self.events.get(idx)
            && event.to_x() > next.from_x()
        {
            return Err(LineageError::validation(format!(
                "{what} [{}, {}] overlaps [{}, {}]",
                event.from_x(),
                event.to_x(),
                next.from_x(),
                next.to_x()
            )));
        }
        self.events.insert(idx, event);
        Ok(())
    }

    /// Events lying entirely inside `[from_x, to_x]`.
    pub(crate) fn within(&self, from_x: f64, to_x: f64) -> impl Iterator<Item = &E> {
        self.events
            .iter()
            .filter(move |e| e.from_x() >= from_x && e.to_x() <= to_x)
    }
}

pub(crate) fn validate_span(from_x: f64, to_x: f64, what: &str) -> LineageResult<()> {
    if !is_finite_all(&[from_x, to_x]) {
        return Err(LineageError::validation(format!(
            "{what} range must be finite"
        )));
    }
    if from_x >= to_x {
        return Err(LineageError::validation(format!(
            "{what} requires from_x < to_x (got {from_x} >= {to_x})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/path/events.rs"]
mod tests;

use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::{LineageId, Outline, Point},
        error::{LineageError, LineageResult},
        math::is_finite_all,
    },
    path::{
        Shiftable,
        baseline::Baseline,
        events::{EventList, ResolvedShift, ShiftEvent},
        smooth::smootherstep,
    },
};

/// One member's stay inside a bundle.
///
/// `end_x` and `fade_out` are back-patched when the member leaves; an open membership
/// runs to `f64::INFINITY`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BundleMembership {
    /// Member lineage.
    pub lineage: LineageId,
    /// X where the member starts fading in.
    pub start_x: f64,
    /// X where the member has fully faded out.
    pub end_x: f64,
    /// Fade-in distance from `start_x`.
    pub fade_in: f64,
    /// Fade-out distance up to `end_x`.
    pub fade_out: f64,
}

impl BundleMembership {
    /// Open membership starting at `start_x`.
    pub fn open(lineage: LineageId, start_x: f64, fade_in: f64) -> Self {
        Self {
            lineage,
            start_x,
            end_x: f64::INFINITY,
            fade_in,
            fade_out: 0.0,
        }
    }

    /// `true` when `x` lies in `[start_x, end_x]`.
    pub fn contains(&self, x: f64) -> bool {
        self.start_x <= x && x <= self.end_x
    }

    /// Presence factor in `[0, 1]`: eased up over the fade-in, down over the fade-out.
    pub fn presence_at(&self, x: f64) -> f64 {
        if !self.contains(x) {
            return 0.0;
        }
        let mut factor = 1.0f64;
        if self.fade_in > 0.0 && x < self.start_x + self.fade_in {
            factor = smootherstep((x - self.start_x) / self.fade_in);
        }
        if self.fade_out > 0.0 && x > self.end_x - self.fade_out {
            factor = factor.min(smootherstep((self.end_x - x) / self.fade_out));
        }
        factor
    }
}

/// A shared lane stacking member lineages around a common baseline.
#[derive(Clone, Debug)]
pub struct Bundle {
    pub(crate) start_x: f64,
    pub(crate) start_y: f64,
    pub(crate) margin: f64,
    pub(crate) end_x: f64,
    pub(crate) shifts: EventList<ShiftEvent>,
    pub(crate) memberships: Vec<BundleMembership>,
    pub(crate) solved: Option<SolvedBundle>,
}

/// Per-member boundary points written by the solve pass.
#[derive(Clone, Debug, Default)]
pub struct SolvedBundle {
    pub(crate) members: BTreeMap<LineageId, Outline>,
}

impl SolvedBundle {
    /// Cached outline of `lineage`, if it was ever stacked.
    pub fn member(&self, lineage: LineageId) -> Option<&Outline> {
        self.members.get(&lineage)
    }
}

impl Bundle {
    pub(crate) fn new(start: Point, margin: f64, end_x: f64) -> LineageResult<Self> {
        if !is_finite_all(&[start.x, start.y, margin]) {
            return Err(LineageError::validation("bundle start/margin must be finite"));
        }
        if margin < 0.0 {
            return Err(LineageError::validation("bundle margin must be >= 0"));
        }
        Ok(Self {
            start_x: start.x,
            start_y: start.y,
            margin,
            end_x,
            shifts: EventList::default(),
            memberships: Vec::new(),
            solved: None,
        })
    }

    /// Shift the bundle baseline to `to_y` over `[from_x, to_x]`.
    pub fn shift_to(&mut self, from_x: f64, to_x: f64, to_y: f64) -> LineageResult<()> {
        if !to_y.is_finite() {
            return Err(LineageError::validation("bundle shift to_y must be finite"));
        }
        self.shifts
            .insert(ShiftEvent::fixed(from_x, to_x, to_y), "bundle shift")?;
        self.solved = None;
        Ok(())
    }

    pub(crate) fn add_member(&mut self, membership: BundleMembership) {
        self.memberships.push(membership);
        self.solved = None;
    }

    /// Close the open membership of `lineage` covering `from_x`.
    pub(crate) fn close_member(
        &mut self,
        lineage: LineageId,
        from_x: f64,
        to_x: f64,
    ) -> LineageResult<()> {
        let membership = self
            .memberships
            .iter_mut()
            .find(|m| m.lineage == lineage && m.start_x <= from_x && from_x <= m.end_x)
            .ok_or_else(|| {
                LineageError::validation(format!(
                    "{lineage} is not a member of the bundle at x={from_x}"
                ))
            })?;
        membership.end_x = to_x;
        membership.fade_out = to_x - from_x;
        self.solved = None;
        Ok(())
    }

    /// Clip memberships of `lineage` that outlive `x`.
    pub(crate) fn truncate_member(&mut self, lineage: LineageId, x: f64) {
        for m in self.memberships.iter_mut().filter(|m| m.lineage == lineage) {
            if m.end_x > x {
                m.end_x = x.max(m.start_x);
                m.fade_out = m.fade_out.min(m.end_x - m.start_x);
            }
        }
        self.solved = None;
    }

    /// Start point of the bundle baseline.
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    /// Spacing between fully present neighbours.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Right edge of the bundle.
    pub fn end_x(&self) -> f64 {
        self.end_x
    }

    /// Registered memberships, in registration order.
    pub fn memberships(&self) -> &[BundleMembership] {
        &self.memberships
    }

    /// Memberships covering `x`, in registration order.
    pub fn memberships_at(&self, x: f64) -> impl Iterator<Item = &BundleMembership> {
        self.memberships.iter().filter(move |m| m.contains(x))
    }

    /// `true` when `lineage` has a membership covering `x`.
    pub fn has_member_at(&self, lineage: LineageId, x: f64) -> bool {
        self.memberships_at(x).any(|m| m.lineage == lineage)
    }

    /// Solve-pass output, once the bundle was solved.
    pub fn solved(&self) -> Option<&SolvedBundle> {
        self.solved.as_ref()
    }
}

impl Shiftable for Bundle {
    fn baseline(&self) -> Baseline {
        let shifts: Vec<ResolvedShift> = self
            .shifts
            .iter()
            .filter_map(ShiftEvent::resolved)
            .collect();
        Baseline::build(self.start(), &shifts, self.end_x)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bundle/model.rs"]
mod tests;

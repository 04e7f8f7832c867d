use std::collections::BTreeMap;

use crate::{
    bundle::model::{Bundle, SolvedBundle},
    foundation::{
        core::{LineageId, Outline, Point},
        error::{LineageError, LineageResult},
        math::X_TOLERANCE,
    },
    geometry::backfilter::{BackFilter, BoundarySide},
    lineage::model::Lineage,
    path::{Scalable, Shiftable},
};


/// A member's slot across the lane, as signed offsets along the baseline normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberSlot {
    /// Member lineage.
    pub lineage: LineageId,
    /// Offset of the member's lower boundary.
    pub lower: f64,
    /// Offset of the member's upper boundary.
    pub upper: f64,
    /// Presence factor used for the effective width.
    pub presence: f64,
}

impl MemberSlot {
    /// Effective (presence-scaled) width.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Offset of the slot's center.
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) * 0.5
    }
}

/// Input to the stacking layout for one member.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StackEntry {
    pub(crate) lineage: LineageId,
    pub(crate) raw_width: f64,
    pub(crate) presence: f64,
}

/// Stack members symmetrically around zero, in the given order.
///
/// Each member occupies `raw_width * presence`. The gap between neighbours is
/// `0.5 * margin * (presence_i + presence_{i+1})`. The averaging assumes a phantom fully
/// present neighbour past each open end, so the excess `0.5 * margin * (1 - presence)`
/// of each boundary member is taken back from the nearest gaps.
pub(crate) fn stack(margin: f64, entries: &[StackEntry]) -> Vec<MemberSlot> {
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return Vec::new();
    };
    let widths: Vec<f64> = entries
        .iter()
        .map(|e| (e.raw_width * e.presence).max(0.0))
        .collect();
    let mut gaps: Vec<f64> = entries
        .windows(2)
        .map(|pair| 0.5 * margin * (pair[0].presence + pair[1].presence))
        .collect();
    absorb_excess(gaps.iter_mut(), 0.5 * margin * (1.0 - first.presence));
    absorb_excess(gaps.iter_mut().rev(), 0.5 * margin * (1.0 - last.presence));

    let total = widths.iter().sum::<f64>() + gaps.iter().sum::<f64>();
    let mut offset = -total * 0.5;
    let mut slots = Vec::with_capacity(entries.len());
    for (idx, (entry, width)) in entries.iter().zip(&widths).enumerate() {
        slots.push(MemberSlot {
            lineage: entry.lineage,
            lower: offset,
            upper: offset + width,
            presence: entry.presence,
        });
        offset += width + gaps.get(idx).copied().unwrap_or(0.0);
    }
    slots
}

fn absorb_excess<'a>(gaps: impl Iterator<Item = &'a mut f64>, mut excess: f64) {
    for gap in gaps {
        if excess <= 0.0 {
            break;
        }
        let taken = gap.min(excess);
        *gap -= taken;
        excess -= taken;
    }
}

fn width_of(lineages: &[Lineage], id: LineageId, x: f64) -> f64 {
    lineages.get(id.0).map_or(0.0, |l| l.width_at(x))
}

impl Bundle {
    /// Slots of every member present at `x`, in registration order.
    pub fn stack_at(&self, x: f64, lineages: &[Lineage]) -> Vec<MemberSlot> {
        let entries: Vec<StackEntry> = self
            .memberships_at(x)
            .map(|m| StackEntry {
                lineage: m.lineage,
                raw_width: width_of(lineages, m.lineage, x),
                presence: m.presence_at(x),
            })
            .collect();
        stack(self.margin, &entries)
    }

    /// Sample the baseline at `resolution` parameters and record every member's boundary
    /// points.
    #[tracing::instrument(skip_all, fields(members = self.memberships.len()))]
    pub(crate) fn solve(&self, lineages: &[Lineage], resolution: usize) -> SolvedBundle {
        let mut filters: BTreeMap<LineageId, (BackFilter, BackFilter)> = self
            .memberships
            .iter()
            .map(|m| {
                (
                    m.lineage,
                    (
                        BackFilter::new(BoundarySide::Upper),
                        BackFilter::new(BoundarySide::Lower),
                    ),
                )
            })
            .collect();

        let baseline = self.baseline();
        let samples = resolution.max(2);
        let last = (samples - 1) as f64;
        for i in 0..samples {
            let Some((point, normal)) = baseline.eval_with_normal(i as f64 / last) else {
                continue;
            };
            for slot in self.stack_at(point.x, lineages) {
                if let Some((upper, lower)) = filters.get_mut(&slot.lineage) {
                    upper.push(point + normal * slot.upper);
                    lower.push(point + normal * slot.lower);
                }
            }
        }

        let members = filters
            .into_iter()
            .map(|(id, (upper, lower))| (id, Outline::new(upper.into_points(), lower.into_points())))
            .collect();
        tracing::trace!("bundle solved");
        SolvedBundle { members }
    }

    /// Boundary points of `lineage` evaluated directly at `x`.
    ///
    /// Both points are placed at exactly `x` so they can close a segment that the next
    /// one continues from the same X.
    pub fn member_edges_at(
        &self,
        x: f64,
        lineage: LineageId,
        lineages: &[Lineage],
    ) -> Option<(Point, Point)> {
        let (point, normal) = self.baseline().at_x(x)?;
        let slot = self
            .stack_at(x, lineages)
            .into_iter()
            .find(|s| s.lineage == lineage)?;
        let upper = point + normal * slot.upper;
        let lower = point + normal * slot.lower;
        Some((Point::new(x, upper.y), Point::new(x, lower.y)))
    }

    /// Cached boundary points of `lineage` within `[start_x, end_x]`.
    ///
    /// Missing boundary points at either end are evaluated directly, so consecutive
    /// segments meet without a gap.
    pub fn member_points(
        &self,
        lineage: LineageId,
        start_x: f64,
        end_x: f64,
        lineages: &[Lineage],
    ) -> LineageResult<Outline> {
        let solved = self
            .solved
            .as_ref()
            .ok_or_else(|| LineageError::lookup("bundle has not been solved"))?;
        let cached = solved.member(lineage).ok_or_else(|| {
            LineageError::lookup(format!("no precomputed points for {lineage} in bundle"))
        })?;

        let in_range = |p: &&Point| start_x <= p.x && p.x <= end_x;
        let mut upper: Vec<Point> = cached.upper.iter().filter(in_range).copied().collect();
        let mut lower: Vec<Point> = cached.lower.iter().filter(in_range).copied().collect();

        if (!starts_at(&upper, start_x) || !starts_at(&lower, start_x))
            && let Some((u, l)) = self.member_edges_at(start_x, lineage, lineages)
        {
            prepend_edge(&mut upper, u, start_x);
            prepend_edge(&mut lower, l, start_x);
        }
        if (!ends_at(&upper, end_x) || !ends_at(&lower, end_x))
            && let Some((u, l)) = self.member_edges_at(end_x, lineage, lineages)
        {
            append_edge(&mut upper, u, end_x);
            append_edge(&mut lower, l, end_x);
        }
        Ok(Outline::new(upper, lower))
    }

    /// Center of `lineage`'s slot at `x`, evaluated on demand.
    pub fn center_of_member(
        &self,
        x: f64,
        lineage: LineageId,
        lineages: &[Lineage],
    ) -> LineageResult<Point> {
        let (point, normal) = self
            .baseline()
            .at_x(x)
            .ok_or_else(|| LineageError::lookup(format!("bundle baseline is empty at x={x}")))?;
        let slot = self
            .stack_at(x, lineages)
            .into_iter()
            .find(|s| s.lineage == lineage)
            .ok_or_else(|| {
                LineageError::lookup(format!("{lineage} not found in bundle at x={x}"))
            })?;
        Ok(point + normal * slot.center())
    }

    /// Point on the bundle centerline at `x`.
    pub fn centerline_at(&self, x: f64) -> Point {
        self.baseline()
            .at_x(x)
            .map_or_else(|| self.start(), |(p, _)| p)
    }

    /// [`Bundle::center_of_member`], falling back to the centerline on lookup failure.
    pub(crate) fn center_of_member_or_centerline(
        &self,
        x: f64,
        lineage: LineageId,
        lineages: &[Lineage],
    ) -> Point {
        match self.center_of_member(x, lineage, lineages) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(%err, x, "falling back to bundle centerline");
                self.centerline_at(x)
            }
        }
    }
}

fn starts_at(points: &[Point], x: f64) -> bool {
    points
        .first()
        .is_some_and(|p| (p.x - x).abs() <= X_TOLERANCE)
}

fn ends_at(points: &[Point], x: f64) -> bool {
    points
        .last()
        .is_some_and(|p| (p.x - x).abs() <= X_TOLERANCE)
}

fn prepend_edge(points: &mut Vec<Point>, edge: Point, x: f64) {
    if starts_at(points, x) {
        return;
    }
    if points.first().is_none_or(|first| edge.x <= first.x) {
        points.insert(0, edge);
    }
}

fn append_edge(points: &mut Vec<Point>, edge: Point, x: f64) {
    if ends_at(points, x) {
        return;
    }
    if points.last().is_none_or(|last| edge.x >= last.x) {
        points.push(edge);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bundle/solver.rs"]
mod tests;

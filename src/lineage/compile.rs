//! Per-lineage state machine turning membership events into alternating segments.

use crate::{
    foundation::{
        core::{BundleId, LineageId, Point},
        error::{LineageError, LineageResult},
    },
    lineage::{
        model::Lineage,
        segment::{DependentSegment, IndependentSegment, Segment, SegmentSources},
    },
    path::{
        baseline::Baseline,
        events::{MembershipKind, ResolvedShift, ShiftTarget},
    },
};

/// Longest chain of lineage-to-lineage position references followed before giving up.
const MAX_TARGET_DEPTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Track {
    Independent,
    Dependent(BundleId),
}

impl Lineage {
    /// Walk membership events in X order and emit the segment sequence.
    ///
    /// While independent, shifts inside the current span are collected; a join adds a
    /// synthetic shift landing on the member's slot center at the join's `to_x`. While
    /// dependent, a leave closes the bundle run at its `from_x`; the next independent run
    /// starts from the slot center there and opens with the leave transition.
    #[tracing::instrument(skip(self, sources), fields(color = %self.color))]
    pub(crate) fn compile_segments(
        &self,
        id: LineageId,
        sources: SegmentSources<'_>,
    ) -> Vec<Segment> {
        let end = self
            .end_x
            .map_or(sources.view_width, |e| e.min(sources.view_width));
        let events = self.memberships.as_slice();
        let mut segments = Vec::with_capacity(events.len() + 1);
        let mut track = self
            .initial_bundle
            .map_or(Track::Independent, Track::Dependent);
        // Start of the segment being built.
        let mut seg_start = self.start();
        // User shifts are collected from here; earlier X is covered by `carried`.
        let mut span_x = seg_start.x;
        let mut last_y = seg_start.y;
        let mut carried: Vec<ResolvedShift> = Vec::new();
        let mut idx = 0;

        while seg_start.x < end {
            let next = events.get(idx).filter(|e| e.from_x < end);
            match (track, next) {
                (Track::Independent, Some(join)) if join.kind == MembershipKind::Join => {
                    let mut shifts = std::mem::take(&mut carried);
                    shifts.extend(self.resolve_shifts(span_x, join.from_x, &mut last_y, sources));
                    let landing = self
                        .slot_center(join.bundle, join.to_x, id, sources)
                        .map_or(last_y, |p| p.y);
                    shifts.push(ResolvedShift::new(join.from_x, join.to_x, landing));
                    segments.push(Segment::Independent(IndependentSegment::new(
                        seg_start,
                        join.to_x.min(end),
                        self,
                        shifts,
                    )));
                    seg_start = Point::new(join.to_x, landing);
                    track = Track::Dependent(join.bundle);
                    idx += 1;
                }
                (Track::Dependent(bundle), Some(leave)) if leave.kind == MembershipKind::Leave => {
                    if leave.from_x > seg_start.x {
                        segments.push(Segment::Dependent(DependentSegment {
                            bundle,
                            lineage: id,
                            start_x: seg_start.x,
                            end_x: leave.from_x,
                        }));
                    }
                    let exit_y = self
                        .slot_center(bundle, leave.from_x, id, sources)
                        .map_or(seg_start.y, |p| p.y);
                    let landing = match leave.target {
                        Some(target) => resolve_or(target, leave.to_x, exit_y, sources),
                        None => exit_y,
                    };
                    seg_start = Point::new(leave.from_x, exit_y);
                    carried = vec![ResolvedShift::new(leave.from_x, leave.to_x, landing)];
                    span_x = leave.to_x;
                    last_y = landing;
                    track = Track::Independent;
                    idx += 1;
                }
                (_, Some(event)) => {
                    tracing::warn!(
                        kind = ?event.kind,
                        x = event.from_x,
                        "membership event does not match lineage state; ignored"
                    );
                    idx += 1;
                }
                (Track::Independent, None) => {
                    let mut shifts = std::mem::take(&mut carried);
                    shifts.extend(self.resolve_shifts(span_x, end, &mut last_y, sources));
                    segments.push(Segment::Independent(IndependentSegment::new(
                        seg_start, end, self, shifts,
                    )));
                    break;
                }
                (Track::Dependent(bundle), None) => {
                    segments.push(Segment::Dependent(DependentSegment {
                        bundle,
                        lineage: id,
                        start_x: seg_start.x,
                        end_x: end,
                    }));
                    break;
                }
            }
        }
        tracing::trace!(segments = segments.len(), "lineage compiled");
        segments
    }

    /// Shifts lying wholly inside `[from_x, to_x]`, with dynamic targets resolved.
    ///
    /// An unresolvable target keeps the previous landing position.
    fn resolve_shifts(
        &self,
        from_x: f64,
        to_x: f64,
        last_y: &mut f64,
        sources: SegmentSources<'_>,
    ) -> Vec<ResolvedShift> {
        self.shifts
            .within(from_x, to_x)
            .map(|shift| {
                let to_y = resolve_or(shift.target, shift.to_x, *last_y, sources);
                *last_y = to_y;
                ResolvedShift::new(shift.from_x, shift.to_x, to_y)
            })
            .collect()
    }

    fn slot_center(
        &self,
        bundle: BundleId,
        x: f64,
        id: LineageId,
        sources: SegmentSources<'_>,
    ) -> Option<Point> {
        let Some(b) = sources.bundles.get(bundle.0) else {
            tracing::warn!(%bundle, "membership references unknown bundle");
            return None;
        };
        Some(b.center_of_member_or_centerline(x, id, sources.lineages))
    }
}

fn resolve_or(target: ShiftTarget, x: f64, fallback: f64, sources: SegmentSources<'_>) -> f64 {
    match resolve_target(target, x, sources, 0) {
        Ok(y) => y,
        Err(err) => {
            tracing::warn!(%err, x, "unresolved shift target; keeping current position");
            fallback
        }
    }
}

fn resolve_target(
    target: ShiftTarget,
    x: f64,
    sources: SegmentSources<'_>,
    depth: usize,
) -> LineageResult<f64> {
    match target {
        ShiftTarget::Fixed(y) => Ok(y),
        ShiftTarget::Lineage { lineage, offset } => {
            Ok(position_of(lineage, x, sources, depth + 1)? + offset)
        }
    }
}

/// Vertical position of `lineage` at `x`.
///
/// A lineage that is a bundle member at `x` sits at its slot center. Otherwise its
/// independent track is evaluated: start point, its shifts and its leave landings.
pub(crate) fn position_of(
    lineage: LineageId,
    x: f64,
    sources: SegmentSources<'_>,
    depth: usize,
) -> LineageResult<f64> {
    if depth > MAX_TARGET_DEPTH {
        return Err(LineageError::lookup(format!(
            "position reference chain through {lineage} is too deep"
        )));
    }
    let target = sources
        .lineages
        .get(lineage.0)
        .ok_or_else(|| LineageError::lookup(format!("unknown {lineage}")))?;

    if let Some(bundle) = sources.bundles.iter().find(|b| b.has_member_at(lineage, x)) {
        return bundle
            .center_of_member(x, lineage, sources.lineages)
            .map(|p| p.y);
    }
    if x <= target.start_x {
        return Ok(target.start_y);
    }

    let mut shifts = Vec::new();
    for shift in target.shifts.iter().filter(|s| s.from_x < x) {
        let to_y = resolve_target(shift.target, shift.to_x, sources, depth)?;
        shifts.push(ResolvedShift::new(shift.from_x, shift.to_x, to_y));
    }
    for leave in target
        .memberships
        .iter()
        .filter(|m| m.kind == MembershipKind::Leave && m.from_x < x)
    {
        if let Some(t) = leave.target {
            let to_y = resolve_target(t, leave.to_x, sources, depth)?;
            shifts.push(ResolvedShift::new(leave.from_x, leave.to_x, to_y));
        }
    }
    Ok(Baseline::build(target.start(), &shifts, x)
        .y_at(x)
        .unwrap_or(target.start_y))
}

#[cfg(test)]
#[path = "../../tests/unit/lineage/compile.rs"]
mod tests;

use crate::{
    foundation::{
        core::{BundleId, Point},
        error::{LineageError, LineageResult},
        math::is_finite_all,
    },
    lineage::segment::Segment,
    path::{
        Scalable,
        events::{
            EventList, MembershipEvent, MembershipKind, ScaleEvent, ShiftEvent, ShiftTarget,
            validate_span,
        },
        width::WidthProfile,
    },
};

/// A colored band with its shift, scale and membership events.
///
/// Lineages are registered through [`Diagram`](crate::Diagram) and edited through
/// [`LineageBuilder`](crate::LineageBuilder).
#[derive(Clone, Debug)]
pub struct Lineage {
    pub(crate) color: String,
    pub(crate) start_x: f64,
    pub(crate) start_y: f64,
    pub(crate) start_w: f64,
    pub(crate) end_x: Option<f64>,
    pub(crate) initial_bundle: Option<BundleId>,
    pub(crate) shifts: EventList<ShiftEvent>,
    pub(crate) scales: EventList<ScaleEvent>,
    pub(crate) memberships: EventList<MembershipEvent>,
    pub(crate) segments: Vec<Segment>,
}

impl Lineage {
    pub(crate) fn new(color: String, start: Point, start_w: f64) -> LineageResult<Self> {
        if color.trim().is_empty() {
            return Err(LineageError::validation("lineage color must be non-empty"));
        }
        if !is_finite_all(&[start.x, start.y, start_w]) {
            return Err(LineageError::validation(
                "lineage start point and width must be finite",
            ));
        }
        if start_w < 0.0 {
            return Err(LineageError::validation("lineage width must be >= 0"));
        }
        Ok(Self {
            color,
            start_x: start.x,
            start_y: start.y,
            start_w,
            end_x: None,
            initial_bundle: None,
            shifts: EventList::default(),
            scales: EventList::default(),
            memberships: EventList::default(),
            segments: Vec::new(),
        })
    }

    /// Register a shift on an independent stretch of the timeline.
    ///
    /// Shifts are only drawn while the lineage is outside every bundle, so a shift that
    /// starts before the lineage, runs past its end, or overlaps a bundle stay (including
    /// its join and leave transitions) is rejected.
    pub(crate) fn add_shift(&mut self, event: ShiftEvent) -> LineageResult<()> {
        event.target.validate()?;
        validate_span(event.from_x, event.to_x, "shift")?;
        if event.from_x < self.start_x {
            return Err(LineageError::validation(format!(
                "shift [{}, {}] starts before the lineage at x={}",
                event.from_x, event.to_x, self.start_x
            )));
        }
        if let Some(end) = self.end_x
            && event.to_x > end
        {
            return Err(LineageError::validation(format!(
                "shift [{}, {}] runs past the lineage end at x={end}",
                event.from_x, event.to_x
            )));
        }
        check_free(&event, &self.bundle_stays(None))?;
        self.shifts.insert(event, "shift")
    }

    pub(crate) fn add_scale(&mut self, event: ScaleEvent) -> LineageResult<()> {
        if !event.to_w.is_finite() || event.to_w < 0.0 {
            return Err(LineageError::validation(
                "scale width must be finite and >= 0",
            ));
        }
        self.scales.insert(event, "scale")
    }

    pub(crate) fn add_membership(&mut self, event: MembershipEvent) -> LineageResult<()> {
        if let Some(target) = &event.target {
            target.validate()?;
        }
        if event.from_x < self.start_x {
            return Err(LineageError::validation(
                "membership transition starts before the lineage",
            ));
        }
        let state = self.bundle_before(event.from_x);
        match event.kind {
            MembershipKind::Join if state.is_some() => {
                return Err(LineageError::validation(
                    "cannot join a bundle while already inside one",
                ));
            }
            MembershipKind::Leave if state != Some(event.bundle) => {
                return Err(LineageError::validation(format!(
                    "cannot leave {} at x={}: not a member there",
                    event.bundle, event.from_x
                )));
            }
            _ => {}
        }
        let stays = self.bundle_stays(Some(&event));
        for shift in self.shifts.iter() {
            check_free(shift, &stays)?;
        }
        self.memberships.insert(event, "membership transition")
    }

    pub(crate) fn set_end(&mut self, x: f64) -> LineageResult<()> {
        if !x.is_finite() || x <= self.start_x {
            return Err(LineageError::validation(
                "terminate_at must be finite and after the lineage start",
            ));
        }
        if let Some(shift) = self.shifts.iter().find(|s| s.to_x > x) {
            return Err(LineageError::validation(format!(
                "terminate_at x={x} cuts through shift [{}, {}]",
                shift.from_x, shift.to_x
            )));
        }
        self.end_x = Some(x);
        Ok(())
    }

    /// X ranges spent in a bundle, from the start of each join (or the lineage start for
    /// a resident) to the end of the matching leave. `extra` is counted as if registered.
    fn bundle_stays(&self, extra: Option<&MembershipEvent>) -> Vec<(f64, f64)> {
        let mut events: Vec<&MembershipEvent> = self.memberships.iter().chain(extra).collect();
        events.sort_by(|a, b| a.from_x.total_cmp(&b.from_x));

        let mut stays = Vec::new();
        let mut open = self.initial_bundle.map(|_| self.start_x);
        for event in events {
            match event.kind {
                MembershipKind::Join => {
                    open.get_or_insert(event.from_x);
                }
                MembershipKind::Leave => {
                    if let Some(from_x) = open.take() {
                        stays.push((from_x, event.to_x));
                    }
                }
            }
        }
        if let Some(from_x) = open {
            stays.push((from_x, f64::INFINITY));
        }
        stays
    }

    /// Bundle the lineage is in just before `x`, by its own membership events.
    pub(crate) fn bundle_before(&self, x: f64) -> Option<BundleId> {
        let mut state = self.initial_bundle;
        for event in self.memberships.iter().take_while(|e| e.from_x < x) {
            state = match event.kind {
                MembershipKind::Join => Some(event.bundle),
                MembershipKind::Leave => None,
            };
        }
        state
    }

    /// Display color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Start point of the band's centerline.
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    /// Width at the start point.
    pub fn start_width(&self) -> f64 {
        self.start_w
    }

    /// Explicit end, if the lineage was terminated.
    pub fn end_x(&self) -> Option<f64> {
        self.end_x
    }

    /// Bundle the lineage was created in, if any.
    pub fn initial_bundle(&self) -> Option<BundleId> {
        self.initial_bundle
    }

    /// Shift events in ascending `from_x` order.
    pub fn shift_events(&self) -> &[ShiftEvent] {
        self.shifts.as_slice()
    }

    /// Scale events in ascending `from_x` order.
    pub fn scale_events(&self) -> &[ScaleEvent] {
        self.scales.as_slice()
    }

    /// Join/leave events in ascending `from_x` order.
    pub fn membership_events(&self) -> &[MembershipEvent] {
        self.memberships.as_slice()
    }

    /// Segments from the last [`Diagram::generate`](crate::Diagram::generate) pass.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Width profile over the lineage's whole life.
    pub fn width_profile(&self) -> WidthProfile<'_> {
        WidthProfile::new(self.start_w, self.scales.as_slice(), self.end_x)
    }

    /// `true` when any shift or leave quotes another lineage's position.
    pub fn has_dynamic_targets(&self) -> bool {
        self.shifts
            .iter()
            .any(|s| matches!(s.target, ShiftTarget::Lineage { .. }))
            || self
                .memberships
                .iter()
                .any(|m| matches!(m.target, Some(ShiftTarget::Lineage { .. })))
    }
}

fn check_free(shift: &ShiftEvent, stays: &[(f64, f64)]) -> LineageResult<()> {
    match stays
        .iter()
        .find(|&&(from_x, to_x)| shift.from_x < to_x && shift.to_x > from_x)
    {
        Some(&(from_x, to_x)) => Err(LineageError::validation(format!(
            "shift [{}, {}] overlaps a bundle stay [{from_x}, {to_x}]",
            shift.from_x, shift.to_x
        ))),
        None => Ok(()),
    }
}

impl Scalable for Lineage {
    fn width_at(&self, x: f64) -> f64 {
        self.width_profile().width_at(x)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lineage/model.rs"]
mod tests;

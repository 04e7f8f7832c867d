//! Diagram registry and the builder handles used to declare events.

use crate::{
    bundle::model::{Bundle, BundleMembership},
    foundation::{
        core::{BundleId, LineageId, Point},
        error::{LineageError, LineageResult},
        math::is_finite_all,
    },
    lineage::{model::Lineage, segment::SegmentSources},
    path::{
        Shiftable,
        events::{MembershipEvent, MembershipKind, ScaleEvent, ShiftEvent, ShiftTarget},
    },
};

/// Default number of samples per curve.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Owns every lineage and bundle; insertion order is draw and solve order.
#[derive(Clone, Debug)]
pub struct Diagram {
    pub(crate) view_width: f64,
    pub(crate) view_height: f64,
    pub(crate) resolution: usize,
    pub(crate) lineages: Vec<Lineage>,
    pub(crate) bundles: Vec<Bundle>,
}

impl Diagram {
    /// Empty diagram of the given view size, sampling curves with `resolution` samples.
    pub fn new(view_width: f64, view_height: f64, resolution: usize) -> LineageResult<Self> {
        if !is_finite_all(&[view_width, view_height]) || view_width <= 0.0 || view_height <= 0.0
        {
            return Err(LineageError::validation(
                "view width/height must be finite and > 0",
            ));
        }
        validate_resolution(resolution)?;
        Ok(Self {
            view_width,
            view_height,
            resolution,
            lineages: Vec::new(),
            bundles: Vec::new(),
        })
    }

    /// Register an independent lineage.
    pub fn add_lineage(
        &mut self,
        color: impl Into<String>,
        start: Point,
        start_w: f64,
    ) -> LineageResult<LineageId> {
        let lineage = Lineage::new(color.into(), start, start_w)?;
        let id = LineageId(self.lineages.len());
        self.lineages.push(lineage);
        Ok(id)
    }

    /// Register a lineage that starts inside `bundle` at `start_x`, fading in over the
    /// `fade_in` distance before it.
    pub fn add_lineage_in_bundle(
        &mut self,
        color: impl Into<String>,
        bundle: BundleId,
        start_x: f64,
        start_w: f64,
        fade_in: f64,
    ) -> LineageResult<LineageId> {
        if !is_finite_all(&[start_x, fade_in]) || fade_in < 0.0 {
            return Err(LineageError::validation(
                "in-bundle start_x and fade_in must be finite, fade_in >= 0",
            ));
        }
        let host = self.bundle_ref(bundle)?;
        let membership_start = start_x - fade_in;
        if membership_start < host.start_x {
            return Err(LineageError::validation(format!(
                "lineage would fade into {bundle} before the bundle starts"
            )));
        }
        let start_y = host.baseline().y_at(start_x).unwrap_or(host.start_y);

        let mut lineage = Lineage::new(color.into(), Point::new(start_x, start_y), start_w)?;
        lineage.initial_bundle = Some(bundle);
        let id = LineageId(self.lineages.len());
        self.lineages.push(lineage);
        self.bundles[bundle.0].add_member(BundleMembership::open(id, membership_start, fade_in));
        Ok(id)
    }

    /// Register a bundle; it spans to the right edge of the view.
    pub fn add_bundle(&mut self, start: Point, margin: f64) -> LineageResult<BundleId> {
        let bundle = Bundle::new(start, margin, self.view_width)?;
        let id = BundleId(self.bundles.len());
        self.bundles.push(bundle);
        Ok(id)
    }

    /// Builder handle for declaring events on `id`.
    pub fn lineage_mut(&mut self, id: LineageId) -> LineageResult<LineageBuilder<'_>> {
        self.lineage_ref(id)?;
        Ok(LineageBuilder { diagram: self, id })
    }

    /// Mutable bundle, for declaring bundle shifts.
    pub fn bundle_mut(&mut self, id: BundleId) -> LineageResult<&mut Bundle> {
        self.bundles
            .get_mut(id.0)
            .ok_or_else(|| LineageError::validation(format!("unknown {id}")))
    }

    /// Lineage by id.
    pub fn lineage(&self, id: LineageId) -> Option<&Lineage> {
        self.lineages.get(id.0)
    }

    /// Bundle by id.
    pub fn bundle(&self, id: BundleId) -> Option<&Bundle> {
        self.bundles.get(id.0)
    }

    /// All lineages in registration order.
    pub fn lineages(&self) -> &[Lineage] {
        &self.lineages
    }

    /// All bundles in registration order.
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// View width; also the right edge every open-ended entity extends to.
    pub fn view_width(&self) -> f64 {
        self.view_width
    }

    /// View height.
    pub fn view_height(&self) -> f64 {
        self.view_height
    }

    /// Samples per curve.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Change the sampling resolution used by the next generation pass.
    pub fn set_resolution(&mut self, resolution: usize) -> LineageResult<()> {
        validate_resolution(resolution)?;
        self.resolution = resolution;
        Ok(())
    }

    pub(crate) fn lineage_ref(&self, id: LineageId) -> LineageResult<&Lineage> {
        self.lineages
            .get(id.0)
            .ok_or_else(|| LineageError::validation(format!("unknown {id}")))
    }

    pub(crate) fn bundle_ref(&self, id: BundleId) -> LineageResult<&Bundle> {
        self.bundles
            .get(id.0)
            .ok_or_else(|| LineageError::validation(format!("unknown {id}")))
    }

    pub(crate) fn sources(&self) -> SegmentSources<'_> {
        SegmentSources {
            lineages: &self.lineages,
            bundles: &self.bundles,
            resolution: self.resolution,
            view_width: self.view_width,
        }
    }
}

fn validate_resolution(resolution: usize) -> LineageResult<()> {
    if resolution < 2 {
        return Err(LineageError::validation("resolution must be >= 2"));
    }
    Ok(())
}

/// Declares events on one lineage, keeping the bundles it touches in sync.
#[derive(Debug)]
pub struct LineageBuilder<'a> {
    diagram: &'a mut Diagram,
    id: LineageId,
}

impl LineageBuilder<'_> {
    /// Id of the lineage being edited.
    pub fn id(&self) -> LineageId {
        self.id
    }

    fn lineage(&mut self) -> &mut Lineage {
        &mut self.diagram.lineages[self.id.0]
    }

    fn check_target(&self, target: ShiftTarget) -> LineageResult<()> {
        if let ShiftTarget::Lineage { lineage, .. } = target {
            if lineage == self.id {
                return Err(LineageError::validation(
                    "a lineage cannot shift relative to itself",
                ));
            }
            self.diagram.lineage_ref(lineage)?;
        }
        Ok(())
    }

    /// Shift to `to_y` over `[from_x, to_x]`.
    pub fn shift_to(&mut self, from_x: f64, to_x: f64, to_y: f64) -> LineageResult<&mut Self> {
        self.shift_with(from_x, to_x, ShiftTarget::Fixed(to_y))
    }

    /// Shift to `target`'s position at `to_x`, plus `offset`.
    pub fn shift_to_lineage(
        &mut self,
        from_x: f64,
        to_x: f64,
        target: LineageId,
        offset: f64,
    ) -> LineageResult<&mut Self> {
        self.shift_with(from_x, to_x, ShiftTarget::Lineage { lineage: target, offset })
    }

    pub(crate) fn shift_with(
        &mut self,
        from_x: f64,
        to_x: f64,
        target: ShiftTarget,
    ) -> LineageResult<&mut Self> {
        self.check_target(target)?;
        self.lineage().add_shift(ShiftEvent {
            from_x,
            to_x,
            target,
        })?;
        Ok(self)
    }

    /// Scale to `to_w` over `[from_x, to_x]`.
    pub fn scale_to(&mut self, from_x: f64, to_x: f64, to_w: f64) -> LineageResult<&mut Self> {
        self.lineage().add_scale(ScaleEvent::new(from_x, to_x, to_w))?;
        Ok(self)
    }

    /// Move into `bundle` over `[from_x, to_x]`, fading into the stack over the same range.
    pub fn join(&mut self, from_x: f64, to_x: f64, bundle: BundleId) -> LineageResult<&mut Self> {
        let host = self.diagram.bundle_ref(bundle)?;
        if from_x < host.start_x {
            return Err(LineageError::validation(format!(
                "cannot join {bundle} before it starts"
            )));
        }
        let id = self.id;
        self.lineage().add_membership(MembershipEvent {
            from_x,
            to_x,
            kind: MembershipKind::Join,
            bundle,
            target: None,
        })?;
        self.diagram.bundles[bundle.0].add_member(BundleMembership::open(id, from_x, to_x - from_x));
        Ok(self)
    }

    /// Move out of `bundle` to `to_y` over `[from_x, to_x]`.
    pub fn leave(
        &mut self,
        from_x: f64,
        to_x: f64,
        bundle: BundleId,
        to_y: f64,
    ) -> LineageResult<&mut Self> {
        self.leave_with(from_x, to_x, bundle, ShiftTarget::Fixed(to_y))
    }

    /// Move out of `bundle` to `target`'s position at `to_x`, plus `offset`.
    pub fn leave_to_lineage(
        &mut self,
        from_x: f64,
        to_x: f64,
        bundle: BundleId,
        target: LineageId,
        offset: f64,
    ) -> LineageResult<&mut Self> {
        self.leave_with(from_x, to_x, bundle, ShiftTarget::Lineage { lineage: target, offset })
    }

    pub(crate) fn leave_with(
        &mut self,
        from_x: f64,
        to_x: f64,
        bundle: BundleId,
        target: ShiftTarget,
    ) -> LineageResult<&mut Self> {
        self.check_target(target)?;
        let id = self.id;
        if !self.diagram.bundle_ref(bundle)?.has_member_at(id, from_x) {
            return Err(LineageError::validation(format!(
                "{id} is not a member of {bundle} at x={from_x}"
            )));
        }
        self.lineage().add_membership(MembershipEvent {
            from_x,
            to_x,
            kind: MembershipKind::Leave,
            bundle,
            target: Some(target),
        })?;
        self.diagram.bundles[bundle.0].close_member(id, from_x, to_x)?;
        Ok(self)
    }

    /// End the lineage at `x`; bundle memberships are clipped there too.
    pub fn terminate_at(&mut self, x: f64) -> LineageResult<&mut Self> {
        self.lineage().set_end(x)?;
        let id = self.id;
        for bundle in &mut self.diagram.bundles {
            bundle.truncate_member(id, x);
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diagram/model.rs"]
mod tests;

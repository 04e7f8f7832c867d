//! Compiled geometry runs of a lineage.

use crate::{
    bundle::model::Bundle,
    foundation::core::{BundleId, LineageId, Outline, Point},
    geometry::offset::offset_baseline,
    lineage::model::Lineage,
    path::{
        Scalable, Shiftable,
        baseline::Baseline,
        events::{ResolvedShift, ScaleEvent},
        width::WidthProfile,
    },
};

/// Which strategy produced a segment's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum SegmentKind {
    /// Computed from the lineage's own baseline and width.
    Independent,
    /// Fetched from a bundle's solve pass.
    Dependent,
}

/// One run of a lineage, either self-computed or supplied by a bundle.
#[derive(Clone, Debug)]
pub enum Segment {
    /// Self-computed run.
    Independent(IndependentSegment),
    /// Bundle-supplied run.
    Dependent(DependentSegment),
}

/// Run whose baseline and width are computed from its own events.
#[derive(Clone, Debug)]
pub struct IndependentSegment {
    pub(crate) start_x: f64,
    pub(crate) start_y: f64,
    pub(crate) start_w: f64,
    pub(crate) end_x: f64,
    pub(crate) shifts: Vec<ResolvedShift>,
    pub(crate) scales: Vec<ScaleEvent>,
}

/// Run whose points come from a bundle's member cache.
#[derive(Clone, Debug)]
pub struct DependentSegment {
    pub(crate) bundle: BundleId,
    pub(crate) lineage: LineageId,
    pub(crate) start_x: f64,
    pub(crate) end_x: f64,
}

/// Read-only view of the entities a segment may query while compiling.
#[derive(Clone, Copy)]
pub(crate) struct SegmentSources<'a> {
    pub(crate) lineages: &'a [Lineage],
    pub(crate) bundles: &'a [Bundle],
    pub(crate) resolution: usize,
    pub(crate) view_width: f64,
}

impl IndependentSegment {
    pub(crate) fn new(
        start: Point,
        end_x: f64,
        lineage: &Lineage,
        shifts: Vec<ResolvedShift>,
    ) -> Self {
        Self {
            start_x: start.x,
            start_y: start.y,
            start_w: lineage.start_w,
            end_x,
            shifts,
            scales: lineage.scales.as_slice().to_vec(),
        }
    }

    /// Shifts resolved for this run, in ascending `from_x` order.
    pub fn shifts(&self) -> &[ResolvedShift] {
        &self.shifts
    }

    fn compile(&self, resolution: usize) -> Outline {
        offset_baseline(&self.baseline(), resolution, self)
    }
}

impl Shiftable for IndependentSegment {
    fn baseline(&self) -> Baseline {
        Baseline::build(
            Point::new(self.start_x, self.start_y),
            &self.shifts,
            self.end_x,
        )
    }
}

impl Scalable for IndependentSegment {
    fn width_at(&self, x: f64) -> f64 {
        WidthProfile::new(self.start_w, &self.scales, Some(self.end_x)).width_at(x)
    }
}

impl DependentSegment {
    /// Bundle supplying the points.
    pub fn bundle(&self) -> BundleId {
        self.bundle
    }

    fn compile(&self, sources: SegmentSources<'_>) -> Outline {
        let Some(bundle) = sources.bundles.get(self.bundle.0) else {
            tracing::warn!(bundle = %self.bundle, "dependent segment references unknown bundle");
            return Outline::default();
        };
        match bundle.member_points(self.lineage, self.start_x, self.end_x, sources.lineages) {
            Ok(outline) => outline,
            Err(err) => {
                tracing::warn!(%err, lineage = %self.lineage, "no bundle geometry for segment");
                Outline::default()
            }
        }
    }
}

impl Segment {
    /// Geometry strategy of this segment.
    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Independent(_) => SegmentKind::Independent,
            Self::Dependent(_) => SegmentKind::Dependent,
        }
    }

    /// X where the segment starts.
    pub fn start_x(&self) -> f64 {
        match self {
            Self::Independent(s) => s.start_x,
            Self::Dependent(s) => s.start_x,
        }
    }

    /// X where the segment ends.
    pub fn end_x(&self) -> f64 {
        match self {
            Self::Independent(s) => s.end_x,
            Self::Dependent(s) => s.end_x,
        }
    }

    pub(crate) fn compile(&self, sources: SegmentSources<'_>) -> Outline {
        match self {
            Self::Independent(s) => s.compile(sources.resolution),
            Self::Dependent(s) => s.compile(sources),
        }
    }
}

/// Concatenate the geometry of consecutive segments.
pub(crate) fn assemble(segments: &[Segment], sources: SegmentSources<'_>) -> Outline {
    let mut outline = Outline::default();
    for segment in segments {
        outline.append(segment.compile(sources));
    }
    outline
}

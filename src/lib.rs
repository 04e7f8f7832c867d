//! Lineage is a geometry engine for lineage flow diagrams.
//!
//! Colored bands start at fixed positions, move vertically, change width, merge, and
//! join or leave shared bundles (stacked lanes). Each band ends up as a filled outline.
//!
//! # Pipeline overview
//!
//! 1. **Declare**: register lineages and bundles on a [`Diagram`] and attach shift, scale,
//!    membership and merge events (directly, or from a [`DiagramSpec`] JSON file).
//! 2. **Solve**: every bundle samples its baseline and stacks its members, caching each
//!    member's boundary points.
//! 3. **Compile**: every lineage walks its membership events, alternating self-computed
//!    (independent) runs with runs fetched from bundle caches (dependent).
//! 4. **Serialize** (optional): [`to_svg_document`] turns outlines into an SVG file.
//!
//! Bundles are always solved before any lineage compiles; within a bundle, members stack
//! in registration order so output is reproducible run to run.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bundle;
mod diagram;
mod foundation;
mod geometry;
mod lineage;
mod path;
mod render;

pub use bundle::model::{Bundle, BundleMembership, SolvedBundle};
pub use bundle::solver::MemberSlot;
pub use diagram::generate::{GenerateOpts, Generated, GeneratedLineage};
pub use diagram::model::{DEFAULT_RESOLUTION, Diagram, LineageBuilder};
pub use diagram::spec::{
    BuiltDiagram, BundleShiftSpec, BundleSpec, DiagramSpec, InBundleSpec, LineageSpec,
    MembershipSpec, MergeEntry, ScaleSpec, ShiftSpec, TargetSpec, ViewSpec,
};
pub use foundation::core::{BundleId, CubicBez, Line, LineageId, Outline, Point, Vec2};
pub use foundation::error::{LineageError, LineageResult};
pub use geometry::backfilter::{BackFilter, BoundarySide};
pub use geometry::offset::offset_baseline;
pub use lineage::merge::{
    MergeOutcome, MergePlacement, MergeSpec, MergeTarget, resolve_merge_targets,
};
pub use lineage::model::Lineage;
pub use lineage::segment::{DependentSegment, IndependentSegment, Segment, SegmentKind};
pub use path::baseline::{Baseline, BaselinePiece};
pub use path::events::{
    EventList, MembershipEvent, MembershipKind, ResolvedShift, ScaleEvent, ShiftEvent,
    ShiftTarget,
};
pub use path::smooth::smootherstep;
pub use path::width::WidthProfile;
pub use path::{Scalable, Shiftable};
pub use render::svg::to_svg_document;

//! Path primitives: smoothing kernel, events, shiftable baselines and scalable widths.

pub(crate) mod baseline;
pub(crate) mod events;
pub(crate) mod smooth;
pub(crate) mod width;

use baseline::Baseline;

/// Something whose centerline can be built as a [`Baseline`].
pub trait Shiftable {
    /// Build the centerline curve.
    fn baseline(&self) -> Baseline;
}

/// Something with a width defined at any X.
pub trait Scalable {
    /// Width at `x`; exactly zero once the owner has ended.
    fn width_at(&self, x: f64) -> f64;
}

//! Merging several parent lineages into one child.

use crate::{
    diagram::model::Diagram,
    foundation::{
        core::{BundleId, LineageId, Point},
        error::{LineageError, LineageResult},
        math::is_finite_all,
    },
    path::{Scalable, events::ShiftTarget},
};

/// Where the merged child lives.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePlacement {
    /// Independent child centered at `y`.
    At {
        /// Child center Y.
        y: f64,
    },
    /// Child registered as a member of `bundle`; its position comes from the bundle.
    InBundle {
        /// Host bundle.
        bundle: BundleId,
    },
}

/// Request to merge `parents` into a new child over `[from_x, to_x]`.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeSpec {
    /// Parent lineages, stacked top to bottom inside the child.
    pub parents: Vec<LineageId>,
    /// X where the parents start converging.
    pub from_x: f64,
    /// X where the parents end and the child starts.
    pub to_x: f64,
    /// Child color.
    pub color: String,
    /// Child width.
    pub width: f64,
    /// Child placement.
    pub placement: MergePlacement,
}

/// Width and center offset (relative to the child's center) a parent converges to.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct MergeTarget {
    /// Parent width at the child start.
    pub width: f64,
    /// Parent center minus child center.
    pub offset: f64,
}

/// Result of [`Diagram::merge`].
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    /// The new child lineage.
    pub child: LineageId,
    /// Per-parent targets, in `MergeSpec::parents` order.
    pub targets: Vec<MergeTarget>,
}

/// Fit parents of the given widths into a child of width `child_w`.
///
/// Each parent gets a share of the child proportional to its width. Its target width is
/// `max(own, share)` capped at `child_w`; centers walk down the child's span by share,
/// then move inward wherever a band would stick out of the child.
pub fn resolve_merge_targets(parent_widths: &[f64], child_w: f64) -> Vec<MergeTarget> {
    if parent_widths.is_empty() {
        return Vec::new();
    }
    let total: f64 = parent_widths.iter().map(|w| w.max(0.0)).sum();
    let even = child_w / parent_widths.len() as f64;
    let half = child_w * 0.5;

    let mut cursor = -half;
    parent_widths
        .iter()
        .map(|&own| {
            let share = if total > 0.0 {
                own.max(0.0) / total * child_w
            } else {
                even
            };
            let width = own.max(share).min(child_w);
            let mut offset = cursor + share * 0.5;
            cursor += share;

            let top_overflow = -half - (offset - width * 0.5);
            if top_overflow > 0.0 {
                offset += top_overflow;
            }
            let bottom_overflow = (offset + width * 0.5) - half;
            if bottom_overflow > 0.0 {
                offset -= bottom_overflow;
            }
            MergeTarget { width, offset }
        })
        .collect()
}

impl Diagram {
    /// Create the child described by `spec` and converge every parent into it.
    ///
    /// Bundle-resident parents leave their bundle over the merge range, others shift;
    /// both scale to their target width and terminate at `spec.to_x`. When the child
    /// lives in a bundle, parent targets are dynamic references to the child. The
    /// diagram is left unchanged on error.
    #[tracing::instrument(skip(self, spec), fields(parents = spec.parents.len()))]
    pub fn merge(&mut self, spec: &MergeSpec) -> LineageResult<MergeOutcome> {
        self.validate_merge(spec)?;

        let snapshot = (self.lineages.clone(), self.bundles.clone());
        match self.apply_merge(spec) {
            Ok(outcome) => {
                tracing::debug!(child = %outcome.child, "merge installed");
                Ok(outcome)
            }
            Err(err) => {
                (self.lineages, self.bundles) = snapshot;
                Err(err)
            }
        }
    }

    fn validate_merge(&self, spec: &MergeSpec) -> LineageResult<()> {
        if spec.parents.is_empty() {
            return Err(LineageError::validation("merge needs at least one parent"));
        }
        if !is_finite_all(&[spec.from_x, spec.to_x, spec.width]) || spec.from_x >= spec.to_x {
            return Err(LineageError::validation(
                "merge range must be finite with from_x < to_x",
            ));
        }
        if spec.width < 0.0 {
            return Err(LineageError::validation("merge child width must be >= 0"));
        }
        for (idx, id) in spec.parents.iter().enumerate() {
            if spec.parents[..idx].contains(id) {
                return Err(LineageError::validation(format!(
                    "{id} listed twice as merge parent"
                )));
            }
            let parent = self.lineage_ref(*id)?;
            if parent.start_x > spec.from_x {
                return Err(LineageError::validation(format!(
                    "{id} starts after the merge begins"
                )));
            }
            if parent.end_x.is_some_and(|end| end < spec.to_x) {
                return Err(LineageError::validation(format!(
                    "{id} terminates before the merge completes"
                )));
            }
        }
        if let MergePlacement::InBundle { bundle } = spec.placement {
            self.bundle_ref(bundle)?;
        }
        Ok(())
    }

    fn apply_merge(&mut self, spec: &MergeSpec) -> LineageResult<MergeOutcome> {
        let widths: Vec<f64> = spec
            .parents
            .iter()
            .map(|id| self.lineages[id.0].width_at(spec.from_x))
            .collect();
        let targets = resolve_merge_targets(&widths, spec.width);

        let child = match spec.placement {
            MergePlacement::At { y } => {
                self.add_lineage(spec.color.clone(), Point::new(spec.to_x, y), spec.width)?
            }
            MergePlacement::InBundle { bundle } => self.add_lineage_in_bundle(
                spec.color.clone(),
                bundle,
                spec.to_x,
                spec.width,
                spec.to_x - spec.from_x,
            )?,
        };

        for (&parent, target) in spec.parents.iter().zip(&targets) {
            let shift = match spec.placement {
                MergePlacement::At { y } => ShiftTarget::Fixed(y + target.offset),
                MergePlacement::InBundle { .. } => ShiftTarget::Lineage {
                    lineage: child,
                    offset: target.offset,
                },
            };
            let resident = self.lineages[parent.0].bundle_before(spec.from_x);
            let mut builder = self.lineage_mut(parent)?;
            match resident {
                Some(bundle) => builder.leave_with(spec.from_x, spec.to_x, bundle, shift)?,
                None => builder.shift_with(spec.from_x, spec.to_x, shift)?,
            };
            builder
                .scale_to(spec.from_x, spec.to_x, target.width)?
                .terminate_at(spec.to_x)?;
        }

        Ok(MergeOutcome { child, targets })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lineage/merge.rs"]
mod tests;

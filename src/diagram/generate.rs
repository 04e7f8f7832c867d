//! Two-phase generation: solve bundles, then compile lineages against them.

use rayon::prelude::*;

use crate::{
    bundle::model::SolvedBundle,
    diagram::model::Diagram,
    foundation::{
        core::{LineageId, Outline},
        error::{LineageError, LineageResult},
    },
    lineage::{
        model::Lineage,
        segment::{Segment, SegmentKind, assemble},
    },
};

/// Threading controls for [`Diagram::generate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerateOpts {
    /// Solve bundles and compile lineages on a rayon pool.
    pub parallel: bool,
    /// Pool size; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Final geometry of one lineage.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GeneratedLineage {
    /// Lineage id.
    pub id: LineageId,
    /// Fill color.
    pub color: String,
    /// Upper and lower boundaries, left to right.
    pub outline: Outline,
    /// Kind of each compiled segment, in X order.
    pub segments: Vec<SegmentKind>,
}

/// Output of a generation pass, in lineage registration order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Generated {
    /// One entry per lineage.
    pub lineages: Vec<GeneratedLineage>,
}

impl Generated {
    /// Outline of `id`, if it was generated.
    pub fn outline(&self, id: LineageId) -> Option<&Outline> {
        self.lineages.get(id.0).map(|l| &l.outline)
    }

    /// Segment kinds of `id`, if it was generated.
    pub fn segment_kinds(&self, id: LineageId) -> Option<&[SegmentKind]> {
        self.lineages.get(id.0).map(|l| l.segments.as_slice())
    }
}

impl Diagram {
    /// Solve every bundle, then compile every lineage.
    ///
    /// Bundles must be solved first: dependent segments and dynamic shift targets read
    /// bundle geometry. Lineage compilation only reads shared state, so both phases run
    /// on a pool when `opts.parallel` is set; output does not depend on threading.
    #[tracing::instrument(skip(self, opts), fields(lineages = self.lineages.len(), bundles = self.bundles.len()))]
    pub fn generate(&mut self, opts: &GenerateOpts) -> LineageResult<Generated> {
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };

        let solved = self.solve_bundles(pool.as_ref());
        for (bundle, solved) in self.bundles.iter_mut().zip(solved) {
            bundle.solved = Some(solved);
        }
        tracing::debug!(bundles = self.bundles.len(), "bundles solved");

        let compiled = self.compile_lineages(pool.as_ref());
        let mut out = Vec::with_capacity(compiled.len());
        for (idx, (segments, outline)) in compiled.into_iter().enumerate() {
            let lineage = &mut self.lineages[idx];
            out.push(GeneratedLineage {
                id: LineageId(idx),
                color: lineage.color.clone(),
                outline,
                segments: segments.iter().map(Segment::kind).collect(),
            });
            lineage.segments = segments;
        }
        tracing::debug!(
            lineages = out.len(),
            dynamic = self.lineages.iter().filter(|l| l.has_dynamic_targets()).count(),
            "lineages compiled"
        );
        Ok(Generated { lineages: out })
    }

    fn solve_bundles(&self, pool: Option<&rayon::ThreadPool>) -> Vec<SolvedBundle> {
        let lineages = &self.lineages;
        let resolution = self.resolution;
        match pool {
            Some(pool) => pool.install(|| {
                self.bundles
                    .par_iter()
                    .map(|b| b.solve(lineages, resolution))
                    .collect()
            }),
            None => self
                .bundles
                .iter()
                .map(|b| b.solve(lineages, resolution))
                .collect(),
        }
    }

    fn compile_lineages(&self, pool: Option<&rayon::ThreadPool>) -> Vec<(Vec<Segment>, Outline)> {
        let sources = self.sources();
        let compile_one = |(idx, lineage): (usize, &Lineage)| {
            let segments = lineage.compile_segments(LineageId(idx), sources);
            let outline = assemble(&segments, sources);
            (segments, outline)
        };
        match pool {
            Some(pool) => pool.install(|| {
                self.lineages
                    .par_iter()
                    .enumerate()
                    .map(compile_one)
                    .collect()
            }),
            None => self.lineages.iter().enumerate().map(compile_one).collect(),
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> LineageResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LineageError::validation(
            "generate threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LineageError::geometry(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/diagram/generate.rs"]
mod tests;

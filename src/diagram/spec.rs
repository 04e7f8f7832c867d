//! JSON description of a diagram, built into a [`Diagram`] by key.

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use crate::{
    diagram::model::{DEFAULT_RESOLUTION, Diagram},
    foundation::{
        core::{BundleId, LineageId, Point},
        error::{LineageError, LineageResult},
    },
    lineage::merge::{MergePlacement, MergeSpec},
    path::events::ShiftTarget,
};

/// Human-edited diagram description. Entities refer to each other by string key.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramSpec {
    /// View size.
    pub view: ViewSpec,
    /// Samples per curve.
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    /// Bundles, in solve order.
    #[serde(default)]
    pub bundles: Vec<BundleSpec>,
    /// Lineages, in draw order.
    #[serde(default)]
    pub lineages: Vec<LineageSpec>,
    /// Merges, applied after every lineage's own events.
    #[serde(default)]
    pub merges: Vec<MergeEntry>,
}

fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub width: f64,
    pub height: f64,
}

/// Shift landing position: a plain number, or `{ "lineage": key, "offset": dy }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TargetSpec {
    /// Concrete Y.
    Y(f64),
    /// Another lineage's position plus an offset.
    Lineage {
        /// Key of the quoted lineage.
        lineage: String,
        /// Added to the quoted position.
        #[serde(default)]
        offset: f64,
    },
}

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShiftSpec {
    pub from_x: f64,
    pub to_x: f64,
    pub to: TargetSpec,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleSpec {
    pub from_x: f64,
    pub to_x: f64,
    pub to_w: f64,
}

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleSpec {
    pub key: String,
    pub start: [f64; 2],
    #[serde(default)]
    pub margin: f64,
    #[serde(default)]
    pub shifts: Vec<BundleShiftSpec>,
}

/// Bundle shifts only take concrete targets.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleShiftSpec {
    pub from_x: f64,
    pub to_x: f64,
    pub to_y: f64,
}

/// Join (`to` absent) or leave (`to` present) of a bundle.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MembershipSpec {
    pub from_x: f64,
    pub to_x: f64,
    pub bundle: String,
    #[serde(default)]
    pub to: Option<TargetSpec>,
}

/// Lineage that starts inside a bundle.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InBundleSpec {
    pub bundle: String,
    #[serde(default)]
    pub fade_in: f64,
}

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineageSpec {
    pub key: String,
    pub color: String,
    pub start_x: f64,
    /// Required unless `in_bundle` is set.
    #[serde(default)]
    pub start_y: Option<f64>,
    pub width: f64,
    #[serde(default)]
    pub in_bundle: Option<InBundleSpec>,
    #[serde(default)]
    pub shifts: Vec<ShiftSpec>,
    #[serde(default)]
    pub scales: Vec<ScaleSpec>,
    /// Joins and leaves; applied in `from_x` order.
    #[serde(default)]
    pub memberships: Vec<MembershipSpec>,
    #[serde(default)]
    pub terminate_at: Option<f64>,
}

/// Merge of existing lineages into a new one keyed `key`. Exactly one of `y` / `bundle`.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeEntry {
    pub key: String,
    pub color: String,
    pub parents: Vec<String>,
    pub from_x: f64,
    pub to_x: f64,
    pub width: f64,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub bundle: Option<String>,
}

/// A built diagram plus the ids assigned to each key.
#[derive(Clone, Debug)]
pub struct BuiltDiagram {
    /// The diagram, ready to generate.
    pub diagram: Diagram,
    /// Lineage ids by key, merge children included.
    pub lineages: BTreeMap<String, LineageId>,
    /// Bundle ids by key.
    pub bundles: BTreeMap<String, BundleId>,
}

impl DiagramSpec {
    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LineageResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LineageError::serde(format!("parse diagram JSON: {e}")))
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> LineageResult<Self> {
        serde_json::from_str(s).map_err(|e| LineageError::serde(format!("parse diagram JSON: {e}")))
    }

    /// Parse from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LineageResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LineageError::validation(format!("open diagram JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate and build the diagram.
    ///
    /// Lineages are all registered before any event is applied, so shift targets may
    /// refer to lineages declared later in the file.
    #[tracing::instrument(skip(self), fields(lineages = self.lineages.len(), merges = self.merges.len()))]
    pub fn build(&self) -> LineageResult<BuiltDiagram> {
        let mut diagram = Diagram::new(self.view.width, self.view.height, self.resolution)?;
        let mut keys = Keys::default();

        for spec in &self.bundles {
            let id = diagram.add_bundle(Point::new(spec.start[0], spec.start[1]), spec.margin)?;
            for s in &spec.shifts {
                diagram.bundle_mut(id)?.shift_to(s.from_x, s.to_x, s.to_y)?;
            }
            keys.insert_bundle(&spec.key, id)?;
        }

        for spec in &self.lineages {
            let id = match &spec.in_bundle {
                Some(host) => {
                    if spec.start_y.is_some() {
                        return Err(LineageError::validation(format!(
                            "lineage '{}': start_y is taken from the bundle when in_bundle is set",
                            spec.key
                        )));
                    }
                    diagram.add_lineage_in_bundle(
                        spec.color.clone(),
                        keys.bundle(&host.bundle)?,
                        spec.start_x,
                        spec.width,
                        host.fade_in,
                    )?
                }
                None => {
                    let y = spec.start_y.ok_or_else(|| {
                        LineageError::validation(format!("lineage '{}': missing start_y", spec.key))
                    })?;
                    diagram.add_lineage(spec.color.clone(), Point::new(spec.start_x, y), spec.width)?
                }
            };
            keys.insert_lineage(&spec.key, id)?;
        }

        for spec in &self.lineages {
            apply_events(&mut diagram, &keys, spec).map_err(|e| match e {
                LineageError::Validation(msg) => {
                    LineageError::validation(format!("lineage '{}': {msg}", spec.key))
                }
                other => other,
            })?;
        }

        for entry in &self.merges {
            let placement = match (entry.y, &entry.bundle) {
                (Some(y), None) => MergePlacement::At { y },
                (None, Some(bundle)) => MergePlacement::InBundle {
                    bundle: keys.bundle(bundle)?,
                },
                _ => {
                    return Err(LineageError::validation(format!(
                        "merge '{}': set exactly one of 'y' or 'bundle'",
                        entry.key
                    )));
                }
            };
            let parents = entry
                .parents
                .iter()
                .map(|key| keys.lineage(key))
                .collect::<LineageResult<Vec<_>>>()?;
            let outcome = diagram.merge(&MergeSpec {
                parents,
                from_x: entry.from_x,
                to_x: entry.to_x,
                color: entry.color.clone(),
                width: entry.width,
                placement,
            })?;
            keys.insert_lineage(&entry.key, outcome.child)?;
        }

        Ok(BuiltDiagram {
            diagram,
            lineages: keys.lineages,
            bundles: keys.bundles,
        })
    }
}

fn apply_events(diagram: &mut Diagram, keys: &Keys, spec: &LineageSpec) -> LineageResult<()> {
    let id = keys.lineage(&spec.key)?;
    let mut memberships: Vec<&MembershipSpec> = spec.memberships.iter().collect();
    memberships.sort_by(|a, b| a.from_x.total_cmp(&b.from_x));

    // Bundle stays have to be known before shifts are checked against them.
    let mut builder = diagram.lineage_mut(id)?;
    for m in memberships {
        let bundle = keys.bundle(&m.bundle)?;
        match &m.to {
            None => builder.join(m.from_x, m.to_x, bundle)?,
            Some(to) => builder.leave_with(m.from_x, m.to_x, bundle, keys.target(to)?)?,
        };
    }
    for s in &spec.shifts {
        builder.shift_with(s.from_x, s.to_x, keys.target(&s.to)?)?;
    }
    for s in &spec.scales {
        builder.scale_to(s.from_x, s.to_x, s.to_w)?;
    }
    if let Some(x) = spec.terminate_at {
        builder.terminate_at(x)?;
    }
    Ok(())
}

#[derive(Default)]
struct Keys {
    lineages: BTreeMap<String, LineageId>,
    bundles: BTreeMap<String, BundleId>,
}

impl Keys {
    fn insert_lineage(&mut self, key: &str, id: LineageId) -> LineageResult<()> {
        if self.lineages.insert(key.to_owned(), id).is_some() {
            return Err(LineageError::validation(format!("duplicate lineage key '{key}'")));
        }
        Ok(())
    }

    fn insert_bundle(&mut self, key: &str, id: BundleId) -> LineageResult<()> {
        if self.bundles.insert(key.to_owned(), id).is_some() {
            return Err(LineageError::validation(format!("duplicate bundle key '{key}'")));
        }
        Ok(())
    }

    fn lineage(&self, key: &str) -> LineageResult<LineageId> {
        self.lineages
            .get(key)
            .copied()
            .ok_or_else(|| LineageError::validation(format!("unknown lineage key '{key}'")))
    }

    fn bundle(&self, key: &str) -> LineageResult<BundleId> {
        self.bundles
            .get(key)
            .copied()
            .ok_or_else(|| LineageError::validation(format!("unknown bundle key '{key}'")))
    }

    fn target(&self, spec: &TargetSpec) -> LineageResult<ShiftTarget> {
        Ok(match spec {
            TargetSpec::Y(y) => ShiftTarget::Fixed(*y),
            TargetSpec::Lineage { lineage, offset } => ShiftTarget::Lineage {
                lineage: self.lineage(lineage)?,
                offset: *offset,
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diagram/spec.rs"]
mod tests;

//! Bundles: shared lanes that stack member lineages with eased entry and exit.

pub(crate) mod model;
pub(crate) mod solver;

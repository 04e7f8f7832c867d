pub(crate) mod compile;
pub(crate) mod merge;
pub(crate) mod model;
pub(crate) mod segment;

//! Segment compiler: baseline + width profile to boundary point sequences.

pub(crate) mod backfilter;
pub(crate) mod offset;

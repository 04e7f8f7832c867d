use std::fmt::Write as _;

pub use kurbo::{CubicBez, Line, Point, Vec2};

/// Stable handle of a lineage inside its [`Diagram`](crate::Diagram).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LineageId(pub usize);

/// Stable handle of a bundle inside its [`Diagram`](crate::Diagram).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BundleId(pub usize);

impl std::fmt::Display for LineageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lineage#{}", self.0)
    }
}

impl std::fmt::Display for BundleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bundle#{}", self.0)
    }
}

/// Two boundary point sequences of a band, both ordered left to right.
///
/// A renderer draws `upper` forward, then `lower` reversed, and closes the path.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Outline {
    /// Boundary on the positive side of the baseline normal.
    pub upper: Vec<Point>,
    /// Boundary on the negative side of the baseline normal.
    pub lower: Vec<Point>,
}

impl Outline {
    /// Create an outline from the two boundary sequences.
    pub fn new(upper: Vec<Point>, lower: Vec<Point>) -> Self {
        Self { upper, lower }
    }

    /// `true` when no boundary point was produced.
    pub fn is_empty(&self) -> bool {
        self.upper.is_empty() && self.lower.is_empty()
    }

    /// Append another outline's points after this one's.
    pub fn append(&mut self, mut other: Outline) {
        self.upper.append(&mut other.upper);
        self.lower.append(&mut other.lower);
    }

    /// SVG path data for the closed shape, or an empty string for an empty outline.
    pub fn to_svg_path_d(&self) -> String {
        let Some(first) = self.upper.first().or_else(|| self.lower.last()) else {
            return String::new();
        };
        let mut d = String::with_capacity((self.upper.len() + self.lower.len()) * 24);
        let _ = write!(d, "M {} {}", first.x, first.y);
        let rest = self
            .upper
            .iter()
            .skip(1)
            .chain(self.lower.iter().rev().skip(usize::from(self.upper.is_empty())));
        for p in rest {
            let _ = write!(d, " L {} {}", p.x, p.y);
        }
        d.push_str(" Z");
        d
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

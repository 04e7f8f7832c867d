//! SVG serialization of generated outlines.

use std::fmt::Write as _;

use crate::diagram::{generate::Generated, model::Diagram};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// One `<svg>` document with a filled `<path>` per non-empty lineage, in draw order.
pub fn to_svg_document(diagram: &Diagram, generated: &Generated) -> String {
    let (w, h) = (diagram.view_width(), diagram.view_height());
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="{SVG_NS}">"#
    );
    for lineage in &generated.lineages {
        let d = lineage.outline.to_svg_path_d();
        if d.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            r#"  <path fill="{}" stroke="none" d="{d}"/>"#,
            escape_attr(&lineage.color)
        );
    }
    out.push_str("</svg>\n");
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;

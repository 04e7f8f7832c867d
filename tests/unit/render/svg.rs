use super::*;
use crate::{
    diagram::generate::{GenerateOpts, GeneratedLineage},
    foundation::core::{LineageId, Outline, Point},
    lineage::segment::SegmentKind,
};

#[test]
fn document_has_one_path_per_drawn_lineage() {
    let mut d = Diagram::new(200.0, 100.0, 10).unwrap();
    d.add_lineage("#ff0000", Point::new(0.0, 50.0), 10.0).unwrap();
    d.add_lineage("#00ff00", Point::new(0.0, 20.0), 4.0).unwrap();
    let generated = d.generate(&GenerateOpts::default()).unwrap();
    let svg = to_svg_document(&d, &generated);

    assert!(svg.starts_with(
        r#"<svg width="200" height="100" viewBox="0 0 200 100" xmlns="http://www.w3.org/2000/svg">"#
    ));
    assert!(svg.ends_with("</svg>\n"));
    assert_eq!(svg.matches("<path ").count(), 2);
    assert!(svg.contains(r##"fill="#ff0000""##));
    let red = svg.find("#ff0000").unwrap();
    let green = svg.find("#00ff00").unwrap();
    assert!(red < green);
}

#[test]
fn empty_outlines_are_skipped_and_colors_escaped() {
    let d = Diagram::new(10.0, 10.0, 2).unwrap();
    let generated = Generated {
        lineages: vec![
            GeneratedLineage {
                id: LineageId(0),
                color: "a\"<b>".to_owned(),
                outline: Outline::new(vec![Point::new(0.0, 0.0)], vec![Point::new(0.0, 1.0)]),
                segments: vec![SegmentKind::Independent],
            },
            GeneratedLineage {
                id: LineageId(1),
                color: "blue".to_owned(),
                outline: Outline::default(),
                segments: Vec::new(),
            },
        ],
    };
    let svg = to_svg_document(&d, &generated);
    assert_eq!(svg.matches("<path ").count(), 1);
    assert!(svg.contains(r#"fill="a&quot;&lt;b&gt;""#));
    assert!(!svg.contains("blue"));
}

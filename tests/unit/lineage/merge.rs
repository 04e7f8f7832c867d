use super::*;
use crate::{
    diagram::generate::GenerateOpts,
    lineage::segment::SegmentKind,
    path::events::MembershipKind,
};

const EPS: f64 = 1e-9;

fn two_bands() -> (Diagram, LineageId, LineageId) {
    let mut d = Diagram::new(1000.0, 300.0, 100).unwrap();
    let a = d.add_lineage("a", Point::new(0.0, 50.0), 10.0).unwrap();
    let b = d.add_lineage("b", Point::new(0.0, 150.0), 10.0).unwrap();
    (d, a, b)
}

fn merge_at(parents: Vec<LineageId>, y: f64) -> MergeSpec {
    MergeSpec {
        parents,
        from_x: 400.0,
        to_x: 500.0,
        color: "c".to_owned(),
        width: 30.0,
        placement: MergePlacement::At { y },
    }
}

#[test]
fn equal_parents_split_the_child_evenly() {
    let t = resolve_merge_targets(&[10.0, 10.0], 30.0);
    assert_eq!(t.len(), 2);
    for target in &t {
        assert!((target.width - 15.0).abs() < EPS);
        assert!(target.width <= 30.0);
    }
    assert!((t[0].offset + 7.5).abs() < EPS);
    assert!((t[1].offset - 7.5).abs() < EPS);
    // Adjacent and together exactly the child's span.
    let top = t[0].offset - t[0].width / 2.0;
    let seam = t[0].offset + t[0].width / 2.0;
    let bottom = t[1].offset + t[1].width / 2.0;
    assert!((top + 15.0).abs() < EPS);
    assert!((seam - (t[1].offset - t[1].width / 2.0)).abs() < EPS);
    assert!((bottom - 15.0).abs() < EPS);
}

#[test]
fn oversized_parents_are_clamped_inside_the_child() {
    let t = resolve_merge_targets(&[10.0, 30.0], 20.0);
    assert_eq!(t[0], MergeTarget { width: 10.0, offset: -5.0 });
    assert_eq!(t[1], MergeTarget { width: 20.0, offset: 0.0 });
    for target in &t {
        assert!(target.offset - target.width / 2.0 >= -10.0 - EPS);
        assert!(target.offset + target.width / 2.0 <= 10.0 + EPS);
    }
}

#[test]
fn zero_width_parents_share_evenly() {
    let t = resolve_merge_targets(&[0.0, 0.0], 10.0);
    assert_eq!(t[0], MergeTarget { width: 5.0, offset: -2.5 });
    assert_eq!(t[1], MergeTarget { width: 5.0, offset: 2.5 });
    assert!(resolve_merge_targets(&[], 10.0).is_empty());
}

#[test]
fn merge_installs_parent_events() {
    let (mut d, a, b) = two_bands();
    let outcome = d.merge(&merge_at(vec![a, b], 100.0)).unwrap();
    assert_eq!(outcome.child, LineageId(2));

    let child = d.lineage(outcome.child).unwrap();
    assert_eq!(child.start(), Point::new(500.0, 100.0));
    assert_eq!(child.start_width(), 30.0);

    let pa = d.lineage(a).unwrap();
    assert_eq!(pa.end_x(), Some(500.0));
    assert_eq!(pa.shift_events()[0].target, ShiftTarget::Fixed(92.5));
    assert_eq!(pa.scale_events()[0].to_w, 15.0);
    let pb = d.lineage(b).unwrap();
    assert_eq!(pb.shift_events()[0].target, ShiftTarget::Fixed(107.5));
}

#[test]
fn merge_validates_before_touching_the_diagram() {
    let (mut d, a, b) = two_bands();
    assert!(d.merge(&merge_at(vec![], 100.0)).is_err());
    assert!(d.merge(&merge_at(vec![a, a], 100.0)).is_err());
    assert!(d.merge(&merge_at(vec![a, LineageId(9)], 100.0)).is_err());
    d.lineage_mut(b).unwrap().terminate_at(450.0).unwrap();
    let err = d.merge(&merge_at(vec![a, b], 100.0)).unwrap_err();
    assert!(err.to_string().contains("terminates before"));
    assert_eq!(d.lineages().len(), 2);
}

#[test]
fn failed_merge_rolls_back() {
    let (mut d, a, b) = two_bands();
    d.lineage_mut(b).unwrap().shift_to(450.0, 480.0, 0.0).unwrap();
    assert!(d.merge(&merge_at(vec![a, b], 100.0)).is_err());
    assert_eq!(d.lineages().len(), 2);
    let pa = d.lineage(a).unwrap();
    assert!(pa.shift_events().is_empty());
    assert!(pa.scale_events().is_empty());
    assert_eq!(pa.end_x(), None);
}

#[test]
fn merge_into_bundle_uses_dynamic_targets() {
    let mut d = Diagram::new(1000.0, 300.0, 100).unwrap();
    let lane = d.add_bundle(Point::new(0.0, 150.0), 4.0).unwrap();
    let resident = d.add_lineage_in_bundle("r", lane, 0.0, 10.0, 0.0).unwrap();
    let outsider = d.add_lineage("o", Point::new(0.0, 40.0), 10.0).unwrap();

    let outcome = d
        .merge(&MergeSpec {
            parents: vec![resident, outsider],
            from_x: 400.0,
            to_x: 500.0,
            color: "c".to_owned(),
            width: 24.0,
            placement: MergePlacement::InBundle { bundle: lane },
        })
        .unwrap();
    let child = outcome.child;

    let membership = d
        .bundle(lane)
        .unwrap()
        .memberships()
        .iter()
        .find(|m| m.lineage == child)
        .copied()
        .unwrap();
    assert_eq!(membership.start_x, 400.0);
    assert_eq!(membership.fade_in, 100.0);

    let leave = d.lineage(resident).unwrap().membership_events()[0];
    assert_eq!(leave.kind, MembershipKind::Leave);
    assert_eq!(
        leave.target,
        Some(ShiftTarget::Lineage {
            lineage: child,
            offset: outcome.targets[0].offset
        })
    );
    assert!(matches!(
        d.lineage(outsider).unwrap().shift_events()[0].target,
        ShiftTarget::Lineage { lineage, .. } if lineage == child
    ));

    let generated = d.generate(&GenerateOpts::default()).unwrap();
    assert_eq!(
        generated.segment_kinds(resident).unwrap(),
        [SegmentKind::Dependent, SegmentKind::Independent]
    );
    assert_eq!(
        generated.segment_kinds(outsider).unwrap(),
        [SegmentKind::Independent]
    );
    assert_eq!(
        generated.segment_kinds(child).unwrap(),
        [SegmentKind::Dependent]
    );
    // The child is alone in the lane once the parents are gone, so it sits on the centerline.
    let outline = generated.outline(child).unwrap();
    let last = outline.upper.last().unwrap();
    assert!((last.y - (150.0 - 12.0)).abs() < 1e-6);
}

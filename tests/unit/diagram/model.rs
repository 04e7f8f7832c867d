use super::*;

fn diagram() -> Diagram {
    Diagram::new(1000.0, 400.0, DEFAULT_RESOLUTION).unwrap()
}

#[test]
fn new_validates_view_and_resolution() {
    assert!(Diagram::new(0.0, 10.0, 10).is_err());
    assert!(Diagram::new(10.0, f64::NAN, 10).is_err());
    let err = Diagram::new(10.0, 10.0, 1).unwrap_err();
    assert!(err.to_string().contains("resolution must be >= 2"));
    let mut d = diagram();
    assert!(d.set_resolution(0).is_err());
    d.set_resolution(7).unwrap();
    assert_eq!(d.resolution(), 7);
}

#[test]
fn ids_follow_registration_order() {
    let mut d = diagram();
    let a = d.add_lineage("a", Point::new(0.0, 0.0), 1.0).unwrap();
    let b = d.add_lineage("b", Point::new(0.0, 0.0), 1.0).unwrap();
    let lane = d.add_bundle(Point::new(0.0, 0.0), 1.0).unwrap();
    assert_eq!((a, b, lane), (LineageId(0), LineageId(1), BundleId(0)));
    assert_eq!(d.lineage(b).unwrap().color(), "b");
    assert_eq!(d.bundle(lane).unwrap().end_x(), 1000.0);
    assert!(d.lineage(LineageId(5)).is_none());
}

#[test]
fn in_bundle_lineage_starts_on_the_bundle_baseline() {
    let mut d = diagram();
    let lane = d.add_bundle(Point::new(100.0, 200.0), 2.0).unwrap();
    d.bundle_mut(lane).unwrap().shift_to(200.0, 300.0, 250.0).unwrap();
    let id = d.add_lineage_in_bundle("m", lane, 400.0, 8.0, 50.0).unwrap();

    let l = d.lineage(id).unwrap();
    assert_eq!(l.initial_bundle(), Some(lane));
    assert!((l.start().y - 250.0).abs() < 1e-9);
    let m = d.bundle(lane).unwrap().memberships()[0];
    assert_eq!((m.start_x, m.fade_in, m.end_x), (350.0, 50.0, f64::INFINITY));

    assert!(d.add_lineage_in_bundle("m", lane, 120.0, 8.0, 50.0).is_err());
    assert!(d.add_lineage_in_bundle("m", BundleId(3), 400.0, 8.0, 0.0).is_err());
    assert!(d.add_lineage_in_bundle("m", lane, 400.0, 8.0, -1.0).is_err());
}

#[test]
fn join_registers_a_fading_membership() {
    let mut d = diagram();
    let lane = d.add_bundle(Point::new(100.0, 200.0), 2.0).unwrap();
    let id = d.add_lineage("a", Point::new(0.0, 0.0), 4.0).unwrap();
    assert!(d.lineage_mut(id).unwrap().join(50.0, 150.0, lane).is_err());
    assert!(d.lineage_mut(id).unwrap().join(150.0, 250.0, BundleId(9)).is_err());
    d.lineage_mut(id).unwrap().join(150.0, 250.0, lane).unwrap();

    let m = d.bundle(lane).unwrap().memberships()[0];
    assert_eq!((m.lineage, m.start_x, m.fade_in), (id, 150.0, 100.0));
}

#[test]
fn leave_closes_the_membership() {
    let mut d = diagram();
    let lane = d.add_bundle(Point::new(0.0, 200.0), 2.0).unwrap();
    let id = d.add_lineage("a", Point::new(0.0, 0.0), 4.0).unwrap();
    assert!(d.lineage_mut(id).unwrap().leave(100.0, 200.0, lane, 0.0).is_err());

    d.lineage_mut(id)
        .unwrap()
        .join(100.0, 200.0, lane)
        .unwrap()
        .leave(500.0, 600.0, lane, 20.0)
        .unwrap();
    let m = d.bundle(lane).unwrap().memberships()[0];
    assert_eq!((m.end_x, m.fade_out), (600.0, 100.0));
    assert_eq!(d.lineage(id).unwrap().membership_events().len(), 2);
}

#[test]
fn dynamic_targets_must_exist_and_differ() {
    let mut d = diagram();
    let a = d.add_lineage("a", Point::new(0.0, 0.0), 4.0).unwrap();
    let mut builder = d.lineage_mut(a).unwrap();
    assert!(builder.shift_to_lineage(10.0, 20.0, a, 0.0).is_err());
    assert!(builder.shift_to_lineage(10.0, 20.0, LineageId(4), 0.0).is_err());
    assert!(d.lineage_mut(LineageId(4)).is_err());
}

#[test]
fn terminate_clips_bundle_memberships() {
    let mut d = diagram();
    let lane = d.add_bundle(Point::new(0.0, 200.0), 2.0).unwrap();
    let id = d.add_lineage_in_bundle("m", lane, 0.0, 4.0, 0.0).unwrap();
    d.lineage_mut(id).unwrap().terminate_at(700.0).unwrap();
    assert_eq!(d.bundle(lane).unwrap().memberships()[0].end_x, 700.0);
    assert_eq!(d.lineage(id).unwrap().end_x(), Some(700.0));
    assert!(!d.bundle(lane).unwrap().has_member_at(id, 701.0));
}

#[test]
fn builder_rejects_shifts_that_would_not_be_drawn() {
    let mut d = diagram();
    let lane = d.add_bundle(Point::new(0.0, 200.0), 2.0).unwrap();
    let id = d.add_lineage("m", Point::new(0.0, 50.0), 4.0).unwrap();

    d.lineage_mut(id).unwrap().shift_to(100.0, 300.0, 150.0).unwrap();
    assert!(d.lineage_mut(id).unwrap().terminate_at(200.0).is_err());
    assert_eq!(d.lineage(id).unwrap().end_x(), None);

    let err = d.lineage_mut(id).unwrap().join(250.0, 350.0, lane).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
    assert!(d.bundle(lane).unwrap().memberships().is_empty());

    d.lineage_mut(id).unwrap().join(400.0, 500.0, lane).unwrap();
    assert!(d.lineage_mut(id).unwrap().shift_to(600.0, 700.0, 20.0).is_err());
    assert_eq!(d.lineage(id).unwrap().shift_events().len(), 1);
}

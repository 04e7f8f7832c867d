use super::*;

fn bundle() -> Bundle {
    Bundle::new(Point::new(0.0, 100.0), 4.0, 1000.0).unwrap()
}

#[test]
fn open_membership_runs_forever() {
    let m = BundleMembership::open(LineageId(0), 100.0, 50.0);
    assert!(m.contains(1e12));
    assert!(!m.contains(99.0));
    assert_eq!(m.presence_at(1e6), 1.0);
}

#[test]
fn presence_eases_in_and_out() {
    let m = BundleMembership {
        lineage: LineageId(0),
        start_x: 100.0,
        end_x: 500.0,
        fade_in: 100.0,
        fade_out: 50.0,
    };
    assert_eq!(m.presence_at(50.0), 0.0);
    assert_eq!(m.presence_at(100.0), 0.0);
    assert_eq!(m.presence_at(150.0), smootherstep(0.5));
    assert_eq!(m.presence_at(200.0), 1.0);
    assert_eq!(m.presence_at(300.0), 1.0);
    assert_eq!(m.presence_at(475.0), smootherstep(0.5));
    assert_eq!(m.presence_at(500.0), 0.0);
    assert_eq!(m.presence_at(501.0), 0.0);
}

#[test]
fn presence_is_continuous_where_fade_in_completes() {
    let m = BundleMembership::open(LineageId(0), 0.0, 80.0);
    let before = m.presence_at(80.0 - 1e-7);
    assert!((before - 1.0).abs() < 1e-9);
    assert_eq!(m.presence_at(80.0), 1.0);
}

#[test]
fn overlapping_fades_take_the_smaller_factor() {
    let m = BundleMembership {
        lineage: LineageId(0),
        start_x: 0.0,
        end_x: 100.0,
        fade_in: 80.0,
        fade_out: 80.0,
    };
    let x = 30.0;
    let expected = smootherstep(30.0 / 80.0).min(smootherstep(70.0 / 80.0));
    assert_eq!(m.presence_at(x), expected);
}

#[test]
fn new_rejects_bad_input() {
    assert!(Bundle::new(Point::new(0.0, f64::NAN), 1.0, 10.0).is_err());
    let err = Bundle::new(Point::new(0.0, 0.0), -1.0, 10.0).unwrap_err();
    assert!(err.to_string().contains("margin must be >= 0"));
}

#[test]
fn close_member_back_patches_the_open_membership() {
    let mut b = bundle();
    b.add_member(BundleMembership::open(LineageId(3), 100.0, 20.0));
    b.close_member(LineageId(3), 400.0, 450.0).unwrap();
    let m = b.memberships()[0];
    assert_eq!(m.end_x, 450.0);
    assert_eq!(m.fade_out, 50.0);
    assert!(b.has_member_at(LineageId(3), 450.0));
    assert!(!b.has_member_at(LineageId(3), 451.0));
}

#[test]
fn close_member_requires_membership() {
    let mut b = bundle();
    b.add_member(BundleMembership::open(LineageId(1), 100.0, 0.0));
    assert!(b.close_member(LineageId(2), 200.0, 300.0).is_err());
    assert!(b.close_member(LineageId(1), 50.0, 60.0).is_err());
}

#[test]
fn truncate_member_clips_fade_out() {
    let mut b = bundle();
    b.add_member(BundleMembership::open(LineageId(0), 100.0, 0.0));
    b.close_member(LineageId(0), 300.0, 400.0).unwrap();
    b.truncate_member(LineageId(0), 150.0);
    let m = b.memberships()[0];
    assert_eq!(m.end_x, 150.0);
    assert_eq!(m.fade_out, 50.0);
}

#[test]
fn edits_invalidate_the_solved_cache() {
    let mut b = bundle();
    b.solved = Some(SolvedBundle::default());
    b.shift_to(100.0, 200.0, 150.0).unwrap();
    assert!(b.solved().is_none());
}

#[test]
fn overlapping_bundle_shifts_are_rejected() {
    let mut b = bundle();
    b.shift_to(100.0, 200.0, 150.0).unwrap();
    assert!(b.shift_to(150.0, 250.0, 50.0).is_err());
    b.shift_to(200.0, 250.0, 50.0).unwrap();
}

#[test]
fn baseline_follows_bundle_shifts() {
    let mut b = bundle();
    b.shift_to(100.0, 200.0, 150.0).unwrap();
    let baseline = b.baseline();
    assert_eq!(baseline.pieces().last().map(|p| p.end()), Some(Point::new(1000.0, 150.0)));
    assert!((baseline.y_at(50.0).unwrap() - 100.0).abs() < 1e-9);
}

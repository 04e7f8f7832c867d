use super::*;

#[test]
fn endpoints_are_stable() {
    assert_eq!(smootherstep(0.0), 0.0);
    assert_eq!(smootherstep(1.0), 1.0);
    assert_eq!(smootherstep(0.5), 0.5);
}

#[test]
fn clamps_outside_unit_range() {
    for r in [-10.0, -1.0, -1e-9] {
        assert_eq!(smootherstep(r), 0.0);
    }
    for r in [1.0 + 1e-9, 2.0, 100.0] {
        assert_eq!(smootherstep(r), 1.0);
    }
}

#[test]
fn monotonic_on_unit_range() {
    let mut prev = smootherstep(0.0);
    for i in 1..=1000 {
        let v = smootherstep(f64::from(i) / 1000.0);
        assert!(v >= prev, "not monotonic at step {i}");
        prev = v;
    }
}

#[test]
fn flat_at_both_ends() {
    let h = 1e-4;
    let d0 = (smootherstep(h) - smootherstep(0.0)) / h;
    let d1 = (smootherstep(1.0) - smootherstep(1.0 - h)) / h;
    assert!(d0.abs() < 1e-6);
    assert!(d1.abs() < 1e-6);
}

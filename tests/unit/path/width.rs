use super::*;

#[test]
fn single_scale_event_profile() {
    let events = [ScaleEvent::new(100.0, 200.0, 20.0)];
    let w = WidthProfile::new(10.0, &events, None);
    assert_eq!(w.width_at(50.0), 10.0);
    assert_eq!(w.width_at(100.0), 10.0);
    assert_eq!(w.width_at(200.0), 20.0);
    let mid = w.width_at(150.0);
    assert!(mid > 10.0 && mid < 20.0);
    assert_eq!(mid, 10.0 + 10.0 * smootherstep(0.5));
}

#[test]
fn chained_events_carry_previous_width() {
    let events = [
        ScaleEvent::new(0.0, 10.0, 4.0),
        ScaleEvent::new(20.0, 30.0, 0.0),
    ];
    let w = WidthProfile::new(2.0, &events, None);
    assert_eq!(w.width_at(15.0), 4.0);
    assert_eq!(w.width_at(25.0), 2.0);
    assert_eq!(w.width_at(1000.0), 0.0);
}

#[test]
fn width_is_zero_past_the_end() {
    let w = WidthProfile::new(8.0, &[], Some(100.0));
    assert_eq!(w.width_at(100.0), 8.0);
    assert_eq!(w.width_at(100.0 + 1e-9), 0.0);
}

#[test]
fn width_is_continuous_across_event_boundaries() {
    let events = [ScaleEvent::new(100.0, 200.0, 20.0)];
    let w = WidthProfile::new(10.0, &events, None);
    let eps = 1e-7;
    assert!((w.width_at(100.0 + eps) - 10.0).abs() < 1e-9);
    assert!((w.width_at(200.0 - eps) - 20.0).abs() < 1e-9);
}

use super::*;

const SCENE: &str = r##"
{
  "view": { "width": 1200, "height": 400 },
  "resolution": 80,
  "bundles": [
    { "key": "lane", "start": [0, 200], "margin": 4,
      "shifts": [{ "from_x": 500, "to_x": 600, "to_y": 240 }] }
  ],
  "lineages": [
    { "key": "resident", "color": "#112233", "start_x": 0, "width": 12,
      "in_bundle": { "bundle": "lane" } },
    { "key": "mover", "color": "#445566", "start_x": 0, "start_y": 40, "width": 10,
      "memberships": [
        { "from_x": 900, "to_x": 1000, "bundle": "lane", "to": { "lineage": "follower", "offset": -20 } },
        { "from_x": 200, "to_x": 300, "bundle": "lane" }
      ] },
    { "key": "follower", "color": "#778899", "start_x": 0, "start_y": 360, "width": 8,
      "shifts": [{ "from_x": 100, "to_x": 200, "to": 320 }],
      "scales": [{ "from_x": 100, "to_x": 200, "to_w": 14 }] }
  ],
  "merges": [
    { "key": "joined", "color": "#aabbcc", "parents": ["resident", "follower"],
      "from_x": 1000, "to_x": 1100, "width": 30, "y": 300 }
  ]
}
"##;

#[test]
fn builds_entities_by_key() {
    let spec = DiagramSpec::from_json_str(SCENE).unwrap();
    assert_eq!(spec.resolution, 80);
    let built = spec.build().unwrap();
    let d = &built.diagram;
    assert_eq!(d.lineages().len(), 4);
    assert_eq!(built.lineages["joined"], LineageId(3));
    assert_eq!(built.bundles["lane"], BundleId(0));

    let mover = d.lineage(built.lineages["mover"]).unwrap();
    let events = mover.membership_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].from_x, 200.0);
    assert_eq!(
        events[1].target,
        Some(ShiftTarget::Lineage {
            lineage: built.lineages["follower"],
            offset: -20.0
        })
    );

    let follower = d.lineage(built.lineages["follower"]).unwrap();
    assert_eq!(follower.end_x(), Some(1100.0));
    assert_eq!(follower.scale_events().len(), 2);
}

#[test]
fn resolution_defaults_when_omitted() {
    let spec = DiagramSpec::from_json_str(r#"{ "view": { "width": 10, "height": 10 } }"#).unwrap();
    assert_eq!(spec.resolution, DEFAULT_RESOLUTION);
    assert!(spec.build().unwrap().diagram.lineages().is_empty());
}

#[test]
fn parse_errors_are_serde_errors() {
    let err = DiagramSpec::from_json_str("{ \"view\": 3 }").unwrap_err();
    assert!(matches!(err, LineageError::Serde(_)));
    let err = DiagramSpec::from_json_str(
        r#"{ "view": { "width": 10, "height": 10 }, "extra": true }"#,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

#[test]
fn unknown_keys_are_reported() {
    let json = r#"{
      "view": { "width": 100, "height": 100 },
      "lineages": [
        { "key": "a", "color": "red", "start_x": 0, "start_y": 0, "width": 1,
          "shifts": [{ "from_x": 10, "to_x": 20, "to": { "lineage": "ghost" } }] }
      ]
    }"#;
    let err = DiagramSpec::from_json_str(json).unwrap().build().unwrap_err();
    assert!(err.to_string().contains("unknown lineage key 'ghost'"));
}

#[test]
fn duplicate_keys_are_rejected() {
    let json = r#"{
      "view": { "width": 100, "height": 100 },
      "lineages": [
        { "key": "a", "color": "red", "start_x": 0, "start_y": 0, "width": 1 },
        { "key": "a", "color": "blue", "start_x": 0, "start_y": 5, "width": 1 }
      ]
    }"#;
    let err = DiagramSpec::from_json_str(json).unwrap().build().unwrap_err();
    assert!(err.to_string().contains("duplicate lineage key 'a'"));
}

#[test]
fn start_y_rules_depend_on_placement() {
    let missing = r#"{
      "view": { "width": 100, "height": 100 },
      "lineages": [{ "key": "a", "color": "red", "start_x": 0, "width": 1 }]
    }"#;
    let err = DiagramSpec::from_json_str(missing).unwrap().build().unwrap_err();
    assert!(err.to_string().contains("missing start_y"));

    let both = r#"{
      "view": { "width": 100, "height": 100 },
      "bundles": [{ "key": "b", "start": [0, 50] }],
      "lineages": [{ "key": "a", "color": "red", "start_x": 0, "start_y": 3, "width": 1,
                     "in_bundle": { "bundle": "b" } }]
    }"#;
    assert!(DiagramSpec::from_json_str(both).unwrap().build().is_err());
}

#[test]
fn event_errors_name_the_lineage() {
    let json = r#"{
      "view": { "width": 100, "height": 100 },
      "lineages": [
        { "key": "a", "color": "red", "start_x": 0, "start_y": 0, "width": 1,
          "scales": [{ "from_x": 10, "to_x": 20, "to_w": 2 }, { "from_x": 15, "to_x": 30, "to_w": 3 }] }
      ]
    }"#;
    let err = DiagramSpec::from_json_str(json).unwrap().build().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("lineage 'a'"), "{msg}");
    assert!(msg.contains("overlaps"), "{msg}");
}

#[test]
fn merge_needs_exactly_one_placement() {
    let json = r#"{
      "view": { "width": 100, "height": 100 },
      "lineages": [{ "key": "a", "color": "red", "start_x": 0, "start_y": 0, "width": 1 }],
      "merges": [{ "key": "m", "color": "c", "parents": ["a"], "from_x": 10, "to_x": 20, "width": 2 }]
    }"#;
    let err = DiagramSpec::from_json_str(json).unwrap().build().unwrap_err();
    assert!(err.to_string().contains("exactly one of 'y' or 'bundle'"));
}

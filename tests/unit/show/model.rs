use super::*;

fn sheet(name: &str, points: &[Coord], in_animation: bool) -> Sheet {
    Sheet {
        name: name.to_owned(),
        beats: 8,
        in_animation,
        points: points.iter().copied().map(SheetPoint::at).collect(),
        continuities: BTreeMap::new(),
    }
}

#[test]
fn validate_rejects_ragged_point_counts() {
    let show = Show {
        sheets: vec![
            sheet("1", &[Coord::ZERO, Coord::steps(2, 0)], true),
            sheet("2", &[Coord::ZERO], true),
        ],
    };
    let err = show.validate().unwrap_err();
    assert!(err.to_string().contains("expected 2"));
}

#[test]
fn next_animated_sheet_skips_excluded() {
    let show = Show {
        sheets: vec![
            sheet("1", &[Coord::ZERO], true),
            sheet("2", &[Coord::steps(1, 0)], false),
            sheet("3", &[Coord::steps(2, 0)], true),
        ],
    };
    assert_eq!(show.next_animated_sheet(0).map(|s| s.name.as_str()), Some("3"));
    assert!(show.next_animated_sheet(2).is_none());
    assert_eq!(show.animated_sheet_indices(), vec![0, 2]);
}

#[test]
fn reference_points_fall_back_to_position() {
    let mut p = SheetPoint::at(Coord::steps(3, 3));
    p.refs[1] = Some(Coord::steps(5, 5));
    assert_eq!(p.reference(0), Coord::steps(3, 3));
    assert_eq!(p.reference(1), Coord::steps(3, 3));
    assert_eq!(p.reference(2), Coord::steps(5, 5));
    assert_eq!(p.reference(9), Coord::steps(3, 3));
}

#[test]
fn json_defaults_fill_optional_fields() {
    let json = r#"{
        "sheets": [
            { "name": "a", "beats": 4, "points": [ { "position": { "x": 16, "y": 0 } } ] }
        ]
    }"#;
    let show = Show::from_json_str(json).unwrap();
    let s = &show.sheets[0];
    assert!(s.in_animation);
    assert!(s.continuities.is_empty());
    assert_eq!(s.points[0].symbol, SymbolClass::Plain);
    assert_eq!(s.points[0].refs, [None; NUM_REF_POINTS]);
}

#[test]
fn negative_beats_are_a_serde_error() {
    let json = r#"{ "sheets": [ { "name": "a", "beats": -1, "points": [] } ] }"#;
    let err = Show::from_json_str(json).unwrap_err();
    assert!(matches!(err, DrillError::Serde(_)));
}

#[test]
fn out_of_range_lookups_are_validation_errors() {
    let show = Show {
        sheets: vec![sheet("1", &[Coord::ZERO], true)],
    };
    assert!(matches!(show.sheet(1), Err(DrillError::Validation(_))));
    assert!(matches!(
        show.sheets[0].point(4),
        Err(DrillError::Validation(_))
    ));
}

#[test]
fn symbols_in_use_are_deduplicated() {
    let mut s = sheet("1", &[Coord::ZERO, Coord::steps(2, 0), Coord::steps(4, 0)], true);
    s.points[2].symbol = SymbolClass::X;
    let used: Vec<_> = s.symbols_in_use().into_iter().collect();
    assert_eq!(used, vec![SymbolClass::Plain, SymbolClass::X]);
}

#[test]
fn validate_rejects_positions_beyond_the_limit() {
    let mut show = Show {
        sheets: vec![sheet("1", &[Coord::new(Coord::LIMIT, 0)], true)],
    };
    assert!(show.validate().is_ok());

    show.sheets[0].points[0].refs[2] = Some(Coord::new(0, -Coord::LIMIT - 1));
    let err = show.validate().unwrap_err();
    assert!(matches!(err, DrillError::Validation(_)));

    show.sheets[0].points[0].refs[2] = None;
    show.sheets[0].points[0].position = Coord::new(i32::MIN, 0);
    assert!(show.validate().is_err());
}

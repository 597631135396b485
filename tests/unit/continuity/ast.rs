use super::*;

#[test]
fn var_slots_index_densely() {
    for (i, slot) in VarSlot::ALL.iter().enumerate() {
        assert_eq!(slot.index(), i);
    }
    assert_eq!(VarSlot::Dof.name(), "DOF");
}

#[test]
fn compass_constants_follow_math_convention() {
    assert_eq!(DefinedValue::E.value(), 0.0);
    assert_eq!(DefinedValue::N.value(), 90.0);
    assert_eq!(DefinedValue::W.value(), 180.0);
    assert_eq!(DefinedValue::S.value(), 270.0);
    assert!((DefinedValue::M.value() - 4.0 / 3.0).abs() < 1e-12);
}

#[test]
fn procedures_print_as_continuity_text() {
    let p = Procedure::new(ProcKind::MarkTime {
        beats: ContValue::Float(8.0),
        dir: DefinedValue::E.into(),
    });
    assert_eq!(p.to_string(), "MT 8 E");

    let p = Procedure::new(ProcKind::Rotate {
        angle: 90.into(),
        steps: ContValue::Rem,
        center: ContPoint::Ref(2),
        backwards: true,
    });
    assert_eq!(p.to_string(), "ROTATE BACK 90 REM R2");
}

#[test]
fn procedures_deserialize_from_json() {
    let json = r#"{"kind":{"even":{"steps":{"float":4.0},"point":"next"}},"loc":{"line":3,"col":1}}"#;
    let p: Procedure = serde_json::from_str(json).unwrap();
    assert_eq!(p.loc, Some(SourceLoc { line: 3, col: 1 }));
    assert_eq!(
        p.kind,
        ProcKind::Even {
            steps: ContValue::Float(4.0),
            point: ContPoint::Next,
        }
    );
}

#[test]
fn missing_location_is_omitted() {
    let p = Procedure::new(ProcKind::Blam);
    let s = serde_json::to_string(&p).unwrap();
    assert!(!s.contains("loc"));
}

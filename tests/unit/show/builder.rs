use super::*;
use crate::continuity::dsl::{E, mt};

#[test]
fn builds_a_validated_show() {
    let s1 = SheetBuilder::new("1", 8)
        .point(Coord::ZERO)
        .point_with_symbol(Coord::steps(2, 0), SymbolClass::X)
        .continuity(SymbolClass::Plain, [mt(8, E)])
        .unwrap()
        .build()
        .unwrap();
    let s2 = SheetBuilder::new("2", 4)
        .point(Coord::ZERO)
        .point(Coord::steps(2, 0))
        .build()
        .unwrap();
    let show = ShowBuilder::new().sheet(s1).sheet(s2).build().unwrap();
    assert_eq!(show.num_points(), 2);
    assert_eq!(show.sheets[0].points[1].symbol, SymbolClass::X);
    assert_eq!(show.sheets[0].continuity(SymbolClass::Plain).map(<[_]>::len), Some(1));
    assert!(show.sheets[0].continuity(SymbolClass::X).is_none());
}

#[test]
fn rejects_duplicate_continuity() {
    let res = SheetBuilder::new("1", 8)
        .continuity(SymbolClass::Sol, [mt(8, E)])
        .unwrap()
        .continuity(SymbolClass::Sol, []);
    assert!(res.is_err());
}

#[test]
fn reference_index_is_checked() {
    let b = SheetBuilder::new("1", 8).point(Coord::ZERO);
    assert!(b.reference(0, 4, Coord::ZERO).is_err());

    let b = SheetBuilder::new("1", 8).point(Coord::ZERO);
    assert!(b.reference(1, 1, Coord::ZERO).is_err());

    let sheet = SheetBuilder::new("1", 8)
        .point(Coord::ZERO)
        .reference(0, 3, Coord::steps(1, 1))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(sheet.points[0].reference(3), Coord::steps(1, 1));
}

#[test]
fn show_builder_rejects_mismatched_rosters() {
    let s1 = SheetBuilder::new("1", 8).point(Coord::ZERO).build().unwrap();
    let s2 = SheetBuilder::new("2", 8).build().unwrap();
    assert!(ShowBuilder::new().sheet(s1).sheet(s2).build().is_err());
}

#[test]
fn blank_names_are_rejected() {
    assert!(SheetBuilder::new("  ", 8).build().is_err());
}

use super::*;

#[test]
fn bound_direction_wraps_both_ways() {
    assert_eq!(bound_direction(0.0), 0.0);
    assert_eq!(bound_direction(360.0), 0.0);
    assert_eq!(bound_direction(-90.0), 270.0);
    assert_eq!(bound_direction(810.0), 90.0);
}

#[test]
fn signed_bound_is_half_open() {
    assert_eq!(bound_direction_signed(180.0), -180.0);
    assert_eq!(bound_direction_signed(270.0), -90.0);
    assert_eq!(bound_direction_signed(-45.0), -45.0);
}

#[test]
fn diagonals_are_detected() {
    assert!(is_diagonal_direction(45.0));
    assert!(is_diagonal_direction(-45.0));
    assert!(is_diagonal_direction(495.0));
    assert!(!is_diagonal_direction(90.0));
    assert!(!is_diagonal_direction(44.0));
}

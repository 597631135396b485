use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DrillError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DrillError::compile("x")
            .to_string()
            .contains("compile error:")
    );
    assert!(
        DrillError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        DrillError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DrillError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

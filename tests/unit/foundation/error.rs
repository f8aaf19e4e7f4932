use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BoothError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(BoothError::encode("x").to_string().contains("encode error:"));
    assert_eq!(
        BoothError::decode(2, "truncated").to_string(),
        "failed to decode image #2: truncated"
    );
}

#[test]
fn invalid_transition_names_state_and_input() {
    let err = BoothError::InvalidTransition {
        from: SessionStatus::Idle,
        input: "captured",
    };
    let s = err.to_string();
    assert!(s.contains("captured"));
    assert!(s.contains("Idle"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BoothError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

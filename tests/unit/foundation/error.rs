use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        ReelError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(ReelError::asset("x").to_string().contains("asset error:"));
    assert!(ReelError::sink("x").to_string().contains("sink error:"));
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

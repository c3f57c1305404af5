use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MemeError::image_load("x")
            .to_string()
            .contains("image load error:")
    );
    assert!(MemeError::encode("x").to_string().contains("encode error:"));
    assert!(
        MemeError::optimize("x")
            .to_string()
            .contains("optimize error:")
    );
    assert!(
        MemeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MemeError::font("x").to_string().contains("font error:"));
    assert!(MemeError::storage("x").to_string().contains("storage error:"));
    assert!(
        MemeError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(MemeError::not_found("x").to_string().contains("not found:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MemeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

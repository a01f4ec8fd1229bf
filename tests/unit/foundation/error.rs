use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ToonError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ToonError::render("x").to_string().contains("render error:"));
    assert!(ToonError::encode("x").to_string().contains("encode error:"));
    assert!(ToonError::config("x").to_string().contains("config error:"));
}

#[test]
fn empty_script_reads_like_the_alert() {
    assert_eq!(
        ToonError::EmptyScript.to_string(),
        "Please enter a script for your video!"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ToonError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

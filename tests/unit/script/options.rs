use super::*;

#[test]
fn ids_round_trip_through_serde() {
    for style in AnimationStyle::ALL {
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, format!("\"{}\"", style.id()));
    }
    let v: VoiceStyle = serde_json::from_str("\"kid\"").unwrap();
    assert_eq!(v, VoiceStyle::Kid);
}

#[test]
fn defaults_match_initial_selection() {
    assert_eq!(AnimationStyle::default(), AnimationStyle::Cartoon);
    assert_eq!(VoiceStyle::default(), VoiceStyle::Friendly);
}

#[test]
fn details_summarize_selection() {
    let script = Script::parse("one two three four five six seven");
    let d = VideoDetails::new(
        &script,
        AnimationStyle::Pixar,
        VoiceStyle::Energetic,
        Canvas::default(),
    );
    assert_eq!(d.style, "Pixar 3D");
    assert_eq!(d.voice, "Energetic Host");
    assert_eq!(d.duration_secs, 3);
    assert_eq!(d.format, "Animated Canvas (800x600)");

    let text = d.to_string();
    assert!(text.contains("Duration: ~3 seconds"));
    assert!(text.ends_with("Format: Animated Canvas (800x600)"));
}

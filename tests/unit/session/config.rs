use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = SlideshowConfig::default();
    assert_eq!(cfg.fps, 30);
    assert_eq!(cfg.duration_secs, 10.0);
    assert_eq!(cfg.frame_size, None);
    assert!(cfg.durations.is_empty());
    assert!(cfg.effects.is_empty());
    assert_eq!(cfg.unknown_effects, UnknownEffectPolicy::Fail);
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = SlideshowConfig::from_json_str(
        r#"{
            "images": ["a.png", "b.png"],
            "duration_secs": 4,
            "effects": { "a.png": ["zoom", "vignette"] },
            "unknown_effects": "passthrough"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.images, vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
    assert_eq!(cfg.fps, 30);
    assert_eq!(cfg.duration_secs, 4.0);
    assert_eq!(cfg.effects[Path::new("a.png")], vec!["zoom", "vignette"]);
    assert_eq!(cfg.unknown_effects, UnknownEffectPolicy::Passthrough);
    cfg.validate().unwrap();
}

#[test]
fn json_rejects_unknown_fields() {
    let err = SlideshowConfig::from_json_str(r#"{"images": ["a.png"], "speed": 2}"#).unwrap_err();
    assert!(matches!(err, SlideError::Validation(_)));
}

#[test]
fn validate_rejects_unrenderable_configs() {
    assert!(SlideshowConfig::default().validate().is_err());

    let base = SlideshowConfig::new(["a.png"]);
    assert!(base.clone().with_fps(0).validate().is_err());
    assert!(base.clone().with_duration_secs(0.0).validate().is_err());
    assert!(base.clone().with_duration_secs(-1.0).validate().is_err());
    assert!(base.clone().with_duration_secs(f64::NAN).validate().is_err());
    assert!(base.clone().with_duration("a.png", -0.5).validate().is_err());

    let mut zero_size = base.clone();
    zero_size.frame_size = Some(FrameSize {
        width: 0,
        height: 10,
    });
    assert!(zero_size.validate().is_err());

    base.validate().unwrap();
}

#[test]
fn unmatched_override_keys_are_reported() {
    let cfg = SlideshowConfig::new(["a.png", "b.png"])
        .with_duration("a.png", 1.0)
        .with_duration("ghost.png", 1.0)
        .with_effects("other.png", ["zoom"]);
    let keys = cfg.unmatched_override_keys();
    assert_eq!(keys, vec![Path::new("ghost.png"), Path::new("other.png")]);
}

#[test]
fn policy_parses_case_insensitively() {
    assert_eq!(
        "Passthrough".parse::<UnknownEffectPolicy>().unwrap(),
        UnknownEffectPolicy::Passthrough
    );
    assert_eq!("fail".parse::<UnknownEffectPolicy>().unwrap(), UnknownEffectPolicy::Fail);
    assert!("ignore".parse::<UnknownEffectPolicy>().is_err());
}

#[test]
fn render_opts_reject_zero_threads() {
    assert!(RenderOpts::default().validate().is_ok());
    let opts = RenderOpts {
        threads: Some(0),
        ..RenderOpts::default()
    };
    assert!(opts.validate().is_err());
    let opts = RenderOpts {
        chunk_size: 0,
        ..RenderOpts::default()
    };
    assert_eq!(opts.normalized_chunk_size(), 1);
}

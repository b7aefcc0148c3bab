use super::*;

const MINIMAL: &str = r##"{
    "run": { "size": { "width": 4, "height": 2 }, "first_frame": 1, "last_frame": 3 },
    "sources": {
        "red": { "kind": "color", "color": "red" },
        "white_mask": { "kind": "color", "color": [255, 255, 255], "format": "L" },
        "bike": { "kind": "sequence", "template": "bike/bike_%04d.png", "mask": { "invert": true } }
    },
    "sections": [{
        "name": "act1",
        "keepers": ["k"],
        "effects": [
            { "type": "mask", "frames": [1, 4], "foreground": "red", "background": "red",
              "mask": { "keeper": "k", "invert": true }, "output": "k" },
            { "type": "pixel_swap", "frames": [1, 4], "input": "k", "replacement": "#00ff00",
              "target": "red", "threshold": 12.5, "drift": { "change": 40 }, "output": "k" },
            { "type": "commit", "frames": [1, 4], "input": "k" }
        ]
    }]
}"##;

#[test]
fn parses_sources_sections_and_effects() {
    let script = Script::from_reader(MINIMAL.as_bytes()).unwrap();
    assert_eq!(script.run().size, Size::new(4, 2));
    assert_eq!(script.run().frame_range().unwrap().len_frames(), 3);
    assert!(script.run().output.is_none());

    let def = script.def();
    match &def.sources["white_mask"] {
        SourceDef::Color { color, format } => {
            assert_eq!(*color, Rgb8::WHITE);
            assert_eq!(*format, PixelFormat::Luma8);
        }
        other => panic!("unexpected source {other:?}"),
    }
    match &def.sources["bike"] {
        SourceDef::Sequence { mask: Some(m), .. } => {
            assert!(m.invert);
            assert_eq!(m.format, PixelFormat::Luma8);
        }
        other => panic!("unexpected source {other:?}"),
    }

    let effects = &def.sections[0].effects;
    assert_eq!(effects.len(), 3);
    match &effects[0] {
        EffectDef::Mask {
            mask: InputDef::KeeperMask { keeper, invert, format },
            ..
        } => {
            assert_eq!(keeper, "k");
            assert!(*invert);
            assert_eq!(*format, PixelFormat::Luma8);
        }
        other => panic!("unexpected effect {other:?}"),
    }
    match &effects[1] {
        EffectDef::PixelSwap { drift: Some(d), replacement, .. } => {
            assert_eq!(d.tween, TweenKind::Linear);
            assert_eq!(d.change, 40.0);
            assert_eq!(*replacement, Rgb8::new(0, 255, 0));
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert_eq!(effects[2].frames().unwrap().len_frames(), 3);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Script::from_reader("{ \"run\": 3 }".as_bytes()).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));

    let unknown = r#"{ "run": { "size": { "width": 1, "height": 1 }, "first_frame": 1,
        "last_frame": 1, "fps": 30 } }"#;
    assert!(Script::from_reader(unknown.as_bytes()).is_err());
}

#[test]
fn empty_effect_frames_are_rejected() {
    let json = r#"{ "type": "commit", "frames": [5, 5], "input": "k" }"#;
    let def: EffectDef = serde_json::from_str(json).unwrap();
    assert!(matches!(def.frames(), Err(ReelError::Configuration(_))));
}

#[test]
fn missing_script_file_is_reported() {
    let err = Script::from_path("no/such/script.json").unwrap_err();
    assert!(err.to_string().contains("no/such/script.json"));
}

#[test]
fn relative_paths_resolve_against_script_dir() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_script_model");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("script.json");
    std::fs::write(&path, MINIMAL).unwrap();

    let script = Script::from_path(&path).unwrap();
    assert_eq!(script.base_dir(), dir.as_path());
    assert_eq!(script.resolve("a.png"), dir.join("a.png"));
}

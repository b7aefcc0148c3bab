use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::color::Rgb8;

fn script(json: &str) -> Script {
    Script::from_reader(json.as_bytes()).unwrap()
}

const RED_OVER_BLACK: &str = r#"{
    "run": { "size": { "width": 3, "height": 2 }, "first_frame": 1, "last_frame": 4 },
    "sources": {
        "red": { "kind": "color", "color": "red" },
        "black": { "kind": "color", "color": "black" },
        "opaque": { "kind": "color", "color": "white", "format": "luma8" }
    },
    "sections": [{
        "name": "only",
        "keepers": ["canvas"],
        "effects": [
            { "type": "mask", "frames": [2, 5], "foreground": "red", "background": "black",
              "mask": "opaque", "output": "canvas" },
            { "type": "commit", "frames": [2, 5], "input": "canvas" }
        ]
    }]
}"#;

#[test]
fn build_attaches_effects_in_script_order() {
    let controller = Director::new(script(RED_OVER_BLACK)).build().unwrap();
    let names: Vec<_> = controller
        .effects()
        .iter()
        .map(|e| e.kind().name())
        .collect();
    assert_eq!(names, vec!["mask", "commit"]);
    assert_eq!(controller.size(), Size::new(3, 2));
}

#[test]
fn run_reports_fallback_and_committed_frames() {
    let director = Director::new(script(RED_OVER_BLACK));
    let mut sink = InMemorySink::new();
    let stats = director.run(&mut sink).unwrap();
    assert_eq!(stats.frames_written, 4);
    assert_eq!(stats.frames_fallback, 1);
    assert_eq!(stats.frames_committed, 3);

    let frames = sink.frames();
    assert_eq!(frames[0].1.pixel(0, 0), Rgb8::WHITE);
    assert!(frames[1..].iter().all(|(_, f)| f.pixel(2, 1) == Rgb8::new(255, 0, 0)));
}

#[test]
fn unknown_names_are_configuration_errors_with_location() {
    let json = RED_OVER_BLACK.replace("\"foreground\": \"red\"", "\"foreground\": \"blue\"");
    let err = Director::new(script(&json)).build().unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, ReelError::Configuration(_)));
    assert!(msg.contains("section 'only' effect 0"), "{msg}");
    assert!(msg.contains("'blue'"), "{msg}");
}

#[test]
fn keeper_and_source_names_must_be_unique() {
    let json = RED_OVER_BLACK.replace("\"keepers\": [\"canvas\"]", "\"keepers\": [\"red\"]");
    let err = Director::new(script(&json)).build().unwrap_err();
    assert!(err.to_string().contains("already in use"));
}

#[test]
fn reading_a_keeper_before_its_producer_fails_to_build() {
    let json = r#"{
        "run": { "size": { "width": 1, "height": 1 }, "first_frame": 1, "last_frame": 2 },
        "sources": { "white": { "kind": "color", "color": "white" } },
        "sections": [{
            "name": "backwards",
            "keepers": ["k"],
            "effects": [
                { "type": "commit", "frames": [1, 3], "input": "k" },
                { "type": "color_scale", "frames": [1, 3], "input": "white",
                  "background": "pink", "foreground": "black", "output": "k" }
            ]
        }]
    }"#;
    let err = Director::new(script(json)).build().unwrap_err();
    assert!(matches!(err, ReelError::Configuration(_)));
}

#[test]
fn committed_frame_can_feed_a_later_section() {
    let json = r#"{
        "run": { "size": { "width": 2, "height": 2 }, "first_frame": 1, "last_frame": 2 },
        "sources": { "white": { "kind": "color", "color": "white" } },
        "sections": [
            { "name": "a", "keepers": ["duo"], "effects": [
                { "type": "color_scale", "frames": [1, 3], "input": "white",
                  "background": "yellow", "foreground": "black", "output": "duo" },
                { "type": "commit", "frames": [1, 3], "input": "duo" }
            ]},
            { "name": "b", "keepers": ["swapped"], "effects": [
                { "type": "pixel_swap", "frames": [1, 3], "input": "@frame",
                  "replacement": "blue", "target": "yellow", "threshold": 5, "output": "swapped" },
                { "type": "commit", "frames": [1, 3], "input": "swapped" }
            ]}
        ]
    }"#;
    let mut sink = InMemorySink::new();
    Director::new(script(json)).run(&mut sink).unwrap();
    assert!(
        sink.frames()
            .iter()
            .all(|(_, f)| f.pixel(1, 1) == Rgb8::new(0, 0, 255))
    );
}

#[test]
fn render_png_needs_an_output_template() {
    let director = Director::new(script(RED_OVER_BLACK));
    assert!(matches!(
        director.render_png(None),
        Err(ReelError::Configuration(_))
    ));

    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_director_png");
    let _ = std::fs::remove_dir_all(&dir);
    let template = format!("{}/f_%02d.png", dir.display());
    let stats = director.render_png(Some(&template)).unwrap();
    assert_eq!(stats.frames_written, 4);
    assert!(dir.join("f_01.png").exists());
    assert!(dir.join("f_04.png").exists());
}

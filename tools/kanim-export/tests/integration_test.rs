//! Integration tests for kanim-export
//!
//! Tests the full pipeline: generate containers -> run the binary -> verify output


use std::path::Path;
use std::process::{Command, Output};

use generate_test_assets::{BODY, HAT};
use tempfile::tempdir;

fn kanim_export(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kanim-export"))
        .args(args)
        .output()
        .expect("Failed to run kanim-export")
}

fn run_ok(args: &[&str]) -> String {
    let output = kanim_export(args);
    assert!(
        output.status.success(),
        "kanim-export {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is not UTF-8")
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

const MINIMAL_SCML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<spriter_data scml_version=\"1.0\" generator=\"BrashMonkey Spriter\" generator_version=\"b5\">\n",
    "\t<folder id=\"0\" name=\"body\">\n",
    "\t\t<file id=\"0\" name=\"body/body-0.png\" width=\"10\" height=\"10\" pivot_x=\"0.5\" pivot_y=\"0.5\" />\n",
    "\t\t<file id=\"1\" name=\"body/body-1.png\" width=\"10\" height=\"10\" pivot_x=\"0.5\" pivot_y=\"0.5\" />\n",
    "\t</folder>\n",
    "\t<entity id=\"0\" name=\"minimal\">\n",
    "\t\t<animation id=\"0\" name=\"idle\" length=\"25\">\n",
    "\t\t\t<mainline>\n",
    "\t\t\t\t<key id=\"0\" time=\"0\">\n",
    "\t\t\t\t\t<object_ref id=\"0\" name=\"body\" abs_x=\"0\" abs_y=\"0\" abs_pivot_x=\"0.5\" abs_pivot_y=\"0.5\" abs_angle=\"0\" abs_scale_x=\"1\" abs_scale_y=\"1\" abs_a=\"1\" timeline=\"0\" z_index=\"1\" />\n",
    "\t\t\t\t</key>\n",
    "\t\t\t\t<key id=\"1\" time=\"25\">\n",
    "\t\t\t\t\t<object_ref id=\"0\" name=\"body\" abs_x=\"0\" abs_y=\"0\" abs_pivot_x=\"0.5\" abs_pivot_y=\"0.5\" abs_angle=\"0\" abs_scale_x=\"1\" abs_scale_y=\"1\" abs_a=\"1\" timeline=\"0\" z_index=\"1\" />\n",
    "\t\t\t\t</key>\n",
    "\t\t\t</mainline>\n",
    "\t\t\t<timeline id=\"0\" name=\"80\" data-zIndex=\"0\" data-hash=\"80\">\n",
    "\t\t\t\t<key id=\"0\" time=\"0\" spin=\"1\">\n",
    "\t\t\t\t\t<object folder=\"0\" file=\"0\" x=\"3\" y=\"-4\" scale_x=\"1\" scale_y=\"1\" angle=\"0\" />\n",
    "\t\t\t\t</key>\n",
    "\t\t\t\t<key id=\"1\" time=\"25\" spin=\"1\">\n",
    "\t\t\t\t\t<object folder=\"0\" file=\"0\" x=\"3\" y=\"-4\" scale_x=\"1\" scale_y=\"1\" angle=\"0\" />\n",
    "\t\t\t\t</key>\n",
    "\t\t\t</timeline>\n",
    "\t\t</animation>\n",
    "\t</entity>\n",
    "</spriter_data>",
);

#[test]
fn test_scml_golden() {
    let dir = tempdir().expect("Failed to create temp dir");
    let anim = dir.path().join("anim.bin");
    let build = dir.path().join("build.bin");
    let scml = dir.path().join("out").join("idle.scml");

    generate_test_assets::generate_bank(&anim, BODY).unwrap();
    generate_test_assets::generate_build(&build, "atlas-0.tex").unwrap();

    let stdout = run_ok(&["scml", s(&anim), s(&build), "-o", s(&scml)]);
    assert!(!stdout.contains("Missing"), "{}", stdout);

    let text = std::fs::read_to_string(&scml).expect("Failed to read scml");
    assert_eq!(text, MINIMAL_SCML);
}

#[test]
fn test_scml_default_output_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let anim = dir.path().join("wilson.bin");
    let build = dir.path().join("build.bin");
    generate_test_assets::generate_bank(&anim, BODY).unwrap();
    generate_test_assets::generate_build(&build, "atlas-0.tex").unwrap();

    run_ok(&["scml", s(&anim), s(&build)]);
    assert!(dir.path().join("wilson.scml").exists());
}

#[test]
fn test_scml_missing_symbol_placeholders() {
    let dir = tempdir().expect("Failed to create temp dir");
    let anim = dir.path().join("anim.bin");
    let build = dir.path().join("build.bin");
    let scml = dir.path().join("hat.scml");
    let images = dir.path().join("images");

    generate_test_assets::generate_bank(&anim, HAT).unwrap();
    generate_test_assets::generate_build(&build, "atlas-0.tex").unwrap();

    let stdout = run_ok(&[
        "scml",
        s(&anim),
        s(&build),
        "-o",
        s(&scml),
        "--placeholders",
        s(&images),
    ]);
    assert!(stdout.contains("Missing Symbols:"), "{}", stdout);
    assert!(stdout.contains("hat (2): 0"), "{}", stdout);

    let placeholder = image::open(images.join("hat").join("hat-0.png"))
        .expect("Failed to open placeholder")
        .to_rgba8();
    assert_eq!(placeholder.dimensions(), (1, 1));
    assert_eq!(placeholder.get_pixel(0, 0).0, [0, 0, 0, 0]);

    let text = std::fs::read_to_string(&scml).unwrap();
    assert!(text.contains(
        "\t<folder id=\"1\" name=\"hat\">\n\t\t<file id=\"0\" name=\"hat/hat-0.png\" width=\"0\" height=\"0\" pivot_x=\"0\" pivot_y=\"0\" />"
    ));
    assert!(text.contains("abs_pivot_x=\"0\" abs_pivot_y=\"0\""));
    assert!(text.contains("<object folder=\"1\" file=\"0\""));
}

#[test]
fn test_texture_to_png() {
    let dir = tempdir().expect("Failed to create temp dir");
    let tex = dir.path().join("atlas-0.tex");
    let png = dir.path().join("atlas.png");
    let small = dir.path().join("small.png");
    generate_test_assets::generate_texture(&tex).unwrap();

    run_ok(&["texture", s(&tex), "-o", s(&png)]);
    let image = image::open(&png).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (8, 8));
    assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(7, 7).0, [0, 0, 255, 255]);

    run_ok(&["texture", s(&tex), "-o", s(&small), "--mip", "1"]);
    let image = image::open(&small).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (4, 4));
    assert_eq!(image.get_pixel(2, 2).0, [0, 255, 0, 255]);

    // Only two mips
    assert!(!kanim_export(&["texture", s(&tex), "--mip", "5"]).status.success());
}

#[test]
fn test_extract_frames() {
    let dir = tempdir().expect("Failed to create temp dir");
    let build = dir.path().join("build.bin");
    let out = dir.path().join("frames");
    generate_test_assets::generate_build(&build, "atlas-0.tex").unwrap();
    generate_test_assets::generate_texture(&dir.path().join("atlas-0.tex")).unwrap();

    run_ok(&["frames", s(&build), "-o", s(&out)]);

    let frame = image::open(out.join("body").join("body-0.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(frame.dimensions(), (4, 8));
    assert!(frame.pixels().all(|p| p.0 == [255, 0, 0, 255]));
    // Frame 1 has no triangles
    assert!(!out.join("body").join("body-1.png").exists());
}

#[test]
fn test_inspect_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let build = dir.path().join("build.bin");
    let tex = dir.path().join("atlas.tex");
    generate_test_assets::generate_build(&build, "atlas-0.tex").unwrap();
    generate_test_assets::generate_texture(&tex).unwrap();

    let json: serde_json::Value = serde_json::from_str(&run_ok(&["inspect", s(&build)])).unwrap();
    assert_eq!(json["name"], "minimal");
    assert_eq!(json["atlases"][0], "atlas-0.tex");
    assert_eq!(json["symbols"][0]["frames"][0]["atlas_depth"], 0);
    assert_eq!(json["hashes"]["1"], "body");

    let json: serde_json::Value = serde_json::from_str(&run_ok(&["inspect", s(&tex)])).unwrap();
    assert_eq!(json["header"]["pixel_format"], "Dxt5");
    assert_eq!(json["mips"][1]["width"], 4);

    let junk = dir.path().join("junk.bin");
    std::fs::write(&junk, b"nope").unwrap();
    assert!(!kanim_export(&["inspect", s(&junk)]).status.success());
}

#[test]
fn test_manifest_build_and_check() {
    let dir = tempdir().expect("Failed to create temp dir");
    generate_test_assets::generate_bank(&dir.path().join("anim.bin"), HAT).unwrap();
    generate_test_assets::generate_build(&dir.path().join("build.bin"), "atlas-0.tex").unwrap();
    generate_test_assets::generate_texture(&dir.path().join("atlas-0.tex")).unwrap();

    let manifest = dir.path().join("assets.toml");
    std::fs::write(
        &manifest,
        r#"
[output]
dir = "export"

[animations.wilson]
anim = "anim.bin"
build = "build.bin"
placeholders = true

[textures]
atlas = { path = "atlas-0.tex", mip = 1 }
"#,
    )
    .unwrap();

    run_ok(&["check", s(&manifest)]);
    run_ok(&["build", s(&manifest)]);

    let export = dir.path().join("export");
    assert!(export.join("wilson").join("wilson.scml").exists());
    assert!(export.join("wilson").join("hat").join("hat-0.png").exists());
    let atlas = image::open(export.join("atlas.png")).unwrap();
    assert_eq!((atlas.width(), atlas.height()), (4, 4));

    std::fs::remove_file(dir.path().join("build.bin")).unwrap();
    assert!(!kanim_export(&["check", s(&manifest)]).status.success());
}

#[test]
fn test_wrong_container_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let tex = dir.path().join("atlas.tex");
    let build = dir.path().join("build.bin");
    generate_test_assets::generate_texture(&tex).unwrap();
    generate_test_assets::generate_build(&build, "atlas-0.tex").unwrap();

    let output = kanim_export(&["scml", s(&tex), s(&build)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ANIM"));
}

use std::path::PathBuf;

use holofoil::{Layout, SceneConfig};

#[test]
fn frame_subcommand_writes_a_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let scene_path = dir.join("scene.json");
    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);

    let config = SceneConfig::sample(Layout::Single);
    let f = std::fs::File::create(&scene_path).unwrap();
    serde_json::to_writer_pretty(f, &config).unwrap();

    let exe = std::env::var_os("CARGO_BIN_EXE_holofoil")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "holofoil.exe"
            } else {
                "holofoil"
            });
            p
        });

    let scene_arg = scene_path.to_string_lossy().to_string();
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(exe)
        .args([
            "frame",
            "--in",
            scene_arg.as_str(),
            "--pointer-x",
            "240",
            "--pointer-y",
            "260",
            "--time",
            "1.0",
            "--holo",
            "--out",
        ])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_path.exists());

    let img = image::open(&out_path).unwrap();
    assert_eq!(img.width(), 400);
    assert_eq!(img.height(), 600);
}

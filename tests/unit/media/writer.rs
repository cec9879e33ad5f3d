use super::*;

fn base_config() -> EncodeConfig {
    default_mp4_config("out/clip.mp4", 1080, 1920, 30)
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(base_config().validate().is_ok());

    let mut cfg = base_config();
    cfg.width = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = base_config();
    cfg.height = 1919; // odd, incompatible with yuv420p
    assert!(cfg.validate().is_err());

    let mut cfg = base_config();
    cfg.fps = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = base_config();
    cfg.codec = String::new();
    assert!(cfg.validate().is_err());
}

#[test]
fn default_config_targets_software_h264() {
    let cfg = base_config();
    assert_eq!(cfg.codec, "libx264");
    assert!(cfg.overwrite);
    assert_eq!(cfg.out_path, PathBuf::from("out/clip.mp4"));
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let dir = std::env::temp_dir().join("verdite_writer_test");
    let _ = std::fs::remove_dir_all(&dir);
    let out = dir.join("nested/clip.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(out.parent().unwrap().is_dir());
    let _ = std::fs::remove_dir_all(&dir);
}

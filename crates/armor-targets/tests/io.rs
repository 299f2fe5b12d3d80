use armor_targets::{
    AimConfig, AimPipeline, FrameReport, PolicyArgs, SelectionPolicy, TargetColor,
};
use image::{Rgb, RgbImage};

#[test]
fn config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aim.json");

    let mut cfg = AimConfig::for_color(TargetColor::Blue);
    cfg.policy = SelectionPolicy::FixedDigit;
    cfg.policy_args = PolicyArgs::default().with_target_digit(2);
    cfg.history_frames = 20;
    cfg.write_json(&path).unwrap();

    let loaded = AimConfig::load_json(&path).unwrap();
    assert_eq!(loaded, cfg);
}

#[test]
fn sparse_config_uses_defaults() {
    let cfg: AimConfig =
        serde_json::from_str(r#"{"policy":"auto-digit","detector":{"color":"blue"}}"#).unwrap();
    assert_eq!(cfg.policy, SelectionPolicy::AutoDigit);
    assert_eq!(cfg.detector.color, TargetColor::Blue);
    assert_eq!(cfg.detector.preprocess.threshold, 150);
    assert_eq!(cfg.history_frames, 10);
    assert_eq!(cfg.policy_args, PolicyArgs::default());

    assert!(serde_json::from_str::<AimConfig>(r#"{"policy":"sniper"}"#).is_err());
}

#[test]
fn report_records_selection() {
    let mut frame = RgbImage::new(640, 480);
    for x0 in [255u32, 375] {
        for y in 220..260 {
            for x in x0..x0 + 10 {
                frame.put_pixel(x, y, Rgb([255, 200, 200]));
            }
        }
    }

    let cfg = AimConfig::default();
    let mut pipeline = AimPipeline::new(cfg.clone());
    let result = pipeline.process_frame(&frame).unwrap();

    let mut report = FrameReport::new(&cfg, frame.width(), frame.height());
    report.set_result(&result);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.write_json(&path).unwrap();

    let loaded = FrameReport::load_json(&path).unwrap();
    assert_eq!(loaded.armors.len(), 1);
    assert_eq!(loaded.selection.and_then(|s| s.index), Some(0));
    assert!(loaded.target.is_some());
    assert!(loaded.error.is_none());
}

#[test]
fn missing_config_is_io_error() {
    let err = AimConfig::load_json("/nonexistent/aim.json").unwrap_err();
    assert!(matches!(err, armor_targets::IoError::Io(_)));
}

use approx::assert_relative_eq;
use armor_targets::detect::DetectError;
use armor_targets::select::SelectError;
use armor_targets::{
    rgb_image_from_bgr_slice, rgb_image_from_slice, AimConfig, AimPipeline, DigitReading,
    PipelineError, PolicyArgs, SelectionPolicy, TargetColor,
};
use image::{DynamicImage, Rgb, RgbImage};

const RED_BAR: [u8; 3] = [255, 200, 200];
const BLUE_BAR: [u8; 3] = [200, 200, 255];

fn fill(frame: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, rgb: [u8; 3]) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            frame.put_pixel(x, y, Rgb(rgb));
        }
    }
}

/// Two 10x40 bars 120 px apart, centered on the frame.
fn armor_frame(rgb: [u8; 3]) -> RgbImage {
    let mut frame = RgbImage::new(640, 480);
    fill(&mut frame, 255, 220, 10, 40, rgb);
    fill(&mut frame, 375, 220, 10, 40, rgb);
    frame
}

#[test]
fn detects_and_selects_single_armor() {
    let mut pipeline = AimPipeline::new(AimConfig::for_color(TargetColor::Red));
    let result = pipeline.process_frame(&armor_frame(RED_BAR)).unwrap();

    assert_eq!(result.detection.light_bars.len(), 2);
    assert_eq!(result.detection.armors.len(), 1);
    assert_eq!(result.selection.index, Some(0));
    assert!(!result.selection.recognize_digits);

    let target = result.target().unwrap();
    assert!(target.left.center().x < target.right.center().x);
    assert_relative_eq!(target.bbox.min.x, 255.0, epsilon = 1.0);
    assert_relative_eq!(target.bbox.max.x, 384.0, epsilon = 1.0);
    assert_relative_eq!(target.bbox.min.y, 220.0, epsilon = 1.0);
    assert_relative_eq!(target.bbox.max.y, 259.0, epsilon = 1.0);
    assert_relative_eq!(target.center().x, 320.0, epsilon = 1.0);
}

#[test]
fn moderately_saturated_red_bars_are_found() {
    let mut pipeline = AimPipeline::new(AimConfig::default());
    let result = pipeline.process_frame(&armor_frame([255, 120, 120])).unwrap();
    assert_eq!(result.detection.light_bars.len(), 2);
    assert_eq!(result.detection.armors.len(), 1);
}

#[test]
fn color_switch_changes_detections() {
    let frame = armor_frame(BLUE_BAR);
    let mut pipeline = AimPipeline::new(AimConfig::for_color(TargetColor::Red));
    let red = pipeline.process_frame(&frame).unwrap();
    assert!(red.detection.light_bars.is_empty());
    assert!(red.selection.is_none());

    pipeline.set_color(TargetColor::Blue);
    let blue = pipeline.process_frame(&frame).unwrap();
    assert_eq!(blue.detection.armors.len(), 1);
    assert_eq!(pipeline.config().detector.color, TargetColor::Blue);
}

#[test]
fn only_compatible_pair_survives() {
    let mut frame = armor_frame(RED_BAR);
    fill(&mut frame, 500, 200, 20, 80, RED_BAR);

    let mut pipeline = AimPipeline::new(AimConfig::default());
    let result = pipeline.process_frame(&frame).unwrap();
    assert_eq!(result.detection.light_bars.len(), 3);
    assert_eq!(result.detection.armors.len(), 1);
}

#[test]
fn empty_scene_selects_nothing() {
    let mut pipeline = AimPipeline::new(AimConfig::default());
    let result = pipeline.process_frame(&RgbImage::new(64, 48)).unwrap();
    assert!(result.detection.armors.is_empty());
    assert!(result.target().is_none());
}

#[test]
fn empty_frame_is_an_error() {
    let mut pipeline = AimPipeline::new(AimConfig::default());
    let err = pipeline.process_frame(&RgbImage::new(0, 0)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Detect(DetectError::InvalidFrame {
            width: 0,
            height: 0
        })
    ));
}

#[test]
fn digit_policies_use_recognizer_annotations() {
    let frame = armor_frame(RED_BAR);
    let mut pipeline = AimPipeline::new(AimConfig {
        policy: SelectionPolicy::AutoDigit,
        ..AimConfig::default()
    });

    let err = pipeline.process_frame(&frame).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Select(SelectError::DigitRecognitionUnavailable { .. })
    ));

    let result = pipeline
        .process_frame_annotated(&frame, |_, armors| {
            for armor in armors.iter_mut() {
                armor.digit = DigitReading::Digit(3);
            }
        })
        .unwrap();
    assert_eq!(result.selection.index, Some(0));
    assert!(result.selection.recognize_digits);
    assert_eq!(pipeline.context().history.count(3), 1);

    pipeline.set_policy(
        SelectionPolicy::FixedDigit,
        PolicyArgs::default().with_target_digit(5),
    );
    let result = pipeline
        .process_frame_annotated(&frame, |_, armors| {
            for armor in armors.iter_mut() {
                armor.digit = DigitReading::Digit(3);
            }
        })
        .unwrap();
    assert!(result.selection.is_none());
}

#[test]
fn color_switch_resets_digit_history() {
    let frame = armor_frame(RED_BAR);
    let mut pipeline = AimPipeline::new(AimConfig {
        policy: SelectionPolicy::AutoDigit,
        ..AimConfig::default()
    });
    let tag_threes = |_: &RgbImage, armors: &mut [armor_targets::ArmorCandidate]| {
        for armor in armors.iter_mut() {
            armor.digit = DigitReading::Digit(3);
        }
    };
    pipeline.process_frame_annotated(&frame, tag_threes).unwrap();
    pipeline.process_frame_annotated(&frame, tag_threes).unwrap();
    assert_eq!(pipeline.context().history.len(), 2);

    pipeline.set_color(TargetColor::Red);
    assert_eq!(pipeline.context().history.len(), 2);

    pipeline.set_color(TargetColor::Blue);
    assert!(pipeline.context().history.is_empty());
}

#[test]
fn decoded_images_of_any_format_are_accepted() {
    let rgba = DynamicImage::ImageRgb8(armor_frame(RED_BAR)).to_rgba8();
    let mut pipeline = AimPipeline::new(AimConfig::default());
    let result = pipeline.process_image(&DynamicImage::ImageRgba8(rgba)).unwrap();
    assert_eq!(result.detection.armors.len(), 1);
}

#[test]
fn nearest_by_distance_uses_rangefinder() {
    let mut pipeline = AimPipeline::new(AimConfig {
        policy: SelectionPolicy::NearestByDistance,
        ..AimConfig::default()
    });
    let result = pipeline
        .process_frame_annotated(&armor_frame(RED_BAR), |_, armors| {
            for armor in armors.iter_mut() {
                armor.distance = Some(2.5);
            }
        })
        .unwrap();
    assert_eq!(result.selection.index, Some(0));
}

#[test]
fn raw_buffers() {
    let err = rgb_image_from_slice(2, 2, &[0; 11]).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidRgbBuffer {
            expected: 12,
            got: 11
        }
    ));
    assert!(rgb_image_from_slice(0, 2, &[]).is_err());

    let bgr = rgb_image_from_bgr_slice(1, 1, &[10, 20, 30]).unwrap();
    assert_eq!(bgr.get_pixel(0, 0).0, [30, 20, 10]);
}

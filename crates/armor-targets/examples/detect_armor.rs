//! Run the aiming pipeline on a single image.
//!
//! ```text
//! cargo run -p armor-targets --example detect_armor -- config.json
//! ```
//!
//! The config names the input image, where to write the JSON report and,
//! optionally, an overlay PNG with light bars, armors and the selected target.

use std::{env, path::PathBuf, time::Instant};

use armor_targets::{io, AimConfig, AimPipeline, FrameReport, FrameResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use serde::Deserialize;

#[cfg(not(feature = "tracing"))]
use log::{info, warn, LevelFilter};

#[cfg(feature = "tracing")]
use tracing::{info, warn};
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

#[derive(Debug, Deserialize)]
struct ExampleConfig {
    image_path: String,
    #[serde(default)]
    output_path: Option<String>,
    #[serde(default)]
    overlay_path: Option<String>,
    #[serde(default)]
    aim: AimConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(not(feature = "tracing"))]
    armor_targets::core::init_from_env(LevelFilter::Info)?;

    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        armor_targets::core::init_tracing(false);
    }

    run()
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("detect_armor.json"));
    let raw = std::fs::read_to_string(&config_path)?;
    let cfg: ExampleConfig = serde_json::from_str(&raw)?;

    let frame = io::load_frame(&cfg.image_path)?;
    info!(
        "loaded {} ({}x{})",
        cfg.image_path,
        frame.width(),
        frame.height()
    );

    let mut pipeline = AimPipeline::new(cfg.aim.clone());
    let mut report = FrameReport::new(&cfg.aim, frame.width(), frame.height());

    let started = Instant::now();
    match pipeline.process_frame(&frame) {
        Ok(result) => {
            info!(
                "{} light bars, {} armors in {:.2} ms",
                result.detection.light_bars.len(),
                result.detection.armors.len(),
                started.elapsed().as_secs_f64() * 1e3
            );
            if result.target().is_none() {
                warn!("no target selected");
            }
            if let Some(path) = &cfg.overlay_path {
                draw_overlay(&frame, &result).save(path)?;
                info!("overlay written to {path}");
            }
            report.set_result(&result);
        }
        Err(err) => {
            warn!("frame failed: {err}");
            report.set_error(&err);
        }
    }

    let output_path = cfg
        .output_path
        .clone()
        .unwrap_or_else(|| "detect_armor_report.json".to_string());
    report.write_json(&output_path)?;
    info!("report written to {output_path}");
    Ok(())
}

fn draw_overlay(frame: &RgbImage, result: &FrameResult) -> RgbImage {
    let mut out = frame.clone();
    for bar in &result.detection.light_bars {
        let corners = bar.rect.corners();
        for k in 0..4 {
            let a = corners[k];
            let b = corners[(k + 1) % 4];
            draw_line_segment_mut(&mut out, (a.x, a.y), (b.x, b.y), Rgb([0, 255, 0]));
        }
    }
    for (idx, armor) in result.detection.armors.iter().enumerate() {
        let color = if Some(idx) == result.selection.index {
            Rgb([255, 255, 0])
        } else {
            Rgb([255, 0, 255])
        };
        let w = armor.bbox.width().round().max(1.0) as u32;
        let h = armor.bbox.height().round().max(1.0) as u32;
        let rect = Rect::at(armor.bbox.min.x.round() as i32, armor.bbox.min.y.round() as i32)
            .of_size(w, h);
        draw_hollow_rect_mut(&mut out, rect, color);
    }
    out
}

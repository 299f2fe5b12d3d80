//! Light bar extraction: contours of the mask, fitted rectangles, shape and
//! color gates.

use armor_targets_core::{ChannelMean, LightBar, OrientedRect, PixelRect, TargetColor};
use image::{GrayImage, RgbImage};
use imageproc::contours::{find_contours, Contour};
use imageproc::geometry::convex_hull;
use log::{debug, trace};
use nalgebra::Point2;

use crate::error::DetectError;
use crate::params::LightBarParams;
use crate::preprocess::ensure_frame;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AspectCheck {
    /// A fitted side has zero length.
    Degenerate,
    Rejected,
    Accepted,
}

/// Thin-and-long test on the normalized side ratio (open interval).
pub(crate) fn aspect_check(rect: &OrientedRect, params: &LightBarParams) -> AspectCheck {
    let (short, long) = rect.normalized_size();
    if short <= 0.0 || long <= 0.0 {
        return AspectCheck::Degenerate;
    }
    let ratio = short / long;
    if ratio > params.min_aspect && ratio < params.max_aspect {
        AspectCheck::Accepted
    } else {
        AspectCheck::Rejected
    }
}

/// The active channel must be bright and dominate the competing channel.
pub(crate) fn color_check(mean: &ChannelMean, color: TargetColor, params: &LightBarParams) -> bool {
    let own = mean.channel(color);
    own > params.min_brightness && own > mean.channel(color.opposite())
}

/// Mean color of `frame` over the mask's foreground pixels inside `bbox`.
///
/// Returns `None` when the box holds no foreground pixel.
pub(crate) fn masked_mean(
    frame: &RgbImage,
    mask: &GrayImage,
    bbox: &PixelRect,
) -> Option<ChannelMean> {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for (x, y) in bbox.pixels() {
        if mask.get_pixel(x, y)[0] == 0 {
            continue;
        }
        let px = frame.get_pixel(x, y).0;
        sum[0] += u64::from(px[0]);
        sum[1] += u64::from(px[1]);
        sum[2] += u64::from(px[2]);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(ChannelMean {
        red: (sum[0] as f64 / n) as f32,
        green: (sum[1] as f64 / n) as f32,
        blue: (sum[2] as f64 / n) as f32,
    })
}

fn fit_contour(contour: &Contour<i32>) -> Option<(OrientedRect, PixelRect)> {
    let bbox = PixelRect::from_pixels(
        contour
            .points
            .iter()
            .filter(|p| p.x >= 0 && p.y >= 0)
            .map(|p| (p.x as u32, p.y as u32)),
    )?;
    let hull: Vec<Point2<f32>> = convex_hull(contour.points.as_slice())
        .into_iter()
        .map(|p| Point2::new(p.x as f32, p.y as f32))
        .collect();
    let rect = OrientedRect::fit_convex_hull(&hull)?;
    Some((rect, bbox))
}

#[derive(Debug, Default)]
struct DetectStats {
    contours: usize,
    degenerate: usize,
    aspect_rejected: usize,
    color_rejected: usize,
}

/// Extract light bars of `color` from a frame and its preprocessed mask.
///
/// Every contour of the mask (outer borders and holes) is fitted with a
/// minimum-area rectangle. Contours with a zero side are skipped; the rest
/// must pass the aspect and color gates. Output keeps contour order.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, mask, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn detect_light_bars(
    frame: &RgbImage,
    mask: &GrayImage,
    color: TargetColor,
    params: &LightBarParams,
) -> Result<Vec<LightBar>, DetectError> {
    ensure_frame(frame)?;
    if frame.dimensions() != mask.dimensions() {
        return Err(DetectError::MaskSizeMismatch {
            frame_width: frame.width(),
            frame_height: frame.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }

    let contours = find_contours::<i32>(mask);
    let mut stats = DetectStats {
        contours: contours.len(),
        ..DetectStats::default()
    };
    let mut bars = Vec::new();

    for contour in &contours {
        let Some((rect, bbox)) = fit_contour(contour) else {
            stats.degenerate += 1;
            continue;
        };
        match aspect_check(&rect, params) {
            AspectCheck::Degenerate => {
                trace!("skip degenerate contour at {:?}", bbox);
                stats.degenerate += 1;
                continue;
            }
            AspectCheck::Rejected => {
                stats.aspect_rejected += 1;
                continue;
            }
            AspectCheck::Accepted => {}
        }
        let Some(mean) = masked_mean(frame, mask, &bbox).filter(|m| color_check(m, color, params))
        else {
            stats.color_rejected += 1;
            continue;
        };
        bars.push(LightBar { rect, bbox, mean });
    }

    debug!(
        "light bars: {} accepted of {} contours (degenerate={}, aspect={}, color={})",
        bars.len(),
        stats.contours,
        stats.degenerate,
        stats.aspect_rejected,
        stats.color_rejected
    );
    Ok(bars)
}

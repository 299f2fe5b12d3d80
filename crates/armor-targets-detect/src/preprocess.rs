//! Frame binarization: grayscale, fixed threshold, morphological closing.

use image::{GrayImage, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;

use crate::error::DetectError;
use crate::params::PreprocessParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub(crate) fn ensure_frame(frame: &RgbImage) -> Result<(), DetectError> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidFrame { width, height });
    }
    Ok(())
}

// BT.601 luma in 14-bit fixed point; the weights sum to 1 << 14.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Single-channel intensity `0.299 R + 0.587 G + 0.114 B`, rounded.
pub fn luma(frame: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(frame.width(), frame.height());
    for (dst, src) in gray.pixels_mut().zip(frame.pixels()) {
        let [r, g, b] = src.0;
        let y = u32::from(r) * LUMA_R + u32::from(g) * LUMA_G + u32::from(b) * LUMA_B;
        dst.0[0] = ((y + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8;
    }
    gray
}

/// Convert a color frame into a 0/255 mask of bright regions.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn preprocess(frame: &RgbImage, params: &PreprocessParams) -> Result<GrayImage, DetectError> {
    ensure_frame(frame)?;

    let gray = luma(frame);
    let binary = threshold(&gray, params.threshold, ThresholdType::Binary);

    let radius = params.kernel_size / 2;
    if radius == 0 {
        return Ok(binary);
    }
    // Square element of side 2r+1: dilate then erode.
    Ok(close(&binary, Norm::LInf, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn empty_frame_is_rejected() {
        let frame = RgbImage::new(0, 4);
        assert_eq!(
            preprocess(&frame, &PreprocessParams::default()),
            Err(DetectError::InvalidFrame {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn threshold_is_strict() {
        let mut frame = RgbImage::new(3, 1);
        frame.put_pixel(0, 0, Rgb([150, 150, 150]));
        frame.put_pixel(1, 0, Rgb([151, 151, 151]));
        frame.put_pixel(2, 0, Rgb([255, 255, 255]));
        let params = PreprocessParams {
            kernel_size: 1,
            ..PreprocessParams::default()
        };

        let mask = preprocess(&frame, &params).unwrap();
        assert_eq!(mask.as_raw(), &vec![0, 255, 255]);
    }

    #[test]
    fn luma_favours_red_like_bt601() {
        let mut frame = RgbImage::new(3, 1);
        frame.put_pixel(0, 0, Rgb([255, 120, 120]));
        frame.put_pixel(1, 0, Rgb([255, 255, 255]));
        frame.put_pixel(2, 0, Rgb([0, 0, 255]));

        let gray = luma(&frame);
        assert_eq!(gray.as_raw(), &vec![160, 255, 29]);

        let params = PreprocessParams {
            kernel_size: 1,
            ..PreprocessParams::default()
        };
        let mask = preprocess(&frame, &params).unwrap();
        assert_eq!(mask.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn closing_fills_small_gap() {
        let mut frame = RgbImage::new(20, 30);
        for y in 5..25 {
            for x in 8..12 {
                if y != 15 {
                    frame.put_pixel(x, y, Rgb([255, 255, 255]));
                }
            }
        }

        let mask = preprocess(&frame, &PreprocessParams::default()).unwrap();
        assert_eq!(mask.get_pixel(9, 15)[0], 255);
        assert_eq!(mask.get_pixel(1, 1)[0], 0);
        assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }
}

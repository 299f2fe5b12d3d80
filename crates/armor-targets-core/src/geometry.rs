//! Rectangles used throughout the pipeline.
//!
//! `OrientedRect` follows the minimum-area-rectangle convention used by the
//! light bar detector: `angle` lies in `[-90, 0)` degrees and is the rotation
//! of the `width` edge from the image x axis. An axis-aligned rectangle
//! therefore reports `angle == -90` with `width` measured along image y.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Rotated rectangle: center, side lengths and rotation in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Point2<f32>,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl OrientedRect {
    pub fn new(center: Point2<f32>, width: f32, height: f32, angle: f32) -> Self {
        Self {
            center,
            width,
            height,
            angle,
        }
    }

    /// Fit the minimum-area rectangle to a convex polygon (rotating calipers).
    ///
    /// `hull` must be the convex hull of the point set, in either winding.
    /// Returns `None` for an empty hull. One or two distinct points produce a
    /// rectangle with a zero side, which callers treat as degenerate.
    pub fn fit_convex_hull(hull: &[Point2<f32>]) -> Option<Self> {
        let first = *hull.first()?;
        let mut best: Option<(f32, Vector2<f32>, [f32; 4])> = None;

        for (i, &p) in hull.iter().enumerate() {
            let q = hull[(i + 1) % hull.len()];
            let edge = q - p;
            let len = edge.norm();
            if len <= f32::EPSILON {
                continue;
            }
            let u = edge / len;
            let v = Vector2::new(-u.y, u.x);

            let mut extents = [f32::MAX, f32::MIN, f32::MAX, f32::MIN];
            for pt in hull {
                let pu = pt.coords.dot(&u);
                let pv = pt.coords.dot(&v);
                extents[0] = extents[0].min(pu);
                extents[1] = extents[1].max(pu);
                extents[2] = extents[2].min(pv);
                extents[3] = extents[3].max(pv);
            }
            let area = (extents[1] - extents[0]) * (extents[3] - extents[2]);
            if best.map(|(a, _, _)| area < a).unwrap_or(true) {
                best = Some((area, u, extents));
            }
        }

        let Some((_, u, [min_u, max_u, min_v, max_v])) = best else {
            // All hull points coincide.
            return Some(Self::new(first, 0.0, 0.0, -90.0));
        };

        let v = Vector2::new(-u.y, u.x);
        let center = Point2::from(u * (0.5 * (min_u + max_u)) + v * (0.5 * (min_v + max_v)));
        let len_u = max_u - min_u;
        let len_v = max_v - min_v;

        let mut alpha = u.y.atan2(u.x).to_degrees();
        while alpha >= 90.0 {
            alpha -= 180.0;
        }
        while alpha < -90.0 {
            alpha += 180.0;
        }

        Some(if alpha < 0.0 {
            Self::new(center, len_u, len_v, alpha)
        } else {
            Self::new(center, len_v, len_u, alpha - 90.0)
        })
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Side lengths as `(short, long)`.
    pub fn normalized_size(&self) -> (f32, f32) {
        if self.width > self.height {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Four corner points, walking around the rectangle.
    pub fn corners(&self) -> [Point2<f32>; 4] {
        let (sin_a, cos_a) = self.angle.to_radians().sin_cos();
        let u = Vector2::new(cos_a, sin_a) * (0.5 * self.width);
        let v = Vector2::new(-sin_a, cos_a) * (0.5 * self.height);
        let c = self.center;
        [c + u + v, c - u + v, c - u - v, c + u - v]
    }
}

/// Floating-point axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRect {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl AxisRect {
    /// Tightest box around `points`, or `None` when there are none.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point2<f32>>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = *it.next()?;
        let mut rect = Self {
            min: first,
            max: first,
        };
        for p in it {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
        )
    }
}

/// Integer pixel box with inclusive extents: covers `x..x + width`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Bounding box of pixel coordinates.
    pub fn from_pixels(points: impl IntoIterator<Item = (u32, u32)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for (x, y) in it {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// Pixel coordinates covered by the box, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}

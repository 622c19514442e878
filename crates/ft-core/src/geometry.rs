//! Coordinate model: normalized box geometry and pixel ⇄ percentage conversion.
//!
//! Every box is stored as a percentage of its frame's width and height, so
//! the same geometry renders correctly at any display size. Two pixel spaces
//! meet this model:
//!
//! - **Native pixels**: the frame image's own resolution. Used by the
//!   package manifest, always rounded to whole pixels.
//! - **Surface pixels**: the size the frame is currently rendered at.
//!   Pointer gestures arrive in this space and are converted on the fly.
//!
//! All functions here are pure. Out-of-range input is absorbed by clamping,
//! never reported as an error.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// The full extent of a frame on either axis, in percent.
pub const FULL: f64 = 100.0;

// ─── Percent space ───────────────────────────────────────────────────────

/// A rectangle in percent-of-frame units.
///
/// Valid boxes satisfy `0 ≤ x`, `0 ≤ y`, `x + w ≤ 100`, `y + h ≤ 100`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PercentRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanning two corner points in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let r = Rect::from_points(a, b);
        Self::new(r.x0, r.y0, r.width(), r.height())
    }

    /// Rectangle of size `w × h` centered on `center`.
    pub fn centered(center: Point, w: f64, h: f64) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Point-in-rect test with inclusive edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the rectangle lies entirely inside the frame (within `eps`).
    pub fn is_within_frame(&self, eps: f64) -> bool {
        self.x >= -eps
            && self.y >= -eps
            && self.w >= 0.0
            && self.h >= 0.0
            && self.right() <= FULL + eps
            && self.bottom() <= FULL + eps
    }

    fn as_kurbo(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }
}

// ─── Native pixel space ──────────────────────────────────────────────────

/// A rectangle in whole native pixels, as written to the package manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

/// Convert percent geometry to native pixels, rounding to the nearest pixel.
pub fn to_pixels(rect: &PercentRect, frame_w: u32, frame_h: u32) -> PixelBox {
    let fw = f64::from(frame_w);
    let fh = f64::from(frame_h);
    PixelBox {
        x: (rect.x / FULL * fw).round() as i64,
        y: (rect.y / FULL * fh).round() as i64,
        w: (rect.w / FULL * fw).round() as i64,
        h: (rect.h / FULL * fh).round() as i64,
    }
}

/// Convert native pixels to percent geometry by exact division.
///
/// A zero-sized frame maps everything to the origin.
pub fn to_percent(px: &PixelBox, frame_w: u32, frame_h: u32) -> PercentRect {
    let ratio = |v: i64, extent: u32| {
        if extent == 0 {
            0.0
        } else {
            v as f64 / f64::from(extent) * FULL
        }
    };
    PercentRect {
        x: ratio(px.x, frame_w),
        y: ratio(px.y, frame_h),
        w: ratio(px.w, frame_w),
        h: ratio(px.h, frame_h),
    }
}

// ─── Surface space ───────────────────────────────────────────────────────

/// Convert a surface-relative pointer position to percent coordinates.
pub fn surface_to_percent(p: Point, surface: Size) -> Point {
    Point::new(
        ratio_of(p.x, surface.width) * FULL,
        ratio_of(p.y, surface.height) * FULL,
    )
}

/// Project percent geometry onto a rendered surface.
pub fn percent_to_surface(rect: &PercentRect, surface: Size) -> Rect {
    let r = rect.as_kurbo();
    Rect::new(
        r.x0 / FULL * surface.width,
        r.y0 / FULL * surface.height,
        r.x1 / FULL * surface.width,
        r.y1 / FULL * surface.height,
    )
}

/// Express a surface length as a percentage of `extent`.
pub fn length_to_percent(len: f64, extent: f64) -> f64 {
    ratio_of(len, extent) * FULL
}

fn ratio_of(v: f64, extent: f64) -> f64 {
    if extent > 0.0 && extent.is_finite() {
        v / extent
    } else {
        0.0
    }
}

// ─── Clamping ────────────────────────────────────────────────────────────

/// `v` bounded to `[lo, hi]`. Never panics: a collapsed range yields `lo`
/// and non-finite input yields `lo`.
pub fn bound(v: f64, lo: f64, hi: f64) -> f64 {
    if !v.is_finite() {
        return lo;
    }
    v.min(hi.max(lo)).max(lo)
}

/// Clamp a candidate rectangle into the frame.
///
/// `w` and `h` are bounded to `[min_size, 100]`, then `x` and `y` to
/// `[0, 100 - w]` and `[0, 100 - h]`.
pub fn clamp_rect(candidate: PercentRect, min_size: f64) -> PercentRect {
    let min_size = bound(min_size, 0.0, FULL);
    let w = bound(candidate.w, min_size, FULL);
    let h = bound(candidate.h, min_size, FULL);
    PercentRect {
        x: bound(candidate.x, 0.0, FULL - w),
        y: bound(candidate.y, 0.0, FULL - h),
        w,
        h,
    }
}

/// Move a rectangle to `(x, y)` keeping its size, clamped so it stays inside
/// the frame on both axes.
pub fn clamp_position(rect: &PercentRect, x: f64, y: f64) -> PercentRect {
    PercentRect {
        x: bound(x, 0.0, FULL - rect.w),
        y: bound(y, 0.0, FULL - rect.h),
        ..*rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_pixels_rounds_to_nearest() {
        let rect = PercentRect::new(10.0, 20.0, 15.0, 5.0);
        let px = to_pixels(&rect, 1279, 719);
        // 127.9 → 128, 143.8 → 144, 191.85 → 192, 35.95 → 36
        assert_eq!(
            px,
            PixelBox {
                x: 128,
                y: 144,
                w: 192,
                h: 36
            }
        );
    }

    #[test]
    fn to_percent_is_exact_division() {
        let px = PixelBox {
            x: 64,
            y: 36,
            w: 320,
            h: 180,
        };
        let rect = to_percent(&px, 1280, 720);
        assert_eq!(rect, PercentRect::new(5.0, 5.0, 25.0, 25.0));
    }

    #[test]
    fn to_percent_zero_sized_frame() {
        let px = PixelBox {
            x: 5,
            y: 5,
            w: 5,
            h: 5,
        };
        assert_eq!(to_percent(&px, 0, 0), PercentRect::default());
    }

    #[test]
    fn clamp_rect_pulls_box_inside_frame() {
        let r = clamp_rect(PercentRect::new(95.0, -3.0, 15.0, 5.0), 1.0);
        assert_eq!(r, PercentRect::new(85.0, 0.0, 15.0, 5.0));
    }

    #[test]
    fn clamp_rect_enforces_size_bounds() {
        let r = clamp_rect(PercentRect::new(0.0, 0.0, 0.2, 140.0), 1.0);
        assert_eq!(r.w, 1.0);
        assert_eq!(r.h, 100.0);
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn bound_never_panics_on_collapsed_range() {
        assert_eq!(bound(5.0, 0.0, -10.0), 0.0);
        assert_eq!(bound(f64::NAN, 2.0, 8.0), 2.0);
    }

    #[test]
    fn from_corners_normalizes_direction() {
        let r = PercentRect::from_corners(Point::new(40.0, 30.0), Point::new(10.0, 50.0));
        assert_eq!(r, PercentRect::new(10.0, 30.0, 30.0, 20.0));
    }

    #[test]
    fn surface_conversion_uses_rendered_size() {
        let p = surface_to_percent(Point::new(200.0, 75.0), Size::new(800.0, 300.0));
        assert_eq!(p, Point::new(25.0, 25.0));

        let r = percent_to_surface(&PercentRect::new(25.0, 25.0, 50.0, 50.0), Size::new(800.0, 300.0));
        assert_eq!(r, Rect::new(200.0, 75.0, 600.0, 225.0));
    }

    #[test]
    fn surface_conversion_with_empty_surface() {
        let p = surface_to_percent(Point::new(10.0, 10.0), Size::ZERO);
        assert_eq!(p, Point::ZERO);
    }
}

//! Hit testing: point → box lookup.
//!
//! Boxes are painted in creation order, so the last-created box is on top.
//! Lookups walk the list in reverse to find the topmost box under a point.

use crate::geometry::surface_to_percent;
use crate::id::BoxId;
use crate::model::{Frame, FrameBox};
use kurbo::{Point, Size};

/// Find the topmost box at a percent-space position.
/// Returns `None` if only the bare frame is hit.
pub fn hit_box(frame: &Frame, p: Point) -> Option<&FrameBox> {
    frame.boxes.iter().rev().find(|b| b.rect.contains(p))
}

/// Id of the topmost box at a percent-space position.
pub fn hit_test(frame: &Frame, p: Point) -> Option<BoxId> {
    hit_box(frame, p).map(|b| b.id)
}

/// Like [`hit_box`], for a surface-relative pointer position.
pub fn hit_box_on_surface(frame: &Frame, p: Point, surface: Size) -> Option<&FrameBox> {
    hit_box(frame, surface_to_percent(p, surface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PercentRect;
    use crate::model::FrameImage;

    fn frame_with_overlap() -> (Frame, BoxId, BoxId) {
        let mut frame = Frame::new(FrameImage::new(Vec::new()), 100, 100);
        let below = BoxId::intern("below");
        let above = BoxId::intern("above");
        frame.boxes.push(FrameBox::hotspot(
            below,
            PercentRect::new(10.0, 10.0, 40.0, 40.0),
            "below",
            1,
        ));
        frame.boxes.push(FrameBox::input_field(
            above,
            PercentRect::new(30.0, 30.0, 40.0, 40.0),
            "above",
            "",
        ));
        (frame, below, above)
    }

    #[test]
    fn topmost_box_wins() {
        let (frame, below, above) = frame_with_overlap();
        assert_eq!(hit_test(&frame, Point::new(35.0, 35.0)), Some(above));
        assert_eq!(hit_test(&frame, Point::new(15.0, 15.0)), Some(below));
    }

    #[test]
    fn miss_returns_none() {
        let (frame, _, _) = frame_with_overlap();
        assert_eq!(hit_test(&frame, Point::new(90.0, 5.0)), None);
    }

    #[test]
    fn surface_hit_converts_coordinates() {
        let (frame, below, _) = frame_with_overlap();
        let surface = Size::new(400.0, 200.0);
        // (60, 30) on a 400×200 surface is (15%, 15%).
        let hit = hit_box_on_surface(&frame, Point::new(60.0, 30.0), surface);
        assert_eq!(hit.map(|b| b.id), Some(below));
    }
}

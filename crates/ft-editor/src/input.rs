//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen events into a unified `InputEvent` enum
//! consumed by tools. Positions are relative to the rendered frame surface
//! (its top-left corner is the origin); screen positions are kept alongside
//! for gesture classification, which measures real on-screen travel.

use kurbo::Point;

/// Which button started a press. Only the primary button edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Where and when a pointer event happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Position relative to the frame surface, in surface pixels.
    pub pos: Point,
    /// Position on screen, in screen pixels.
    pub screen: Point,
    /// Host timestamp in milliseconds.
    pub time_ms: f64,
}

impl PointerSample {
    /// A sample whose surface sits at the screen origin.
    pub fn at(x: f64, y: f64, time_ms: f64) -> Self {
        let pos = Point::new(x, y);
        Self {
            pos,
            screen: pos,
            time_ms,
        }
    }

    /// A sample with distinct surface and screen positions.
    pub fn with_screen(pos: Point, screen: Point, time_ms: f64) -> Self {
        Self {
            pos,
            screen,
            time_ms,
        }
    }
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown {
        sample: PointerSample,
        button: PointerButton,
    },

    /// Pointer moved anywhere in the viewport.
    PointerMove { sample: PointerSample },

    /// Pointer released anywhere in the viewport.
    PointerUp { sample: PointerSample },
}

impl InputEvent {
    pub fn down(x: f64, y: f64, time_ms: f64) -> Self {
        Self::PointerDown {
            sample: PointerSample::at(x, y, time_ms),
            button: PointerButton::Primary,
        }
    }

    pub fn moved(x: f64, y: f64, time_ms: f64) -> Self {
        Self::PointerMove {
            sample: PointerSample::at(x, y, time_ms),
        }
    }

    pub fn up(x: f64, y: f64, time_ms: f64) -> Self {
        Self::PointerUp {
            sample: PointerSample::at(x, y, time_ms),
        }
    }

    pub fn sample(&self) -> &PointerSample {
        match self {
            Self::PointerDown { sample, .. }
            | Self::PointerMove { sample }
            | Self::PointerUp { sample } => sample,
        }
    }

    /// Surface-relative position of the event.
    pub fn position(&self) -> Point {
        self.sample().pos
    }
}

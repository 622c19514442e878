//! Drag and resize of an existing box.
//!
//! A gesture starts on pointer-down over a box body (drag) or one of the
//! selected box's eight handles (resize). The pointer position, the box's
//! surface-pixel geometry, and the handle are captured at that moment.
//! Every subsequent move recomputes the box from those captured values and
//! the *current* surface size, so a surface resized mid-gesture stays
//! consistent. Pointer-up commits whatever geometry the last move produced.
//!
//! The manipulator holds at most one gesture. While one is active the host
//! should route viewport-wide pointer moves and releases here
//! ([`BoxManipulator::is_active`]); [`BoxManipulator::release`] drops the
//! gesture when the surface goes away.

use crate::input::InputEvent;
use crate::project::BoxMutation;
use crate::tools::{Mutations, Target, Tool, ToolContext};
use ft_core::GestureConfig;
use ft_core::geometry::{FULL, bound, clamp_position, length_to_percent, percent_to_surface};
use ft_core::{BoxId, FrameBox, PercentRect};
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::smallvec;

// ─── Handles ─────────────────────────────────────────────────────────────

/// One of the eight resize handles around a selected box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::NW,
        Handle::N,
        Handle::NE,
        Handle::E,
        Handle::SE,
        Handle::S,
        Handle::SW,
        Handle::W,
    ];

    pub fn moves_west(self) -> bool {
        matches!(self, Handle::W | Handle::NW | Handle::SW)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Handle::E | Handle::NE | Handle::SE)
    }

    pub fn moves_north(self) -> bool {
        matches!(self, Handle::N | Handle::NE | Handle::NW)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Handle::S | Handle::SE | Handle::SW)
    }

    /// Where this handle sits on a box's surface rectangle.
    pub fn anchor(self, r: Rect) -> Point {
        let cx = (r.x0 + r.x1) / 2.0;
        let cy = (r.y0 + r.y1) / 2.0;
        let x = if self.moves_west() {
            r.x0
        } else if self.moves_east() {
            r.x1
        } else {
            cx
        };
        let y = if self.moves_north() {
            r.y0
        } else if self.moves_south() {
            r.y1
        } else {
            cy
        };
        Point::new(x, y)
    }

    /// CSS cursor name for hosts that show one.
    pub fn cursor(self) -> &'static str {
        match self {
            Handle::N | Handle::S => "ns-resize",
            Handle::E | Handle::W => "ew-resize",
            Handle::NE | Handle::SW => "nesw-resize",
            Handle::NW | Handle::SE => "nwse-resize",
        }
    }
}

/// The handle of a box (drawn at `box_rect` on the surface) under `p`.
/// Each handle is a square of side `hit_px` centred on its anchor.
pub fn hit_handle(box_rect: Rect, p: Point, hit_px: f64) -> Option<Handle> {
    let half = hit_px / 2.0;
    Handle::ALL.into_iter().find(|h| {
        let a = h.anchor(box_rect);
        (p.x - a.x).abs() <= half && (p.y - a.y).abs() <= half
    })
}

// ─── Gesture state ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Drag {
        id: BoxId,
        origin: Point,
        /// Box top-left on the surface at pointer-down.
        start: Point,
    },
    Resize {
        id: BoxId,
        handle: Handle,
        origin: Point,
        /// Box rectangle on the surface at pointer-down.
        start: Rect,
    },
}

impl Gesture {
    fn id(&self) -> BoxId {
        match self {
            Gesture::Drag { id, .. } | Gesture::Resize { id, .. } => *id,
        }
    }
}

/// Drives drag and resize gestures on one box at a time.
#[derive(Debug, Clone)]
pub struct BoxManipulator {
    gesture: Option<Gesture>,
    min_resize_px: f64,
}

impl BoxManipulator {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            gesture: None,
            min_resize_px: config.min_resize_px,
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// The box being manipulated.
    pub fn target(&self) -> Option<BoxId> {
        self.gesture.as_ref().map(Gesture::id)
    }

    /// The resize handle in use, if resizing.
    pub fn active_handle(&self) -> Option<Handle> {
        match self.gesture {
            Some(Gesture::Resize { handle, .. }) => Some(handle),
            _ => None,
        }
    }

    pub fn begin_drag(&mut self, b: &FrameBox, pointer: Point, surface: Size) {
        let start = percent_to_surface(&b.rect, surface).origin();
        log::trace!("drag {} from {pointer:?}", b.id);
        self.gesture = Some(Gesture::Drag {
            id: b.id,
            origin: pointer,
            start,
        });
    }

    pub fn begin_resize(&mut self, b: &FrameBox, handle: Handle, pointer: Point, surface: Size) {
        let start = percent_to_surface(&b.rect, surface);
        log::trace!("resize {} by {handle:?} from {pointer:?}", b.id);
        self.gesture = Some(Gesture::Resize {
            id: b.id,
            handle,
            origin: pointer,
            start,
        });
    }

    /// Recompute the target box for a pointer at `pointer`.
    ///
    /// `current` is the box's geometry as stored right now; the dimensions a
    /// gesture does not touch are carried over from it unchanged.
    pub fn pointer_move(
        &self,
        pointer: Point,
        surface: Size,
        current: &PercentRect,
    ) -> Option<BoxMutation> {
        let gesture = self.gesture?;
        let rect = match gesture {
            Gesture::Drag { origin, start, .. } => {
                let to = start + (pointer - origin);
                clamp_position(
                    current,
                    length_to_percent(to.x, surface.width),
                    length_to_percent(to.y, surface.height),
                )
            }
            Gesture::Resize {
                handle,
                origin,
                start,
                ..
            } => resize(
                handle,
                start,
                pointer - origin,
                surface,
                self.min_resize_px,
                current,
            ),
        };
        Some(BoxMutation::SetRect {
            id: gesture.id(),
            rect,
        })
    }

    /// End the gesture. The geometry from the last move stays as-is.
    pub fn pointer_up(&mut self) -> Option<BoxId> {
        let id = self.gesture.take()?.id();
        log::trace!("commit {id}");
        Some(id)
    }

    /// Drop any gesture without further mutations.
    pub fn release(&mut self) {
        self.gesture = None;
    }
}

impl Tool for BoxManipulator {
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Mutations {
        match event {
            InputEvent::PointerDown { sample, .. } => {
                match ctx.target {
                    Target::Handle(id, handle) => {
                        if let Some(b) = ctx.frame.get(id) {
                            self.begin_resize(b, handle, sample.pos, ctx.surface);
                        }
                    }
                    Target::Box(id) => {
                        if let Some(b) = ctx.frame.get(id) {
                            self.begin_drag(b, sample.pos, ctx.surface);
                        }
                    }
                    Target::Surface => {}
                }
                Mutations::new()
            }
            InputEvent::PointerMove { sample } => {
                // The box may have been deleted mid-gesture.
                let Some(current) = self.target().and_then(|id| ctx.frame.get(id)) else {
                    return Mutations::new();
                };
                match self.pointer_move(sample.pos, ctx.surface, &current.rect) {
                    Some(m) => smallvec![m],
                    None => Mutations::new(),
                }
            }
            InputEvent::PointerUp { .. } => {
                self.pointer_up();
                Mutations::new()
            }
        }
    }

    fn is_active(&self) -> bool {
        BoxManipulator::is_active(self)
    }

    fn cancel(&mut self) {
        self.release();
    }
}

// ─── Resize math ─────────────────────────────────────────────────────────

fn resize(
    handle: Handle,
    start: Rect,
    delta: Vec2,
    surface: Size,
    min_px: f64,
    current: &PercentRect,
) -> PercentRect {
    let mut rect = *current;

    if handle.moves_west() || handle.moves_east() {
        let (x0, x1) = resize_axis(
            start.x0,
            start.x1,
            delta.x,
            handle.moves_west(),
            surface.width,
            min_px,
        );
        rect.x = bound(length_to_percent(x0, surface.width), 0.0, FULL);
        rect.w = length_to_percent(x1 - x0, surface.width).min(FULL - rect.x);
    }

    if handle.moves_north() || handle.moves_south() {
        let (y0, y1) = resize_axis(
            start.y0,
            start.y1,
            delta.y,
            handle.moves_north(),
            surface.height,
            min_px,
        );
        rect.y = bound(length_to_percent(y0, surface.height), 0.0, FULL);
        rect.h = length_to_percent(y1 - y0, surface.height).min(FULL - rect.y);
    }

    rect
}

/// Resolve one axis of a resize in surface pixels.
///
/// The edge opposite the handle stays put. The moving edge stops at the
/// surface boundary and never comes closer than `min` to the fixed edge.
fn resize_axis(lo: f64, hi: f64, delta: f64, moves_lo: bool, extent: f64, min: f64) -> (f64, f64) {
    let min = min.min(extent).max(0.0);
    let (mut lo, mut hi) = (lo, hi);

    if moves_lo {
        lo = bound(lo + delta, 0.0, hi - min);
    } else {
        hi = bound(hi + delta, lo + min, extent);
    }

    // A box already smaller than `min` against a frame edge: grow it inward.
    if hi - lo < min {
        if moves_lo {
            lo = (hi - min).max(0.0);
            hi = lo + min;
        } else {
            hi = (lo + min).min(extent);
            lo = hi - min;
        }
    }

    (lo, hi)
}

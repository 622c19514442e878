//! Tool system for frame-surface interactions.
//!
//! Each tool translates pointer events into `BoxMutation` commands that the
//! [`Project`](crate::project::Project) applies. Two tools exist:
//!
//! | Pointer-down on   | Tool              | Outcome                              |
//! |-------------------|-------------------|--------------------------------------|
//! | a resize handle   | `BoxManipulator`  | resize, opposite edge fixed          |
//! | a box body        | `BoxManipulator`  | drag, clamped inside the frame       |
//! | bare surface      | `SurfaceTool`     | click → hotspot, drag → input field  |

use crate::input::InputEvent;
use crate::manipulator::Handle;
use crate::project::BoxMutation;
use ft_core::geometry::{FULL, bound, clamp_rect, surface_to_percent};
use ft_core::{BoxId, Frame, FrameBox, GestureConfig, PercentRect};
use kurbo::{Point, Size};
use smallvec::{SmallVec, smallvec};

/// Label given to boxes placed by clicking or drawing.
pub const NEW_HOTSPOT_LABEL: &str = "New Hotspot";
pub const NEW_INPUT_LABEL: &str = "New Input";

/// Mutations produced by one event. Rarely more than one.
pub type Mutations = SmallVec<[BoxMutation; 2]>;

/// What a pointer-down landed on. Resolved by the project before routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Handle(BoxId, Handle),
    Box(BoxId),
    Surface,
}

/// Read-only view of the state a tool may consult.
pub struct ToolContext<'a> {
    /// The frame being edited.
    pub frame: &'a Frame,
    /// Current rendered size of the frame surface.
    pub surface: Size,
    /// What the gesture's pointer-down hit. Ignored after pointer-down.
    pub target: Target,
}

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    /// Handle an input event, returning zero or more mutations.
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Mutations;

    /// Whether a gesture started by this tool is still in progress.
    fn is_active(&self) -> bool;

    /// Abandon any gesture in progress.
    fn cancel(&mut self);
}

// ─── Surface Tool ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    origin: Point,
    origin_screen: Point,
    started_ms: f64,
}

/// Places new boxes on bare surface.
///
/// A press released quickly and close to where it started is a click and
/// drops a default-size hotspot centred on the press. Anything else is a
/// draw: the rectangle between press and release becomes an input field if
/// it exceeds `min_draw_percent` on both axes, and is discarded otherwise.
#[derive(Debug, Clone)]
pub struct SurfaceTool {
    pending: Option<Pending>,
    /// Rectangle being drawn, in percent. Shown by the host while dragging.
    pub preview: Option<PercentRect>,
    config: GestureConfig,
}

impl SurfaceTool {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            pending: None,
            preview: None,
            config: config.clone(),
        }
    }

    fn is_click(&self, pending: &Pending, up_screen: Point, up_ms: f64) -> bool {
        let elapsed = up_ms - pending.started_ms;
        let distance = (up_screen - pending.origin_screen).hypot();
        elapsed < self.config.click_max_duration_ms && distance < self.config.click_max_distance_px
    }

    fn place_hotspot(&self, frame: &Frame, at: Point) -> BoxMutation {
        let rect = clamp_rect(
            PercentRect::centered(at, self.config.default_box_w, self.config.default_box_h),
            0.0,
        );
        let order = frame.next_hotspot_order();
        log::trace!("click at {at:?}: hotspot #{order}");
        BoxMutation::AddBox {
            b: FrameBox::hotspot(BoxId::with_prefix("hotspot"), rect, NEW_HOTSPOT_LABEL, order),
        }
    }

    fn place_input(&self, origin: Point, end: Point) -> Option<BoxMutation> {
        let rect = PercentRect::from_corners(origin, end);
        let min = self.config.min_draw_percent;
        if rect.w > min && rect.h > min {
            log::trace!("drew input field {rect:?}");
            Some(BoxMutation::AddBox {
                b: FrameBox::input_field(BoxId::with_prefix("input"), rect, NEW_INPUT_LABEL, ""),
            })
        } else {
            log::trace!("discarded draw {rect:?}");
            None
        }
    }
}

/// Percent position of `p`, bounded to the frame.
fn in_frame(p: Point, surface: Size) -> Point {
    let pct = surface_to_percent(p, surface);
    Point::new(bound(pct.x, 0.0, FULL), bound(pct.y, 0.0, FULL))
}

impl Tool for SurfaceTool {
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Mutations {
        match event {
            InputEvent::PointerDown { sample, .. } => {
                if ctx.target == Target::Surface {
                    self.pending = Some(Pending {
                        origin: in_frame(sample.pos, ctx.surface),
                        origin_screen: sample.screen,
                        started_ms: sample.time_ms,
                    });
                    self.preview = None;
                }
                Mutations::new()
            }
            InputEvent::PointerMove { sample } => {
                if let Some(p) = &self.pending {
                    let end = in_frame(sample.pos, ctx.surface);
                    self.preview = Some(PercentRect::from_corners(p.origin, end));
                }
                Mutations::new()
            }
            InputEvent::PointerUp { sample } => {
                self.preview = None;
                let Some(p) = self.pending.take() else {
                    return Mutations::new();
                };
                if self.is_click(&p, sample.screen, sample.time_ms) {
                    smallvec![self.place_hotspot(ctx.frame, p.origin)]
                } else {
                    let end = in_frame(sample.pos, ctx.surface);
                    self.place_input(p.origin, end).into_iter().collect()
                }
            }
        }
    }

    fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.preview = None;
    }
}

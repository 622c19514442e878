//! The authoring project: the frame collection and everything that edits it.
//!
//! `Project` is the single owner of authoring state. Canvas gestures arrive
//! as [`InputEvent`]s, are routed to a [`Tool`], and come back as
//! [`BoxMutation`]s applied by [`Project::apply`]. Panel edits (labels,
//! expected text, hotspot order, delete) go through the same path, so every
//! change to a box funnels through one place.
//!
//! Requests the current state cannot honour (editing an excluded frame,
//! exporting with nothing included) are rejected without touching anything.
//! The ones an author needs to hear about post a [`Notice`].

use crate::input::{InputEvent, PointerButton};
use crate::manipulator::{BoxManipulator, Handle, hit_handle};
use crate::tools::{NEW_HOTSPOT_LABEL, NEW_INPUT_LABEL, SurfaceTool, Target, Tool, ToolContext};
use ft_core::extract::{ExtractedFrame, frames_from_extraction};
use ft_core::geometry::{clamp_rect, percent_to_surface};
use ft_core::hit::hit_box_on_surface;
use ft_core::{
    BoxId, BoxType, Config, Frame, FrameBox, FtError, FtResult, NOTHING_TO_TEST, PackageSink,
    PackageSource, PercentRect, export_package, import_package,
};
use kurbo::{Point, Size};

pub const NO_FRAMES_EXTRACTED: &str = "No frames could be extracted from the video.";
pub const EMPTY_PACKAGE: &str = "The test package appears to be empty or invalid.";

/// A change to one box on the current frame.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxMutation {
    SetRect { id: BoxId, rect: PercentRect },
    AddBox { b: FrameBox },
    RemoveBox { id: BoxId },
    SetLabel { id: BoxId, label: String },
    SetExpected { id: BoxId, expected: String },
    /// Give a hotspot a new order; whichever hotspot held it takes the old one.
    SetOrder { id: BoxId, order: u32 },
}

/// A message for the author. Validation notices expire; package errors stay
/// until dismissed or replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub expires_at_ms: Option<f64>,
}

pub struct Project {
    frames: Vec<Frame>,
    current: usize,
    selected: Option<BoxId>,
    loaded: bool,
    /// Set while the host is busy (extracting, exporting). Blocks all editing.
    disabled: bool,
    surface: Size,
    /// What the gesture in progress started on.
    target: Target,
    manipulator: BoxManipulator,
    surface_tool: SurfaceTool,
    notice: Option<Notice>,
    config: Config,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Project {
    /// An empty project with nothing loaded.
    pub fn new(config: Config) -> Self {
        Self {
            frames: Vec::new(),
            current: 0,
            selected: None,
            loaded: false,
            disabled: false,
            surface: Size::ZERO,
            target: Target::Surface,
            manipulator: BoxManipulator::new(&config.gesture),
            surface_tool: SurfaceTool::new(&config.gesture),
            notice: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ─── Loading ─────────────────────────────────────────────────────────

    /// Replace the whole collection with `frames`.
    pub fn load_frames(&mut self, frames: Vec<Frame>, now_ms: f64) {
        self.reset();
        self.frames = frames;
        self.loaded = true;
        if self.frames.is_empty() {
            self.post_notice(NO_FRAMES_EXTRACTED, now_ms, true);
        }
        log::debug!("loaded {} frames", self.frames.len());
    }

    /// Load stills delivered by the video extractor.
    pub fn load_extraction(&mut self, extracted: Vec<ExtractedFrame>, now_ms: f64) {
        self.load_frames(frames_from_extraction(extracted), now_ms);
    }

    /// Replace the collection with the contents of a package.
    ///
    /// On failure the project is left with nothing loaded and the error is
    /// posted as a notice.
    pub fn import(&mut self, source: &dyn PackageSource, now_ms: f64) -> FtResult<usize> {
        self.reset();
        match import_package(source) {
            Ok(frames) => {
                let n = frames.len();
                self.frames = frames;
                self.loaded = true;
                if n == 0 {
                    self.post_notice(EMPTY_PACKAGE, now_ms, false);
                }
                Ok(n)
            }
            Err(err) => {
                log::warn!("import failed: {err}");
                self.post_notice(err.to_string(), now_ms, false);
                Err(err)
            }
        }
    }

    /// Write every included frame to `sink`. Returns the number exported.
    pub fn export(&mut self, sink: &mut dyn PackageSink, now_ms: f64) -> FtResult<usize> {
        export_package(&self.frames, sink).inspect_err(|err| {
            let expires = matches!(err, FtError::Validation(_));
            self.post_notice(err.to_string(), now_ms, expires);
        })
    }

    /// Snapshot the included frames for a test run.
    pub fn test_frames(&mut self, now_ms: f64) -> FtResult<Vec<Frame>> {
        let frames: Vec<Frame> = self
            .frames
            .iter()
            .filter(|f| f.include_in_test)
            .cloned()
            .collect();
        if frames.is_empty() {
            self.post_notice(NOTHING_TO_TEST, now_ms, true);
            return Err(FtError::validation(NOTHING_TO_TEST));
        }
        Ok(frames)
    }

    /// Drop everything and return to the "nothing loaded" state.
    pub fn unload(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.teardown();
        self.frames.clear();
        self.current = 0;
        self.selected = None;
        self.loaded = false;
        self.notice = None;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.current)
    }

    pub fn selected(&self) -> Option<BoxId> {
        self.selected
    }

    pub fn selected_box(&self) -> Option<&FrameBox> {
        self.current_frame()?.get(self.selected?)
    }

    pub fn included_count(&self) -> usize {
        self.frames.iter().filter(|f| f.include_in_test).count()
    }

    /// Rectangle being drawn on bare surface, if any.
    pub fn preview(&self) -> Option<PercentRect> {
        self.surface_tool.preview
    }

    pub fn surface(&self) -> Size {
        self.surface
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Boxes on the current frame can be created, edited and selected.
    pub fn is_editable(&self) -> bool {
        !self.disabled && self.current_frame().is_some_and(|f| f.include_in_test)
    }

    /// Whether pointer moves and releases anywhere in the viewport must be
    /// forwarded, because a gesture is in progress.
    pub fn wants_viewport_events(&self) -> bool {
        self.manipulator.is_active() || self.surface_tool.is_active()
    }

    /// The resize handle under a surface position, for cursor feedback.
    pub fn handle_at(&self, p: Point) -> Option<Handle> {
        match self.target_at(p) {
            Target::Handle(_, h) => Some(h),
            _ => None,
        }
    }

    // ─── Host state ──────────────────────────────────────────────────────

    /// Record the size the frame surface is currently rendered at.
    pub fn set_surface_size(&mut self, size: Size) {
        self.surface = size;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.teardown();
        }
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    pub fn next_frame(&mut self) -> bool {
        self.go_to_frame(self.current + 1)
    }

    pub fn previous_frame(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(i) => self.go_to_frame(i),
            None => false,
        }
    }

    pub fn go_to_frame(&mut self, index: usize) -> bool {
        if self.disabled || index >= self.frames.len() || index == self.current {
            return false;
        }
        self.teardown();
        self.current = index;
        self.selected = None;
        true
    }

    /// Include or exclude the current frame from the test.
    pub fn set_included(&mut self, included: bool) -> bool {
        if self.disabled {
            return false;
        }
        let Some(frame) = self.frames.get_mut(self.current) else {
            return false;
        };
        if frame.include_in_test == included {
            return false;
        }
        frame.include_in_test = included;
        if !included {
            self.teardown();
            self.selected = None;
        }
        true
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_box(&mut self, id: BoxId) -> bool {
        if !self.is_editable() || !self.current_frame().is_some_and(|f| f.contains(id)) {
            return false;
        }
        self.selected.replace(id) != Some(id)
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    // ─── Panel edits ─────────────────────────────────────────────────────

    /// Add a default-size box in the middle of the current frame and select it.
    pub fn add_box(&mut self, box_type: BoxType) -> Option<BoxId> {
        let g = &self.config.gesture;
        let rect = clamp_rect(
            PercentRect::new(g.default_box_x, g.default_box_y, g.default_box_w, g.default_box_h),
            0.0,
        );
        let order = self.current_frame()?.next_hotspot_order();
        let b = match box_type {
            BoxType::Hotspot => {
                FrameBox::hotspot(BoxId::with_prefix("hotspot"), rect, NEW_HOTSPOT_LABEL, order)
            }
            BoxType::InputField => {
                FrameBox::input_field(BoxId::with_prefix("input"), rect, NEW_INPUT_LABEL, "")
            }
        };
        let id = b.id;
        self.apply(BoxMutation::AddBox { b }).then_some(id)
    }

    pub fn set_label(&mut self, id: BoxId, label: impl Into<String>) -> bool {
        self.apply(BoxMutation::SetLabel {
            id,
            label: label.into(),
        })
    }

    pub fn set_expected(&mut self, id: BoxId, expected: impl Into<String>) -> bool {
        self.apply(BoxMutation::SetExpected {
            id,
            expected: expected.into(),
        })
    }

    pub fn set_hotspot_order(&mut self, id: BoxId, order: u32) -> bool {
        self.apply(BoxMutation::SetOrder { id, order })
    }

    pub fn delete_box(&mut self, id: BoxId) -> bool {
        self.apply(BoxMutation::RemoveBox { id })
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.delete_box(id),
            None => false,
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply a mutation to the current frame. Returns whether anything changed.
    pub fn apply(&mut self, mutation: BoxMutation) -> bool {
        if !self.is_editable() {
            log::debug!("ignored {mutation:?}: frame not editable");
            return false;
        }
        let Some(frame) = self.frames.get_mut(self.current) else {
            return false;
        };

        match mutation {
            BoxMutation::SetRect { id, rect } => match frame.get_mut(id) {
                Some(b) => {
                    b.rect = clamp_rect(rect, 0.0);
                    true
                }
                None => false,
            },
            BoxMutation::AddBox { b } => {
                if frame.contains(b.id) {
                    return false;
                }
                log::debug!("add {} {}", b.box_type(), b.id);
                self.selected = Some(b.id);
                frame.boxes.push(b);
                true
            }
            BoxMutation::RemoveBox { id } => {
                let removed = frame.remove(id).is_some();
                if removed && self.selected == Some(id) {
                    self.selected = None;
                }
                if removed && self.manipulator.target() == Some(id) {
                    self.manipulator.release();
                }
                removed
            }
            BoxMutation::SetLabel { id, label } => match frame.get_mut(id) {
                Some(b) => {
                    b.label = label;
                    true
                }
                None => false,
            },
            BoxMutation::SetExpected { id, expected } => frame
                .get_mut(id)
                .is_some_and(|b| b.set_expected(expected)),
            BoxMutation::SetOrder { id, order } => set_order_swapping(frame, id, order),
        }
    }

    // ─── Pointer routing ─────────────────────────────────────────────────

    /// Feed a pointer event. Returns whether the view needs a redraw.
    ///
    /// Pointer-down picks the target in priority order: a handle of the
    /// selected box, then the topmost box, then bare surface. Moves and
    /// releases go to whichever tool the pointer-down started.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { sample, button } => {
                if *button != PointerButton::Primary || !self.is_editable() {
                    return false;
                }
                // Positions mean nothing until the host reports the rendered size.
                if self.surface.width <= 0.0 || self.surface.height <= 0.0 {
                    log::debug!("pointer-down before the surface was sized");
                    return false;
                }
                // A missed release leaves a gesture open; start fresh.
                self.teardown();
                self.target = self.target_at(sample.pos);
                let selection_changed = match self.target {
                    Target::Handle(id, _) | Target::Box(id) => self.select_box(id),
                    Target::Surface => self.clear_selection(),
                };
                self.route(event) | selection_changed
            }
            InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. } => {
                if !self.wants_viewport_events() {
                    return false;
                }
                self.route(event)
            }
        }
    }

    /// Abandon any gesture and stop wanting viewport-wide events.
    pub fn teardown(&mut self) {
        self.manipulator.cancel();
        self.surface_tool.cancel();
        self.target = Target::Surface;
    }

    fn route(&mut self, event: &InputEvent) -> bool {
        let Some(frame) = self.frames.get(self.current) else {
            return false;
        };
        let ctx = ToolContext {
            frame,
            surface: self.surface,
            target: self.target,
        };
        let preview = self.surface_tool.preview;
        let mutations = match self.target {
            Target::Surface => self.surface_tool.handle(event, &ctx),
            Target::Handle(..) | Target::Box(..) => self.manipulator.handle(event, &ctx),
        };

        let mut changed = preview != self.surface_tool.preview;
        for m in mutations {
            changed |= self.apply(m);
        }
        changed
    }

    fn target_at(&self, p: Point) -> Target {
        let Some(frame) = self.current_frame() else {
            return Target::Surface;
        };
        if let Some(b) = self.selected.and_then(|id| frame.get(id)) {
            let on_surface = percent_to_surface(&b.rect, self.surface);
            if let Some(h) = hit_handle(on_surface, p, self.config.gesture.handle_hit_px) {
                return Target::Handle(b.id, h);
            }
        }
        match hit_box_on_surface(frame, p, self.surface) {
            Some(b) => Target::Box(b.id),
            None => Target::Surface,
        }
    }

    // ─── Notices ─────────────────────────────────────────────────────────

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Expire a timed notice. Returns whether one was removed.
    pub fn expire_notice(&mut self, now_ms: f64) -> bool {
        let expired = self
            .notice
            .as_ref()
            .and_then(|n| n.expires_at_ms)
            .is_some_and(|at| now_ms >= at);
        if expired {
            self.notice = None;
        }
        expired
    }

    fn post_notice(&mut self, message: impl Into<String>, now_ms: f64, expires: bool) {
        let message = message.into();
        log::info!("notice: {message}");
        self.notice = Some(Notice {
            message,
            expires_at_ms: expires.then(|| now_ms + self.config.notice.ttl_ms as f64),
        });
    }
}

/// Keep orders unique within a frame: the hotspot that held `order` swaps
/// with `id`.
fn set_order_swapping(frame: &mut Frame, id: BoxId, order: u32) -> bool {
    let Some(old) = frame.get(id).and_then(FrameBox::order) else {
        return false;
    };
    if order == 0 || order == old {
        return false;
    }
    let holder = frame
        .hotspot_with_order(order)
        .map(|b| b.id)
        .filter(|other| *other != id);
    if let Some(other) = holder.and_then(|h| frame.get_mut(h)) {
        other.set_order(old);
    }
    frame.get_mut(id).is_some_and(|b| b.set_order(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::{BoxKind, FrameImage, MemoryPackage};
    use pretty_assertions::assert_eq;

    const SURFACE: Size = Size::new(1000.0, 500.0);

    fn project(frames: usize) -> Project {
        let mut p = Project::default();
        p.load_frames(
            (0..frames)
                .map(|_| Frame::new(FrameImage::new(vec![0xFF, 0xD8]), 1920, 1080))
                .collect(),
            0.0,
        );
        p.set_surface_size(SURFACE);
        p
    }

    fn orders(p: &Project) -> Vec<(String, u32)> {
        p.current_frame()
            .unwrap()
            .hotspots()
            .map(|b| (b.label.clone(), b.order().unwrap()))
            .collect()
    }

    #[test]
    fn add_box_uses_defaults_and_selects() {
        let mut p = project(1);
        let id = p.add_box(BoxType::Hotspot).unwrap();
        let b = p.selected_box().unwrap();
        assert_eq!(b.id, id);
        assert_eq!(b.rect, PercentRect::new(42.5, 45.0, 15.0, 5.0));
        assert_eq!(b.kind(), &BoxKind::Hotspot { order: 1 });

        let second = p.add_box(BoxType::Hotspot).unwrap();
        assert_eq!(p.current_frame().unwrap().get(second).unwrap().order(), Some(2));
    }

    #[test]
    fn excluded_frame_rejects_edits() {
        let mut p = project(1);
        let id = p.add_box(BoxType::InputField).unwrap();
        assert!(p.set_included(false));
        assert_eq!(p.selected(), None);

        assert!(!p.set_label(id, "nope"));
        assert_eq!(p.add_box(BoxType::Hotspot), None);
        assert!(!p.handle_event(&InputEvent::down(10.0, 10.0, 0.0)));
        assert_eq!(p.current_frame().unwrap().boxes.len(), 1);
    }

    #[test]
    fn disabled_project_ignores_everything() {
        let mut p = project(2);
        p.set_disabled(true);
        assert!(!p.next_frame());
        assert!(!p.set_included(false));
        assert_eq!(p.add_box(BoxType::Hotspot), None);
        p.set_disabled(false);
        assert!(p.next_frame());
    }

    #[test]
    fn order_change_swaps_with_holder() {
        let mut p = project(1);
        let a = p.add_box(BoxType::Hotspot).unwrap();
        let b = p.add_box(BoxType::Hotspot).unwrap();
        let c = p.add_box(BoxType::Hotspot).unwrap();
        p.set_label(a, "a");
        p.set_label(b, "b");
        p.set_label(c, "c");

        assert!(p.set_hotspot_order(c, 1));
        assert_eq!(
            orders(&p),
            vec![("a".into(), 3), ("b".into(), 2), ("c".into(), 1)]
        );
        assert!(!p.set_hotspot_order(a, 0));
    }

    #[test]
    fn order_change_to_unused_value_is_kept() {
        let mut p = project(1);
        let a = p.add_box(BoxType::Hotspot).unwrap();
        assert!(p.set_hotspot_order(a, 7));
        assert_eq!(p.current_frame().unwrap().get(a).unwrap().order(), Some(7));
    }

    #[test]
    fn variant_specific_edits_check_variant() {
        let mut p = project(1);
        let hotspot = p.add_box(BoxType::Hotspot).unwrap();
        let input = p.add_box(BoxType::InputField).unwrap();
        assert!(!p.set_expected(hotspot, "x"));
        assert!(!p.set_hotspot_order(input, 2));
        assert!(p.set_expected(input, "hello"));
        let b = p.current_frame().unwrap().get(input).unwrap();
        assert_eq!(b.expected(), Some("hello"));
    }

    #[test]
    fn delete_clears_selection() {
        let mut p = project(1);
        let id = p.add_box(BoxType::Hotspot).unwrap();
        assert!(p.delete_selected());
        assert_eq!(p.selected(), None);
        assert!(!p.delete_box(id));
    }

    #[test]
    fn navigation_clears_selection_and_stays_in_range() {
        let mut p = project(2);
        p.add_box(BoxType::Hotspot);
        assert!(!p.previous_frame());
        assert!(p.next_frame());
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.selected(), None);
        assert!(!p.next_frame());
    }

    #[test]
    fn click_on_surface_places_hotspot_and_selects_it() {
        let mut p = project(1);
        p.handle_event(&InputEvent::down(500.0, 250.0, 0.0));
        assert!(p.wants_viewport_events());
        assert!(p.handle_event(&InputEvent::up(500.0, 250.0, 80.0)));
        assert!(!p.wants_viewport_events());

        let b = p.selected_box().unwrap();
        assert_eq!(b.kind(), &BoxKind::Hotspot { order: 1 });
        assert_eq!(b.rect.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn pointer_is_ignored_until_surface_is_sized() {
        let mut p = Project::default();
        p.load_frames(
            vec![Frame::new(FrameImage::new(vec![0xFF, 0xD8]), 1280, 720)],
            0.0,
        );
        assert!(!p.handle_event(&InputEvent::down(640.0, 360.0, 0.0)));
        assert!(!p.wants_viewport_events());
        assert!(!p.handle_event(&InputEvent::up(640.0, 360.0, 50.0)));
        assert!(!p.current_frame().unwrap().has_hotspots());

        p.set_surface_size(Size::new(1280.0, 720.0));
        p.handle_event(&InputEvent::down(640.0, 360.0, 0.0));
        p.handle_event(&InputEvent::up(640.0, 360.0, 50.0));
        let b = p.selected_box().unwrap();
        assert_eq!(b.rect.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn drag_on_box_moves_it() {
        let mut p = project(1);
        let id = p.add_box(BoxType::Hotspot).unwrap();
        p.clear_selection();

        // Box spans 425..575 × 225..250 px; grab its middle.
        p.handle_event(&InputEvent::down(500.0, 237.0, 0.0));
        assert_eq!(p.selected(), Some(id));
        p.handle_event(&InputEvent::moved(400.0, 237.0, 40.0));
        p.handle_event(&InputEvent::up(400.0, 237.0, 60.0));

        let rect = p.current_frame().unwrap().get(id).unwrap().rect;
        assert!((rect.x - 32.5).abs() < 1e-9);
        assert_eq!(p.current_frame().unwrap().boxes.len(), 1);
    }

    #[test]
    fn selected_handle_wins_over_box_body() {
        let mut p = project(1);
        let id = p.add_box(BoxType::Hotspot).unwrap();
        // East handle of the selected box sits at (575, 237.5).
        assert_eq!(p.handle_at(Point::new(575.0, 237.5)), Some(Handle::E));

        p.handle_event(&InputEvent::down(575.0, 237.5, 0.0));
        p.handle_event(&InputEvent::moved(675.0, 237.5, 50.0));
        p.handle_event(&InputEvent::up(675.0, 237.5, 90.0));

        let rect = p.current_frame().unwrap().get(id).unwrap().rect;
        assert!((rect.x - 42.5).abs() < 1e-9);
        assert!((rect.w - 25.0).abs() < 1e-9);
    }

    #[test]
    fn press_on_bare_surface_clears_selection() {
        let mut p = project(1);
        p.add_box(BoxType::Hotspot);
        p.handle_event(&InputEvent::down(50.0, 50.0, 0.0));
        assert_eq!(p.selected(), None);
        // Slow release in place: no box created.
        p.handle_event(&InputEvent::up(50.0, 50.0, 900.0));
        assert_eq!(p.current_frame().unwrap().boxes.len(), 1);
    }

    #[test]
    fn deleting_box_mid_drag_ends_gesture() {
        let mut p = project(1);
        let id = p.add_box(BoxType::Hotspot).unwrap();
        p.handle_event(&InputEvent::down(500.0, 237.0, 0.0));
        assert!(p.delete_box(id));
        assert!(!p.wants_viewport_events());
        assert!(!p.handle_event(&InputEvent::moved(10.0, 10.0, 10.0)));
    }

    #[test]
    fn export_with_nothing_included_posts_expiring_notice() {
        let mut p = project(1);
        p.set_included(false);
        let mut sink = MemoryPackage::new();
        let err = p.export(&mut sink, 1000.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot export: No frames are selected for inclusion."
        );
        assert!(sink.entries.is_empty());
        assert_eq!(p.notice().unwrap().expires_at_ms, Some(4000.0));

        assert!(!p.expire_notice(3999.0));
        assert!(p.expire_notice(4000.0));
        assert_eq!(p.notice(), None);
    }

    #[test]
    fn test_frames_requires_an_included_frame() {
        let mut p = project(2);
        p.set_included(false);
        assert_eq!(p.test_frames(0.0).unwrap().len(), 1);
        p.next_frame();
        p.set_included(false);
        let err = p.test_frames(0.0).unwrap_err();
        assert_eq!(err.to_string(), NOTHING_TO_TEST);
        assert_eq!(p.notice().unwrap().message, NOTHING_TO_TEST);
    }

    #[test]
    fn failed_import_leaves_nothing_loaded() {
        let mut p = project(3);
        let err = p.import(&MemoryPackage::new(), 0.0).unwrap_err();
        assert!(err.is_malformed_package());
        assert!(!p.is_loaded());
        assert!(p.frames().is_empty());
        assert_eq!(p.notice().unwrap().expires_at_ms, None);
    }

    #[test]
    fn empty_extraction_posts_notice() {
        let mut p = Project::default();
        p.load_extraction(Vec::new(), 0.0);
        assert!(p.is_loaded());
        assert_eq!(p.notice().unwrap().message, NO_FRAMES_EXTRACTED);
    }
}

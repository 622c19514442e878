//! WASM bridge for Frame Test: exposes the authoring project and the test
//! player to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<video>` element, the rendering, the timers and the archive format; this
//! crate owns every rule. Packages cross the boundary as a `Map` of entry
//! name → `Uint8Array`. Structured results cross as JSON strings.

use ft_core::extract::{ExtractedFrame, check_video_size, sample_timestamps};
use ft_core::{BoxId, BoxType, Config, Frame, FrameBox, FrameImage, MemoryPackage};
use ft_editor::{InputEvent, PointerButton, PointerSample, Project};
use ft_player::{SessionAction, TestSession};
use kurbo::{Point, Size};
use serde::Serialize;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

// ─── Authoring ───────────────────────────────────────────────────────────

/// The authoring surface controller. All editor interaction from the page
/// goes through this struct.
#[wasm_bindgen]
pub struct FtEditorCanvas {
    project: Project,
    /// Frames delivered by the extractor since `begin_extraction`.
    extracting: Vec<ExtractedFrame>,
}

#[wasm_bindgen]
impl FtEditorCanvas {
    /// Create an empty editor. `config_json` may override any subset of the
    /// default thresholds.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FtEditorCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config = parse_config(config_json.as_deref())?;
        Ok(Self {
            project: Project::new(config),
            extracting: Vec::new(),
        })
    }

    // ─── Extraction ──────────────────────────────────────────────────────

    /// Reject a source video over the size limit before decoding it.
    pub fn check_video_size(&self, len_bytes: f64) -> Result<(), JsValue> {
        check_video_size(len_bytes as u64, &self.project.config().extraction).map_err(js_err)
    }

    /// Seek positions (seconds) the page should grab stills at.
    pub fn sample_timestamps(&self, duration_secs: f64) -> Vec<f64> {
        sample_timestamps(duration_secs, &self.project.config().extraction)
    }

    pub fn begin_extraction(&mut self) {
        self.extracting.clear();
        self.project.set_disabled(true);
    }

    /// Hand over one encoded still.
    pub fn push_extracted_frame(
        &mut self,
        jpeg: &[u8],
        width: u32,
        height: u32,
        timestamp_secs: f64,
    ) {
        self.extracting.push(ExtractedFrame {
            timestamp_secs,
            image: FrameImage::new(jpeg.to_vec()),
            width,
            height,
        });
    }

    /// Replace the project with the extracted stills.
    pub fn finish_extraction(&mut self, now_ms: f64) -> usize {
        let frames = std::mem::take(&mut self.extracting);
        self.project.set_disabled(false);
        self.project.load_extraction(frames, now_ms);
        self.project.frames().len()
    }

    // ─── Surface & pointer ───────────────────────────────────────────────

    /// Record the rendered size of the frame image.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.project.set_surface_size(Size::new(width, height));
    }

    /// Pointer pressed on the frame surface. `x`/`y` are surface-relative,
    /// `button` follows `MouseEvent.button`. Returns true if a redraw is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        screen_x: f64,
        screen_y: f64,
        time_ms: f64,
        button: u8,
    ) -> bool {
        let button = match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            _ => PointerButton::Secondary,
        };
        self.project.handle_event(&InputEvent::PointerDown {
            sample: sample(x, y, screen_x, screen_y, time_ms),
            button,
        })
    }

    /// Pointer moved anywhere in the viewport.
    pub fn pointer_move(&mut self, x: f64, y: f64, screen_x: f64, screen_y: f64, time_ms: f64) -> bool {
        self.project.handle_event(&InputEvent::PointerMove {
            sample: sample(x, y, screen_x, screen_y, time_ms),
        })
    }

    /// Pointer released anywhere in the viewport.
    pub fn pointer_up(&mut self, x: f64, y: f64, screen_x: f64, screen_y: f64, time_ms: f64) -> bool {
        self.project.handle_event(&InputEvent::PointerUp {
            sample: sample(x, y, screen_x, screen_y, time_ms),
        })
    }

    /// Whether the page must keep viewport-wide pointer listeners attached.
    pub fn wants_viewport_events(&self) -> bool {
        self.project.wants_viewport_events()
    }

    /// The surface is going away: drop any gesture in progress.
    pub fn teardown(&mut self) {
        self.project.teardown();
    }

    /// CSS cursor for a surface position (resize handles only).
    pub fn cursor_at(&self, x: f64, y: f64) -> Option<String> {
        self.project
            .handle_at(Point::new(x, y))
            .map(|h| h.cursor().to_string())
    }

    // ─── Box edits ───────────────────────────────────────────────────────

    pub fn add_hotspot(&mut self) -> Option<String> {
        self.project
            .add_box(BoxType::Hotspot)
            .map(|id| id.as_str().to_string())
    }

    pub fn add_input_field(&mut self) -> Option<String> {
        self.project
            .add_box(BoxType::InputField)
            .map(|id| id.as_str().to_string())
    }

    pub fn set_label(&mut self, id: &str, label: &str) -> bool {
        self.project.set_label(BoxId::intern(id), label)
    }

    pub fn set_expected(&mut self, id: &str, expected: &str) -> bool {
        self.project.set_expected(BoxId::intern(id), expected)
    }

    pub fn set_hotspot_order(&mut self, id: &str, order: u32) -> bool {
        self.project.set_hotspot_order(BoxId::intern(id), order)
    }

    pub fn delete_box(&mut self, id: &str) -> bool {
        self.project.delete_box(BoxId::intern(id))
    }

    pub fn select_box(&mut self, id: &str) -> bool {
        self.project.select_box(BoxId::intern(id))
    }

    pub fn clear_selection(&mut self) -> bool {
        self.project.clear_selection()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.project.selected().map(|id| id.as_str().to_string())
    }

    // ─── Frames ──────────────────────────────────────────────────────────

    pub fn next_frame(&mut self) -> bool {
        self.project.next_frame()
    }

    pub fn previous_frame(&mut self) -> bool {
        self.project.previous_frame()
    }

    pub fn go_to_frame(&mut self, index: usize) -> bool {
        self.project.go_to_frame(index)
    }

    pub fn set_included(&mut self, included: bool) -> bool {
        self.project.set_included(included)
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.project.set_disabled(disabled);
    }

    pub fn current_index(&self) -> usize {
        self.project.current_index()
    }

    pub fn frame_count(&self) -> usize {
        self.project.frames().len()
    }

    pub fn included_count(&self) -> usize {
        self.project.included_count()
    }

    pub fn is_loaded(&self) -> bool {
        self.project.is_loaded()
    }

    /// All frames with their boxes, for rendering thumbnails and overlays.
    pub fn frames_json(&self) -> String {
        frames_to_json(self.project.frames())
    }

    /// Encoded image of frame `index`.
    pub fn frame_image(&self, index: usize) -> Option<js_sys::Uint8Array> {
        self.project
            .frames()
            .get(index)
            .map(|f| js_sys::Uint8Array::from(f.image.bytes()))
    }

    /// Rectangle being drawn, as `{x,y,w,h}` in percent, or `null`.
    pub fn preview_json(&self) -> String {
        to_json(&self.project.preview())
    }

    // ─── Notices ─────────────────────────────────────────────────────────

    /// The current notice, after expiring timed ones, or `null`.
    pub fn notice_json(&mut self, now_ms: f64) -> String {
        self.project.expire_notice(now_ms);
        let notice = self.project.notice().map(|n| {
            serde_json::json!({ "message": n.message, "expires_at_ms": n.expires_at_ms })
        });
        to_json(&notice)
    }

    pub fn dismiss_notice(&mut self) {
        self.project.dismiss_notice();
    }

    // ─── Packages ────────────────────────────────────────────────────────

    /// Serialize the included frames. The page zips the returned entries.
    pub fn export_package(&mut self, now_ms: f64) -> Result<js_sys::Map, JsValue> {
        let mut pkg = MemoryPackage::new();
        self.project.export(&mut pkg, now_ms).map_err(js_err)?;
        Ok(package_to_map(&pkg))
    }

    /// Replace the project with an unzipped package.
    pub fn import_package(&mut self, entries: &js_sys::Map, now_ms: f64) -> Result<usize, JsValue> {
        let pkg = package_from_map(entries);
        self.project.import(&pkg, now_ms).map_err(js_err)
    }
}

// ─── Playback ────────────────────────────────────────────────────────────

/// One test-taking pass. Every method taking an action returns the
/// resulting effects as a JSON array.
#[wasm_bindgen]
pub struct FtTestPlayer {
    session: TestSession,
}

#[wasm_bindgen]
impl FtTestPlayer {
    /// Start a test over the editor's included frames.
    pub fn from_editor(editor: &mut FtEditorCanvas, now_ms: f64) -> Result<FtTestPlayer, JsValue> {
        let frames = editor.project.test_frames(now_ms).map_err(js_err)?;
        let config = editor.project.config().session.clone();
        let session = TestSession::start(&frames, config).map_err(js_err)?;
        Ok(Self { session })
    }

    /// Start a test straight from an unzipped package.
    pub fn from_package(
        entries: &js_sys::Map,
        config_json: Option<String>,
    ) -> Result<FtTestPlayer, JsValue> {
        console_error_panic_hook_setup();
        let config = parse_config(config_json.as_deref())?;
        let frames = ft_core::import_package(&package_from_map(entries)).map_err(js_err)?;
        let session = TestSession::start(&frames, config.session).map_err(js_err)?;
        Ok(Self { session })
    }

    /// Apply a JSON-encoded action, e.g. `{"type":"next"}`.
    pub fn apply(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: SessionAction = serde_json::from_str(action_json).map_err(js_err)?;
        Ok(self.dispatch(action))
    }

    /// Click at a percent position on the displayed frame.
    pub fn click_at(&mut self, x: f64, y: f64) -> String {
        self.dispatch(SessionAction::ClickAt { x, y })
    }

    pub fn type_text(&mut self, id: &str, text: &str) -> String {
        self.dispatch(SessionAction::InputChanged {
            id: BoxId::intern(id),
            text: text.to_string(),
        })
    }

    pub fn blur(&mut self, id: &str) -> String {
        self.dispatch(SessionAction::InputBlurred {
            id: BoxId::intern(id),
        })
    }

    pub fn next(&mut self) -> String {
        self.dispatch(SessionAction::Next)
    }

    pub fn previous(&mut self) -> String {
        self.dispatch(SessionAction::Previous)
    }

    /// A `schedule_advance` effect's delay elapsed.
    pub fn timer_fired(&mut self, from_frame: usize) -> String {
        self.dispatch(SessionAction::AdvanceTimerFired { from_frame })
    }

    pub fn score_json(&self) -> String {
        to_json(&self.session.score())
    }

    pub fn progress_json(&self) -> String {
        to_json(&self.session.progress())
    }

    /// Verdicts for the displayed frame while reviewing, else `null`.
    pub fn review_json(&self) -> String {
        to_json(&self.session.review())
    }

    /// The displayed frame's boxes and the taker's answers so far.
    pub fn frame_json(&self) -> String {
        let frame = self.session.current_frame();
        to_json(&serde_json::json!({
            "index": self.session.current_index(),
            "width": frame.width,
            "height": frame.height,
            "boxes": frame.boxes,
            "answers": self.session.current_answers(),
        }))
    }

    pub fn frame_image(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.session.current_frame().image.bytes())
    }
}

impl FtTestPlayer {
    fn dispatch(&mut self, action: SessionAction) -> String {
        let effects = self.session.apply(action);
        to_json(effects.as_slice())
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct FrameView<'a> {
    index: usize,
    id: &'a str,
    width: u32,
    height: u32,
    include_in_test: bool,
    boxes: &'a [FrameBox],
}

fn frames_to_json(frames: &[Frame]) -> String {
    let views: Vec<FrameView<'_>> = frames
        .iter()
        .enumerate()
        .map(|(index, f)| FrameView {
            index,
            id: f.id.as_str(),
            width: f.width,
            height: f.height,
            include_in_test: f.include_in_test,
            boxes: &f.boxes,
        })
        .collect();
    serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn sample(x: f64, y: f64, screen_x: f64, screen_y: f64, time_ms: f64) -> PointerSample {
    PointerSample::with_screen(Point::new(x, y), Point::new(screen_x, screen_y), time_ms)
}

fn parse_config(json: Option<&str>) -> Result<Config, JsValue> {
    match json {
        Some(text) if !text.trim().is_empty() => Config::from_json_str(text).map_err(js_err),
        _ => Ok(Config::default()),
    }
}

fn js_err(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn package_to_map(pkg: &MemoryPackage) -> js_sys::Map {
    let map = js_sys::Map::new();
    for (name, bytes) in &pkg.entries {
        map.set(
            &JsValue::from_str(name),
            &js_sys::Uint8Array::from(bytes.as_slice()).into(),
        );
    }
    map
}

fn package_from_map(entries: &js_sys::Map) -> MemoryPackage {
    let mut pkg = MemoryPackage::new();
    entries.for_each(&mut |value, key| match key.as_string() {
        Some(name) => {
            pkg.entries
                .insert(name, js_sys::Uint8Array::new(&value).to_vec());
        }
        None => log::warn!("skipping package entry with non-string name"),
    });
    pkg
}

/// Set up a panic hook that forwards to `console.error`.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Frame Test WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    fn editor() -> FtEditorCanvas {
        let mut canvas = FtEditorCanvas::new(None).unwrap();
        canvas.begin_extraction();
        let still = jpeg(128, 72);
        canvas.push_extracted_frame(&still, 128, 72, 0.0);
        canvas.push_extracted_frame(&still, 128, 72, 1.0);
        canvas.push_extracted_frame(&[0xFF, 0xD8], 128, 72, 2.0);
        // The truncated third still is dropped at intake.
        assert_eq!(canvas.finish_extraction(0.0), 2);
        canvas.set_surface_size(640.0, 360.0);
        canvas
    }

    #[test]
    fn extraction_reenables_editing() {
        let mut canvas = editor();
        assert!(canvas.is_loaded());
        assert!(canvas.add_hotspot().is_some());
    }

    #[test]
    fn click_gesture_places_hotspot() {
        let mut canvas = editor();
        canvas.pointer_down(320.0, 180.0, 820.0, 380.0, 0.0, 0);
        assert!(canvas.wants_viewport_events());
        assert!(canvas.pointer_up(320.0, 180.0, 820.0, 380.0, 90.0));
        assert!(canvas.selected_id().is_some());

        let frames: serde_json::Value = serde_json::from_str(&canvas.frames_json()).unwrap();
        assert_eq!(frames[0]["boxes"][0]["label"], "New Hotspot");
        assert_eq!(frames[0]["boxes"][0]["kind"]["type"], "hotspot");
        assert_eq!(frames[1]["boxes"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut canvas = editor();
        assert!(!canvas.pointer_down(320.0, 180.0, 320.0, 180.0, 0.0, 2));
        assert!(!canvas.wants_viewport_events());
    }

    #[test]
    fn player_round_trip_through_json() {
        let mut canvas = editor();
        let id = canvas.add_hotspot().unwrap();
        let mut session = TestSession::start(canvas.project.frames(), Default::default()).unwrap();
        session.apply(SessionAction::Next);

        let mut player = FtTestPlayer { session };
        let effects = player.previous();
        assert_eq!(effects, r#"[{"type":"frame_changed","index":0}]"#);

        let effects = player
            .apply(&format!(r#"{{"type":"hotspot_clicked","id":"{id}"}}"#))
            .unwrap();
        assert!(effects.contains("correct_hotspot"));
        assert!(effects.contains("schedule_advance"));

        let score: serde_json::Value = serde_json::from_str(&player.score_json()).unwrap();
        assert_eq!(score["score"], 1);
        assert_eq!(score["total_possible"], 1);
    }

    #[test]
    fn empty_config_text_uses_defaults() {
        assert_eq!(parse_config(Some("  ")).unwrap(), Config::default());
        assert_eq!(parse_config(None).unwrap(), Config::default());
    }
}

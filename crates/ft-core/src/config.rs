//! Tunable thresholds for gestures, playback, extraction and notices.
//!
//! Every struct has a `Default` matching the shipped behaviour. Hosts can
//! override any subset from JSON; missing fields keep their defaults.

use crate::error::{FtError, FtResult};
use serde::{Deserialize, Serialize};

// ─── Gestures ─────────────────────────────────────────────────────────────

/// Thresholds for authoring gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// A press shorter than this (and closer than `click_max_distance_px`)
    /// is a click. Default: **250 ms**.
    pub click_max_duration_ms: f64,

    /// Straight-line screen displacement below which a press is a click.
    /// Default: **5 px**.
    pub click_max_distance_px: f64,

    /// A drawn rectangle must exceed this on both axes to become an input
    /// field. Default: **1 %**.
    pub min_draw_percent: f64,

    /// Smallest width or height a resize may produce, in surface pixels.
    /// Default: **10 px**.
    pub min_resize_px: f64,

    /// Size of click-placed hotspots and toolbar-added boxes, in percent.
    pub default_box_w: f64,
    pub default_box_h: f64,

    /// Where toolbar-added boxes land, in percent.
    pub default_box_x: f64,
    pub default_box_y: f64,

    /// Side length of a resize handle's hit area, in surface pixels.
    pub handle_hit_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_max_duration_ms: 250.0,
            click_max_distance_px: 5.0,
            min_draw_percent: 1.0,
            min_resize_px: 10.0,
            default_box_w: 15.0,
            default_box_h: 5.0,
            default_box_x: 42.5,
            default_box_y: 45.0,
            handle_hit_px: 10.0,
        }
    }
}

// ─── Playback ────────────────────────────────────────────────────────────

/// Feedback and auto-advance timings for test playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay after the final hotspot of a frame before advancing.
    pub advance_delay_ms: u32,
    /// Delay after the last input of an input-only frame is filled.
    pub input_advance_delay_ms: u32,
    /// How long positive hotspot feedback stays visible.
    pub correct_flash_ms: u32,
    /// How long negative feedback (wrong hotspot, off-target click) stays visible.
    pub mistake_flash_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: 300,
            input_advance_delay_ms: 100,
            correct_flash_ms: 300,
            mistake_flash_ms: 700,
        }
    }
}

// ─── Extraction ──────────────────────────────────────────────────────────

/// Frame sampling policy for the external extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Upper bound on frames taken from one video. Default: **10**.
    pub max_frames: usize,
    /// Preferred sampling rate for short videos, in frames per second.
    pub target_fps: f64,
    /// Largest accepted source video. Default: **200 MiB**.
    pub max_video_bytes: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_frames: 10,
            target_fps: 1.0,
            max_video_bytes: 200 * 1024 * 1024,
        }
    }
}

// ─── Notices ─────────────────────────────────────────────────────────────

/// Author-facing notice behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// How long a validation notice stays up before it expires.
    pub ttl_ms: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { ttl_ms: 3000 }
    }
}

// ─── Aggregate ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gesture: GestureConfig,
    pub session: SessionConfig,
    pub extraction: ExtractionConfig,
    pub notice: NoticeConfig,
}

impl Config {
    /// Parse a (possibly partial) JSON override document.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when the text is not valid JSON or a field
    /// has the wrong type.
    pub fn from_json_str(text: &str) -> FtResult<Self> {
        let config: Config = serde_json::from_str(text).map_err(FtError::InvalidConfig)?;
        log::debug!("loaded config overrides: {config:?}");
        Ok(config)
    }
}

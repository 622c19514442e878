//! Intake of frames produced by the external video extractor.
//!
//! Decoding video is not done here. The extractor asks for a sampling plan
//! ([`sample_timestamps`]), seeks to each timestamp, encodes a still, and
//! hands back [`ExtractedFrame`]s, which become authoring [`Frame`]s.

use crate::config::ExtractionConfig;
use crate::error::{FtError, FtResult};
use crate::model::{Frame, FrameImage};
use crate::package::probe_dimensions;

/// One still delivered by the extractor.
#[derive(Debug, Clone)]
pub struct ExtractedFrame {
    /// Position in the source video, in seconds.
    pub timestamp_secs: f64,
    /// Encoded image (JPEG).
    pub image: FrameImage,
    /// Native pixel size of `image`.
    pub width: u32,
    pub height: u32,
}

/// Timestamps (seconds) at which to grab frames from a video of `duration_secs`.
///
/// Takes `max_frames` evenly spaced stills. Videos shorter than
/// `max_frames / target_fps` seconds get `floor(duration * target_fps)`
/// stills instead, but never fewer than one.
pub fn sample_timestamps(duration_secs: f64, config: &ExtractionConfig) -> Vec<f64> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 || config.max_frames == 0 {
        return Vec::new();
    }

    let mut count = config.max_frames;
    if config.target_fps > 0.0 && duration_secs < config.max_frames as f64 / config.target_fps {
        count = ((duration_secs * config.target_fps).floor() as usize).max(1);
    }

    let interval = duration_secs / count as f64;
    (0..count).map(|i| i as f64 * interval).collect()
}

/// Reject source videos over the configured size limit.
pub fn check_video_size(len_bytes: u64, config: &ExtractionConfig) -> FtResult<()> {
    if len_bytes > config.max_video_bytes {
        let limit_mb = config.max_video_bytes / (1024 * 1024);
        return Err(FtError::validation(format!(
            "File is too large. Maximum size is {limit_mb}MB."
        )));
    }
    Ok(())
}

/// Turn extractor output into authoring frames: no boxes, all included.
///
/// Each still's header is probed. Stills that do not decode are dropped,
/// and the header size wins over the size the extractor reported.
pub fn frames_from_extraction(extracted: Vec<ExtractedFrame>) -> Vec<Frame> {
    extracted
        .into_iter()
        .filter_map(|e| {
            let name = format!("still at {:.2}s", e.timestamp_secs);
            let (width, height) = match probe_dimensions(&name, e.image.bytes()) {
                Ok(size) => size,
                Err(err) => {
                    log::warn!("dropping extracted frame: {err}");
                    return None;
                }
            };
            if (width, height) != (e.width, e.height) {
                log::warn!(
                    "{name}: extractor reported {}x{}, image is {width}x{height}",
                    e.width,
                    e.height
                );
            }
            log::trace!("intake {name} ({width}x{height}, {} bytes)", e.image.len());
            Some(Frame::new(e.image, width, height))
        })
        .collect()
}

//! Frame and box data model.
//!
//! A [`Frame`] is one still image taken from the source video together with
//! the boxes drawn on it. Boxes come in two variants, modelled as
//! [`BoxKind`]: ordered hotspots that must be clicked in sequence, and input
//! fields paired with an expected answer. The variant is fixed when a box is
//! created; only geometry, label, order and expected text change afterwards.

use crate::geometry::PercentRect;
use crate::id::{BoxId, FrameId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ─── Boxes ───────────────────────────────────────────────────────────────

/// The variant-specific part of a box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoxKind {
    /// Clickable region. `order` ≥ 1 defines the click sequence within a frame.
    Hotspot { order: u32 },
    /// Text entry region. An empty `expected` means "expects no input".
    InputField { expected: String },
}

/// Which variant a box is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxType {
    Hotspot,
    InputField,
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxType::Hotspot => f.write_str("hotspot"),
            BoxType::InputField => f.write_str("input field"),
        }
    }
}

/// One interactive region on a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameBox {
    pub id: BoxId,
    pub rect: PercentRect,
    pub label: String,
    kind: BoxKind,
}

impl FrameBox {
    pub fn hotspot(id: BoxId, rect: PercentRect, label: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            rect,
            label: label.into(),
            kind: BoxKind::Hotspot {
                order: order.max(1),
            },
        }
    }

    pub fn input_field(
        id: BoxId,
        rect: PercentRect,
        label: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            id,
            rect,
            label: label.into(),
            kind: BoxKind::InputField {
                expected: expected.into(),
            },
        }
    }

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn box_type(&self) -> BoxType {
        match self.kind {
            BoxKind::Hotspot { .. } => BoxType::Hotspot,
            BoxKind::InputField { .. } => BoxType::InputField,
        }
    }

    pub fn is_hotspot(&self) -> bool {
        matches!(self.kind, BoxKind::Hotspot { .. })
    }

    pub fn is_input_field(&self) -> bool {
        matches!(self.kind, BoxKind::InputField { .. })
    }

    /// Click order, for hotspots only.
    pub fn order(&self) -> Option<u32> {
        match self.kind {
            BoxKind::Hotspot { order } => Some(order),
            BoxKind::InputField { .. } => None,
        }
    }

    /// Expected answer, for input fields only.
    pub fn expected(&self) -> Option<&str> {
        match &self.kind {
            BoxKind::InputField { expected } => Some(expected),
            BoxKind::Hotspot { .. } => None,
        }
    }

    /// Change the click order. Returns `false` (and changes nothing) on an
    /// input field or for order 0.
    pub fn set_order(&mut self, new_order: u32) -> bool {
        match &mut self.kind {
            BoxKind::Hotspot { order } if new_order >= 1 => {
                *order = new_order;
                true
            }
            _ => false,
        }
    }

    /// Change the expected answer. Returns `false` on a hotspot.
    pub fn set_expected(&mut self, text: impl Into<String>) -> bool {
        match &mut self.kind {
            BoxKind::InputField { expected } => {
                *expected = text.into();
                true
            }
            BoxKind::Hotspot { .. } => false,
        }
    }
}

// ─── Frames ──────────────────────────────────────────────────────────────

/// Encoded raster data for a frame (JPEG as produced by the extractor).
///
/// Cheap to clone: sessions snapshot frames without copying image bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameImage(Arc<[u8]>);

impl FrameImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for FrameImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameImage({} bytes)", self.0.len())
    }
}

/// One still frame and the boxes drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub id: FrameId,
    pub image: FrameImage,
    /// Native pixel width of `image`. Only used for percent ⇄ pixel conversion.
    pub width: u32,
    /// Native pixel height of `image`.
    pub height: u32,
    /// Boxes in creation order (not display order).
    pub boxes: Vec<FrameBox>,
    pub include_in_test: bool,
}

impl Frame {
    /// A fresh frame with no boxes, included in the test.
    pub fn new(image: FrameImage, width: u32, height: u32) -> Self {
        Self {
            id: FrameId::with_prefix("frame"),
            image,
            width,
            height,
            boxes: Vec::new(),
            include_in_test: true,
        }
    }

    pub fn get(&self, id: BoxId) -> Option<&FrameBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut FrameBox> {
        self.boxes.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BoxId) -> bool {
        self.boxes.iter().any(|b| b.id == id)
    }

    pub fn hotspots(&self) -> impl Iterator<Item = &FrameBox> {
        self.boxes.iter().filter(|b| b.is_hotspot())
    }

    pub fn input_fields(&self) -> impl Iterator<Item = &FrameBox> {
        self.boxes.iter().filter(|b| b.is_input_field())
    }

    pub fn hotspot_count(&self) -> usize {
        self.hotspots().count()
    }

    pub fn input_count(&self) -> usize {
        self.input_fields().count()
    }

    pub fn has_hotspots(&self) -> bool {
        self.boxes.iter().any(FrameBox::is_hotspot)
    }

    /// Non-empty and made of input fields only.
    pub fn is_input_only(&self) -> bool {
        !self.boxes.is_empty() && self.boxes.iter().all(FrameBox::is_input_field)
    }

    /// The order a newly created hotspot receives: one past the highest in use.
    pub fn next_hotspot_order(&self) -> u32 {
        self.hotspots().filter_map(FrameBox::order).max().unwrap_or(0) + 1
    }

    /// The hotspot currently holding `order`, if any.
    pub fn hotspot_with_order(&self, order: u32) -> Option<&FrameBox> {
        self.hotspots().find(|b| b.order() == Some(order))
    }

    /// Remove a box, returning it if it was present.
    pub fn remove(&mut self, id: BoxId) -> Option<FrameBox> {
        let pos = self.boxes.iter().position(|b| b.id == id)?;
        Some(self.boxes.remove(pos))
    }
}

//! Package serializer: frames ⇄ manifest + images.
//!
//! A package is a flat set of named entries: one JSON manifest
//! ([`MANIFEST_NAME`]) plus one image per included frame, named
//! `frame_001.jpg`, `frame_002.jpg`, … in export order. Geometry is stored in
//! native pixels, so the manifest stays meaningful outside this crate.
//!
//! Bundling the entries into an archive and moving it around is the host's
//! job. The serializer only talks to a [`PackageSink`] on export and a
//! [`PackageSource`] on import.

use crate::error::{FtError, FtResult};
use crate::geometry::{PixelBox, clamp_rect, to_percent, to_pixels};
use crate::id::BoxId;
use crate::model::{BoxKind, Frame, FrameBox, FrameImage};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

/// Entry name of the manifest inside a package.
pub const MANIFEST_NAME: &str = "test.json";

/// Image entry name for the frame at `index` (0-based) in export order.
pub fn image_name(index: usize) -> String {
    format!("frame_{:03}.jpg", index + 1)
}

// ─── Manifest ────────────────────────────────────────────────────────────

/// One frame entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFrame {
    pub image: String,
    #[serde(default)]
    pub hotspots: Vec<ManifestHotspot>,
    #[serde(default)]
    pub inputs: Vec<ManifestInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHotspot {
    #[serde(deserialize_with = "pixel")]
    pub x: i64,
    #[serde(deserialize_with = "pixel")]
    pub y: i64,
    #[serde(deserialize_with = "pixel")]
    pub w: i64,
    #[serde(deserialize_with = "pixel")]
    pub h: i64,
    #[serde(default)]
    pub label: String,
    /// Packages written before hotspots were ordered carry no `order`.
    #[serde(default = "first_order")]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInput {
    #[serde(deserialize_with = "pixel")]
    pub x: i64,
    #[serde(deserialize_with = "pixel")]
    pub y: i64,
    #[serde(deserialize_with = "pixel")]
    pub w: i64,
    #[serde(deserialize_with = "pixel")]
    pub h: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub expected: String,
}

fn first_order() -> u32 {
    1
}

/// Accept any JSON number for a pixel coordinate, rounding to whole pixels.
fn pixel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let v = f64::deserialize(deserializer)?;
    Ok(v.round() as i64)
}

impl ManifestHotspot {
    fn pixel_box(&self) -> PixelBox {
        PixelBox {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

impl ManifestInput {
    fn pixel_box(&self) -> PixelBox {
        PixelBox {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Build manifest entries for `frames`, numbering images by position.
///
/// Callers pass only the frames that belong in the package.
pub fn build_manifest<'a>(frames: impl IntoIterator<Item = &'a Frame>) -> Vec<ManifestFrame> {
    frames
        .into_iter()
        .enumerate()
        .map(|(index, frame)| {
            let mut hotspots = Vec::new();
            let mut inputs = Vec::new();
            for b in &frame.boxes {
                let px = to_pixels(&b.rect, frame.width, frame.height);
                match b.kind() {
                    BoxKind::Hotspot { order } => hotspots.push(ManifestHotspot {
                        x: px.x,
                        y: px.y,
                        w: px.w,
                        h: px.h,
                        label: b.label.clone(),
                        order: *order,
                    }),
                    BoxKind::InputField { expected } => inputs.push(ManifestInput {
                        x: px.x,
                        y: px.y,
                        w: px.w,
                        h: px.h,
                        label: b.label.clone(),
                        expected: expected.clone(),
                    }),
                }
            }
            ManifestFrame {
                image: image_name(index),
                hotspots,
                inputs,
            }
        })
        .collect()
}

// ─── Sinks & sources ─────────────────────────────────────────────────────

/// Destination for package entries.
pub trait PackageSink {
    fn put(&mut self, name: &str, bytes: &[u8]) -> FtResult<()>;
}

/// Origin of package entries. `Ok(None)` means the entry does not exist.
pub trait PackageSource {
    fn get(&self, name: &str) -> FtResult<Option<Vec<u8>>>;
}

/// In-memory package, keyed by entry name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPackage {
    pub entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }
}

impl PackageSink for MemoryPackage {
    fn put(&mut self, name: &str, bytes: &[u8]) -> FtResult<()> {
        self.entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

impl PackageSource for MemoryPackage {
    fn get(&self, name: &str) -> FtResult<Option<Vec<u8>>> {
        Ok(self.entries.get(name).cloned())
    }
}

/// A package unpacked into a directory, one file per entry.
#[derive(Debug, Clone)]
pub struct DirPackage {
    root: PathBuf,
}

impl DirPackage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries live directly under the root. Anything else (absolute paths,
    /// `..`, nested directories) is refused.
    fn entry_path(&self, name: &str) -> FtResult<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Ok(self.root.join(file)),
            _ => Err(FtError::InvalidEntryName {
                name: name.to_string(),
            }),
        }
    }
}

impl PackageSink for DirPackage {
    fn put(&mut self, name: &str, bytes: &[u8]) -> FtResult<()> {
        let path = self.entry_path(name)?;
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl PackageSource for DirPackage {
    fn get(&self, name: &str) -> FtResult<Option<Vec<u8>>> {
        match std::fs::read(self.entry_path(name)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// ─── Export ──────────────────────────────────────────────────────────────

/// Write the included frames of `frames` to `sink`. Returns the number of
/// frames written.
///
/// # Errors
/// A validation error if no frame is included (nothing is written), or
/// whatever the sink reports.
pub fn export_package(frames: &[Frame], sink: &mut dyn PackageSink) -> FtResult<usize> {
    let included: Vec<&Frame> = frames.iter().filter(|f| f.include_in_test).collect();
    if included.is_empty() {
        return Err(FtError::validation(
            "Cannot export: No frames are selected for inclusion.",
        ));
    }

    let manifest = build_manifest(included.iter().copied());
    let json = serde_json::to_vec_pretty(&manifest).map_err(FtError::MalformedManifest)?;
    sink.put(MANIFEST_NAME, &json)?;

    for (entry, frame) in manifest.iter().zip(&included) {
        sink.put(&entry.image, frame.image.bytes())?;
    }

    log::debug!(
        "exported {} of {} frames",
        included.len(),
        frames.len()
    );
    Ok(included.len())
}

// ─── Import ──────────────────────────────────────────────────────────────

/// Rebuild frames from a package. All imported frames are included.
///
/// All-or-nothing: any missing or malformed entry fails the whole import.
pub fn import_package(source: &dyn PackageSource) -> FtResult<Vec<Frame>> {
    let raw = source
        .get(MANIFEST_NAME)?
        .ok_or_else(|| FtError::ManifestMissing {
            manifest: MANIFEST_NAME.to_string(),
        })?;
    let manifest: Vec<ManifestFrame> =
        serde_json::from_slice(&raw).map_err(FtError::MalformedManifest)?;

    let frames = manifest
        .iter()
        .map(|entry| import_frame(source, entry))
        .collect::<FtResult<Vec<_>>>()?;

    log::debug!("imported {} frames", frames.len());
    Ok(frames)
}

fn import_frame(source: &dyn PackageSource, entry: &ManifestFrame) -> FtResult<Frame> {
    let bytes = source
        .get(&entry.image)?
        .ok_or_else(|| FtError::ImageMissing {
            name: entry.image.clone(),
        })?;
    let (width, height) = probe_dimensions(&entry.image, &bytes)?;

    // Hand-edited manifests may place boxes partly off the image.
    let mut frame = Frame::new(FrameImage::new(bytes), width, height);
    for hs in &entry.hotspots {
        frame.boxes.push(FrameBox::hotspot(
            BoxId::with_prefix("hotspot"),
            clamp_rect(to_percent(&hs.pixel_box(), width, height), 0.0),
            hs.label.clone(),
            hs.order,
        ));
    }
    for input in &entry.inputs {
        frame.boxes.push(FrameBox::input_field(
            BoxId::with_prefix("input"),
            clamp_rect(to_percent(&input.pixel_box(), width, height), 0.0),
            input.label.clone(),
            input.expected.clone(),
        ));
    }
    Ok(frame)
}

/// Native pixel size of an encoded image, read from its header.
pub fn probe_dimensions(name: &str, bytes: &[u8]) -> FtResult<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|source| FtError::UndecodableImage {
            name: name.to_string(),
            source,
        })
}

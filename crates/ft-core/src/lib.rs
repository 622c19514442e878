pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod model;
pub mod package;

pub use config::{Config, ExtractionConfig, GestureConfig, NoticeConfig, SessionConfig};
pub use error::{FtError, FtResult, NOTHING_TO_TEST};
pub use geometry::{PercentRect, PixelBox, clamp_rect, to_percent, to_pixels};
pub use id::{BoxId, FrameId};
pub use model::*;
pub use package::{DirPackage, MemoryPackage, PackageSink, PackageSource, export_package, import_package};

// Re-export kurbo primitives so downstream crates share one geometry vocabulary
pub use kurbo::{Point, Size};

//! Error taxonomy.
//!
//! Only genuinely exceptional conditions become errors. Out-of-range
//! geometry is clamped and wrong clicks are scoring data, so neither shows
//! up here.

pub type FtResult<T> = Result<T, FtError>;

/// Starting a test (or snapshotting one) with every frame excluded.
pub const NOTHING_TO_TEST: &str = "Cannot start test: No frames are selected for inclusion.";

#[derive(thiserror::Error, Debug)]
pub enum FtError {
    /// The author asked for something the current state cannot support
    /// (e.g. exporting with no included frames). Nothing was mutated.
    #[error("{0}")]
    Validation(String),

    #[error("invalid test package: \"{manifest}\" not found")]
    ManifestMissing { manifest: String },

    #[error("image \"{name}\" specified in the manifest not found in the package")]
    ImageMissing { name: String },

    /// A manifest entry name that does not name a file at the package root.
    #[error("invalid test package: entry name \"{name}\" is not a plain file name")]
    InvalidEntryName { name: String },

    #[error("invalid test package: malformed manifest: {0}")]
    MalformedManifest(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("could not read image \"{name}\": {source}")]
    UndecodableImage {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FtError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the error came from package contents rather than from the
    /// author's request or the host.
    pub fn is_malformed_package(&self) -> bool {
        matches!(
            self,
            Self::ManifestMissing { .. }
                | Self::ImageMissing { .. }
                | Self::InvalidEntryName { .. }
                | Self::MalformedManifest(_)
                | Self::UndecodableImage { .. }
        )
    }
}

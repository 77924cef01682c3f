//! Error types for loading, querying and writing tile indexes.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while opening a [`TileIndex`](crate::TileIndex) from its artifacts.
///
/// A failed open never yields an instance, so callers cannot query a
/// partially loaded index.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt artifact {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Index and catalog are inconsistent: {0}")]
    Inconsistent(String),
}

impl LoadError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        LoadError::Corrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Outcomes of [`TileIndex::lookup`](crate::TileIndex::lookup) that carry no tiles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// The point lies outside the bounding box of every cataloged tile.
    #[error("No tile intersects ({longitude}, {latitude})")]
    NoIntersection { longitude: f64, latitude: f64 },

    /// Bounding boxes overlap the point but no tile geometry contains it.
    /// Not expected in a well-formed catalog.
    #[error(
        "{candidates} tile bounding box(es) overlap ({longitude}, {latitude}) \
         but no tile contains it"
    )]
    AmbiguousOverlap {
        longitude: f64,
        latitude: f64,
        candidates: usize,
    },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Errors in geometry construction and parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid ring: {0}")]
    InvalidRing(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid WKT: {0}")]
    Wkt(String),
}

/// Errors raised while writing index artifacts.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<GeometryError> for LookupError {
    fn from(err: GeometryError) -> Self {
        LookupError::InvalidCoordinate(err.to_string())
    }
}

/// Result type for opening an index
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for point lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type for writing artifacts
pub type WriteResult<T> = Result<T, WriteError>;

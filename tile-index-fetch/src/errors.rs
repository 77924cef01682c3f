use std::io;
use thiserror::Error;
use tile_index::{GeometryError, LoadError};

/// Errors raised while downloading artifacts.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Download of {url} produced no data")]
    Empty { url: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Errors raised by geocoders.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No location found for address: {0}")]
    NotFound(String),

    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Coordinate(#[from] GeometryError),
}

/// Result type for downloads
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for geocoding
pub type GeocodeResult<T> = Result<T, GeocodeError>;

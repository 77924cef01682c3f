//! # Tile Index Fetch
//!
//! Network collaborators for [`tile_index`]:
//!
//! - [`DownloadCache`] downloads a URL once and reuses the local file
//! - [`ArtifactFetcher`] fetches the three index artifacts and opens them
//! - [`NominatimGeocoder`] turns an address into a point
//!
//! HTTP goes through the [`Transport`] trait so everything here can run
//! against an in-memory transport.
//!
//! ```rust,no_run
//! use tile_index_fetch::{ArtifactFetcher, FetchConfig, Geocoder, NominatimGeocoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FetchConfig::default().cache_dir("/tmp/naip");
//! let index = ArtifactFetcher::from_config(&config)?.open_index("/tmp/naip")?;
//!
//! let point = NominatimGeocoder::from_config(&config)?.geocode("Minneapolis, MN")?;
//! for tile in index.lookup(point)? {
//!     println!("{}", tile);
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod cache;
pub mod config;
pub mod errors;
pub mod geocode;
pub mod progress;
pub mod transport;

#[cfg(test)]
mod testing;

pub use artifacts::ArtifactFetcher;
pub use cache::{url_to_file_name, DownloadCache};
pub use config::FetchConfig;
pub use errors::{FetchError, FetchResult, GeocodeError, GeocodeResult};
pub use geocode::{Geocoder, NominatimGeocoder};
pub use progress::{LogProgress, NoProgress, ProgressObserver};
pub use transport::{ReqwestTransport, Transport};

//! # Tile Index - point lookup of imagery tiles
//!
//! Given a longitude/latitude, find the imagery tiles whose footprint
//! contains it. The index is built from a catalog of tile footprints and
//! answers queries in two phases:
//!
//! - **Coarse**: an R-Tree over footprint bounding boxes yields candidates
//! - **Refine**: each candidate's exact polygon is tested, boundary-inclusive
//!
//! ## Artifacts
//!
//! An index is distributed as three files that must travel together:
//!
//! - `tile_index.dat` - the serialized R-Tree
//! - `tile_index.idx` - its metadata (entry count, bounds, checksum)
//! - `tiles.bin` - the catalog of tile identifiers and footprints
//!
//! [`CatalogBuilder`] writes them and [`TileIndex::open`] reads them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tile_index::{LookupError, TileIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = TileIndex::open("/tmp/naip")?;
//!
//! match index.lookup_lat_lon(45.03, -93.28) {
//!     Ok(tiles) => {
//!         for tile in tiles {
//!             println!("{}", tile.primary());
//!         }
//!     }
//!     Err(LookupError::NoIntersection { .. }) => println!("outside coverage"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod bounding_box;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod rtree;
mod tile_index;

pub use bounding_box::BoundingBox;
pub use builder::CatalogBuilder;
pub use catalog::{TileCatalog, TileId, TileRecord};
pub use config::{ArtifactLayout, OpenOptions};
pub use errors::{
    GeometryError, LoadError, LoadResult, LookupError, LookupResult, WriteError, WriteResult,
};
pub use geometry::{Coordinate, GeoPoint, Polygon};
pub use rtree::TileKey;
pub use tile_index::TileIndex;

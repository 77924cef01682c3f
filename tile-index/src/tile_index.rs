use std::collections::BTreeSet;
use std::path::Path;

use crate::artifacts;
use crate::bounding_box::BoundingBox;
use crate::catalog::{TileCatalog, TileId};
use crate::config::OpenOptions;
use crate::errors::{LoadError, LoadResult, LookupError, LookupResult};
use crate::geometry::{Coordinate, GeoPoint};
use crate::rtree::{TileEnvelope, TileKey, TileRTree};

/// Point lookup of tiles by footprint.
///
/// A lookup runs in two phases: the R-Tree yields every tile whose bounding
/// box touches the point, then each candidate's exact footprint is tested.
/// Once built the index is immutable, so it can be shared across threads
/// behind an `Arc` and queried without locking.
///
/// # Examples
///
/// ```rust
/// use tile_index::{CatalogBuilder, Polygon, TileIndex};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = CatalogBuilder::new()
///     .add("A", Polygon::from_tuples(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)])?)
///     .add("B", Polygon::from_tuples(&[(2.0, 0.0), (2.0, 2.0), (4.0, 2.0), (4.0, 0.0)])?)
///     .build();
///
/// let tiles = index.lookup((1.0, 1.0))?;
/// assert_eq!(tiles[0].primary(), "A");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TileIndex {
    rtree: TileRTree,
    catalog: TileCatalog,
}

impl TileIndex {
    /// Opens the index stored in `dir` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if an artifact is missing, unreadable or
    /// corrupt.
    pub fn open(dir: impl AsRef<Path>) -> LoadResult<Self> {
        Self::open_with(dir.as_ref(), &OpenOptions::default())
    }

    /// Returns options for opening an index.
    pub fn options() -> OpenOptions {
        OpenOptions::new()
    }

    pub(crate) fn open_with(dir: &Path, options: &OpenOptions) -> LoadResult<Self> {
        let layout = options.get_layout();
        log::debug!("Opening tile index at {:?}", dir);

        let header = artifacts::read_header(&layout.index_meta_path(dir))?;
        let rtree = artifacts::read_rtree(&layout.index_data_path(dir), &header)?;
        let catalog = artifacts::read_catalog(&layout.catalog_path(dir))?;

        let index = Self { rtree, catalog };
        match index.check_consistency() {
            Ok(()) => {}
            Err(reason) if options.is_strict() => return Err(LoadError::Inconsistent(reason)),
            Err(reason) => log::warn!("Tile index at {:?} is inconsistent: {}", dir, reason),
        }

        log::info!(
            "Opened tile index at {:?} with {} tiles",
            dir,
            index.catalog.len()
        );
        Ok(index)
    }

    /// Builds an index in memory from `catalog`.
    pub fn from_catalog(catalog: TileCatalog) -> Self {
        let entries = catalog
            .iter()
            .map(|(key, record)| TileEnvelope::new(key, &record.bounding_box()))
            .collect();
        Self {
            rtree: TileRTree::bulk_load(entries),
            catalog,
        }
    }

    pub(crate) fn into_parts(self) -> (TileRTree, TileCatalog) {
        (self.rtree, self.catalog)
    }

    /// Returns the tiles whose footprint contains `point`, in catalog order.
    /// Footprint boundaries are inclusive, so a point on an edge shared by
    /// two tiles returns both.
    ///
    /// # Errors
    ///
    /// - [`LookupError::NoIntersection`] if no tile's bounding box touches
    ///   the point.
    /// - [`LookupError::AmbiguousOverlap`] if some bounding boxes touch the
    ///   point but no footprint contains it.
    /// - [`LookupError::InvalidCoordinate`] for NaN or infinite input.
    pub fn lookup(&self, point: impl Into<Coordinate>) -> LookupResult<Vec<TileId>> {
        let point = point.into();
        if !point.is_finite() {
            return Err(LookupError::InvalidCoordinate(format!(
                "Query point must be finite, got: {}",
                point
            )));
        }

        let candidates = self.candidates(&point);
        if candidates.is_empty() {
            return Err(LookupError::NoIntersection {
                longitude: point.x,
                latitude: point.y,
            });
        }

        let mut tiles = Vec::with_capacity(candidates.len());
        for key in &candidates {
            match self.catalog.get(*key) {
                Some(record) if record.geometry().contains_point(&point) => {
                    tiles.push(record.identifier().clone());
                }
                Some(_) => {}
                None => log::warn!("Index key {} has no catalog entry", key),
            }
        }

        if tiles.is_empty() {
            log::warn!(
                "{} tile bounding box(es) overlap {} but no tile contains it",
                candidates.len(),
                point
            );
            return Err(LookupError::AmbiguousOverlap {
                longitude: point.x,
                latitude: point.y,
                candidates: candidates.len(),
            });
        }

        Ok(tiles)
    }

    /// Validates `latitude`/`longitude` and looks up the point.
    pub fn lookup_lat_lon(&self, latitude: f64, longitude: f64) -> LookupResult<Vec<TileId>> {
        let point = GeoPoint::new(latitude, longitude)?;
        self.lookup(point)
    }

    /// Keys whose bounding box touches `point` (the coarse phase of
    /// [`lookup`](Self::lookup)).
    pub fn candidates(&self, point: &Coordinate) -> Vec<TileKey> {
        self.rtree
            .find_intersecting_keys(&BoundingBox::from_point(point.x, point.y))
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Box covering every indexed tile, or `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.rtree.bounds()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Checks the 1:1 correspondence between index keys and catalog keys.
    fn check_consistency(&self) -> Result<(), String> {
        let keys: BTreeSet<TileKey> = self.rtree.keys().collect();
        if keys.len() != self.rtree.size() {
            return Err("Index contains duplicate keys".to_string());
        }

        let catalog_len = self.catalog.len() as TileKey;
        let dangling: Vec<_> = keys.range(catalog_len..).copied().collect();
        if !dangling.is_empty() {
            return Err(format!(
                "{} index key(s) have no catalog entry (first: {})",
                dangling.len(),
                dangling[0]
            ));
        }

        if keys.len() as TileKey != catalog_len {
            return Err(format!(
                "{} catalog entries are missing from the index",
                catalog_len - keys.len() as TileKey
            ));
        }
        Ok(())
    }
}

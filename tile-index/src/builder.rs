//! Produces index artifacts from tile records.

use std::fs;
use std::path::Path;

use crate::artifacts::{self, IndexHeader};
use crate::catalog::{TileCatalog, TileId, TileRecord};
use crate::config::ArtifactLayout;
use crate::errors::{GeometryError, WriteResult};
use crate::geometry::Polygon;
use crate::tile_index::TileIndex;

/// Collects tile records and writes the artifacts [`TileIndex::open`] reads.
///
/// Keys are assigned in insertion order.
///
/// ```rust,no_run
/// use tile_index::{CatalogBuilder, TileIndex};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// CatalogBuilder::new()
///     .add_wkt("A", "POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))")?
///     .write_to("/tmp/naip")?;
///
/// let index = TileIndex::open("/tmp/naip")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    records: Vec<TileRecord>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tile.
    pub fn add(mut self, identifier: impl Into<TileId>, geometry: Polygon) -> Self {
        self.records.push(TileRecord::new(identifier, geometry));
        self
    }

    /// Appends a tile whose footprint is given as WKT.
    pub fn add_wkt(self, identifier: impl Into<TileId>, wkt: &str) -> Result<Self, GeometryError> {
        let geometry = Polygon::from_wkt(wkt)?;
        Ok(self.add(identifier, geometry))
    }

    /// Appends a prepared record.
    pub fn push(&mut self, record: TileRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds the index in memory without writing artifacts.
    pub fn build(self) -> TileIndex {
        TileIndex::from_catalog(TileCatalog::new(self.records))
    }

    /// Writes the artifacts into `dir` using the default file names.
    pub fn write_to(self, dir: impl AsRef<Path>) -> WriteResult<IndexHeader> {
        self.write_with_layout(dir, &ArtifactLayout::default())
    }

    /// Writes the artifacts into `dir`, creating it if needed.
    pub fn write_with_layout(
        self,
        dir: impl AsRef<Path>,
        layout: &ArtifactLayout,
    ) -> WriteResult<IndexHeader> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let (rtree, catalog) = self.build().into_parts();
        let header = artifacts::write_rtree(
            &rtree,
            &layout.index_data_path(dir),
            &layout.index_meta_path(dir),
        )?;
        artifacts::write_catalog(&catalog, &layout.catalog_path(dir))?;

        log::info!(
            "Wrote tile index with {} tiles to {:?}",
            header.entry_count,
            dir
        );
        Ok(header)
    }
}

impl FromIterator<TileRecord> for CatalogBuilder {
    fn from_iter<T: IntoIterator<Item = TileRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LoadError, LookupError};
    use crate::OpenOptions;
    use tempfile::tempdir;

    fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
            .add_wkt("A", "POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))")
            .unwrap()
            .add_wkt("B", "POLYGON ((2 0, 2 2, 4 2, 4 0, 2 0))")
            .unwrap()
    }

    #[test]
    fn test_write_and_open() {
        let dir = tempdir().unwrap();
        let header = builder().write_to(dir.path()).unwrap();
        assert_eq!(header.entry_count, 2);

        for name in ArtifactLayout::default().file_names() {
            assert!(dir.path().join(name).is_file(), "{} not written", name);
        }

        let index = TileIndex::open(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        let tiles = index.lookup((1.0, 1.0)).unwrap();
        assert_eq!(tiles, vec![TileId::single("A")]);
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("naip").join("rtree");
        builder().write_to(&nested).unwrap();
        assert!(TileIndex::open(&nested).is_ok());
    }

    #[test]
    fn test_custom_layout() {
        let dir = tempdir().unwrap();
        let layout = ArtifactLayout::new("idx.dat", "idx.meta", "catalog.bin");
        builder().write_with_layout(dir.path(), &layout).unwrap();

        assert!(matches!(
            TileIndex::open(dir.path()),
            Err(LoadError::Missing { .. })
        ));
        let index = OpenOptions::new().layout(layout).open(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_build_in_memory() {
        let index = builder().build();
        assert!(matches!(
            index.lookup((9.0, 9.0)),
            Err(LookupError::NoIntersection { .. })
        ));
    }

    #[test]
    fn test_add_wkt_rejects_bad_geometry() {
        assert!(CatalogBuilder::new().add_wkt("A", "LINESTRING (0 0, 1 1)").is_err());
    }

    #[test]
    fn test_collect_records() {
        let index = builder().build();
        let mut copy: CatalogBuilder = index.catalog().records().iter().cloned().collect();
        assert_eq!(copy.len(), 2);

        let triangle = Polygon::from_tuples(&[(5.0, 5.0), (5.0, 6.0), (6.0, 6.0)]).unwrap();
        copy.push(TileRecord::new("C", triangle));
        assert_eq!(
            copy.build().lookup((5.2, 5.5)).unwrap(),
            vec![TileId::single("C")]
        );
    }
}

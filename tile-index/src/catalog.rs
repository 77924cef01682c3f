//! Tile records and the catalog that owns them.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::bounding_box::BoundingBox;
use crate::geometry::Polygon;
use crate::rtree::TileKey;

/// Identifies a tile by its file name, or by the ordered set of files that
/// make up one tile product (for example `.mrf`, `.idx` and `.lrc`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId {
    files: Vec<String>,
}

impl TileId {
    /// A tile stored in a single file.
    pub fn single(file: impl Into<String>) -> Self {
        Self {
            files: vec![file.into()],
        }
    }

    /// A tile spread over several associated files. The first is primary.
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// The file that opens the tile (first associated file), or `""` when
    /// the identifier carries no files.
    pub fn primary(&self) -> &str {
        self.files.first().map(String::as_str).unwrap_or_default()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

impl Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.files.join(", "))
    }
}

impl From<&str> for TileId {
    fn from(file: &str) -> Self {
        TileId::single(file)
    }
}

impl From<String> for TileId {
    fn from(file: String) -> Self {
        TileId::single(file)
    }
}

/// One tile: its identifier and exact footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    identifier: TileId,
    geometry: Polygon,
}

impl TileRecord {
    pub fn new(identifier: impl Into<TileId>, geometry: Polygon) -> Self {
        Self {
            identifier: identifier.into(),
            geometry,
        }
    }

    pub fn identifier(&self) -> &TileId {
        &self.identifier
    }

    pub fn geometry(&self) -> &Polygon {
        &self.geometry
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.geometry.bounding_box()
    }
}

/// Ordered tile records keyed by position.
///
/// The key of a record is its index in the catalog; the bounding-box index
/// stores the same keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileCatalog {
    records: Vec<TileRecord>,
}

impl TileCatalog {
    pub fn new(records: Vec<TileRecord>) -> Self {
        Self { records }
    }

    /// Gets the record stored under `key`.
    pub fn get(&self, key: TileKey) -> Option<&TileRecord> {
        usize::try_from(key).ok().and_then(|i| self.records.get(i))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates `(key, record)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (TileKey, &TileRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (i as TileKey, record))
    }

    pub fn records(&self) -> &[TileRecord] {
        &self.records
    }
}

impl FromIterator<TileRecord> for TileCatalog {
    fn from_iter<T: IntoIterator<Item = TileRecord>>(iter: T) -> Self {
        TileCatalog::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, x0: f64) -> TileRecord {
        let geometry =
            Polygon::from_tuples(&[(x0, 0.0), (x0, 1.0), (x0 + 1.0, 1.0), (x0 + 1.0, 0.0)])
                .unwrap();
        TileRecord::new(name, geometry)
    }

    #[test]
    fn test_tile_id_primary() {
        let id = TileId::from_files([
            "m_4509361_ne_15_1_20170902.mrf",
            "m_4509361_ne_15_1_20170902.idx",
            "m_4509361_ne_15_1_20170902.lrc",
        ]);
        assert_eq!(id.primary(), "m_4509361_ne_15_1_20170902.mrf");
        assert_eq!(id.files().len(), 3);

        let empty = TileId::from_files(Vec::<String>::new());
        assert_eq!(empty.primary(), "");
    }

    #[test]
    fn test_tile_id_display() {
        assert_eq!(TileId::from_files(["a.mrf", "a.idx"]).to_string(), "a.mrf, a.idx");
        assert_eq!(TileId::from("A").to_string(), "A");
    }

    #[test]
    fn test_catalog_keys_are_positions() {
        let catalog: TileCatalog = vec![record("A", 0.0), record("B", 1.0)]
            .into_iter()
            .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().identifier().primary(), "A");
        assert_eq!(catalog.get(1).unwrap().identifier().primary(), "B");
        assert!(catalog.get(2).is_none());

        let keys: Vec<_> = catalog.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![0, 1]);
    }

    #[test]
    fn test_record_bounding_box() {
        let r = record("A", 3.0);
        assert_eq!(r.bounding_box(), BoundingBox::new(3.0, 0.0, 4.0, 1.0));
    }
}

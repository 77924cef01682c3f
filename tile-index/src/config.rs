//! Artifact naming and open-time options.

use std::path::{Path, PathBuf};

use crate::errors::LoadResult;
use crate::tile_index::TileIndex;

/// Default file name of the serialized R-Tree.
pub const INDEX_DATA_FILE: &str = "tile_index.dat";

/// Default file name of the R-Tree's companion metadata.
pub const INDEX_META_FILE: &str = "tile_index.idx";

/// Default file name of the serialized tile catalog.
pub const CATALOG_FILE: &str = "tiles.bin";

/// File names of the three artifacts that make up an index.
///
/// The three files are produced together by
/// [`CatalogBuilder`](crate::CatalogBuilder) and must be distributed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    index_data: String,
    index_meta: String,
    catalog: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            index_data: INDEX_DATA_FILE.to_string(),
            index_meta: INDEX_META_FILE.to_string(),
            catalog: CATALOG_FILE.to_string(),
        }
    }
}

impl ArtifactLayout {
    pub fn new(
        index_data: impl Into<String>,
        index_meta: impl Into<String>,
        catalog: impl Into<String>,
    ) -> Self {
        Self {
            index_data: index_data.into(),
            index_meta: index_meta.into(),
            catalog: catalog.into(),
        }
    }

    pub fn index_data(&self) -> &str {
        &self.index_data
    }

    pub fn index_meta(&self) -> &str {
        &self.index_meta
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    /// All artifact file names, in fetch order.
    pub fn file_names(&self) -> [&str; 3] {
        [&self.index_data, &self.index_meta, &self.catalog]
    }

    pub fn index_data_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.index_data)
    }

    pub fn index_meta_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.index_meta)
    }

    pub fn catalog_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.catalog)
    }
}

/// Options for opening a [`TileIndex`].
///
/// # Examples
///
/// ```rust,no_run
/// use tile_index::TileIndex;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = TileIndex::options()
///     .strict_consistency(true)
///     .open("/tmp/naip")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    layout: ArtifactLayout,
    strict_consistency: bool,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the artifact file names.
    pub fn layout(mut self, layout: ArtifactLayout) -> Self {
        self.layout = layout;
        self
    }

    /// When enabled, `open` fails with
    /// [`LoadError::Inconsistent`](crate::LoadError::Inconsistent) if the
    /// index keys and the catalog keys differ. When disabled (the default) a
    /// mismatch surfaces per query as
    /// [`LookupError::AmbiguousOverlap`](crate::LookupError::AmbiguousOverlap).
    pub fn strict_consistency(mut self, strict: bool) -> Self {
        self.strict_consistency = strict;
        self
    }

    pub fn get_layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub fn is_strict(&self) -> bool {
        self.strict_consistency
    }

    /// Opens the index stored in `dir`.
    pub fn open(&self, dir: impl AsRef<Path>) -> LoadResult<TileIndex> {
        TileIndex::open_with(dir.as_ref(), self)
    }
}

//! Reading and writing the three index artifacts.
//!
//! - index data: bincode-encoded [`TileRTree`]
//! - index metadata: bincode-encoded [`IndexHeader`] describing the data file
//! - catalog: bincode-encoded [`CatalogFile`]
//!
//! The header carries a CRC32 of the data file so a truncated or mixed-up
//! data file is reported as corrupt rather than decoded into a wrong tree.

use memmap2::Mmap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::bounding_box::BoundingBox;
use crate::catalog::TileCatalog;
use crate::errors::{LoadError, LoadResult, WriteError, WriteResult};
use crate::rtree::TileRTree;

/// Magic number of the index metadata file ("TIDX")
pub const INDEX_MAGIC: u32 = 0x5449_4458;

/// Magic number of the catalog file ("TCAT")
pub const CATALOG_MAGIC: u32 = 0x5443_4154;

/// Artifact format version
pub const FORMAT_VERSION: u32 = 1;

/// Companion metadata of the index data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHeader {
    pub magic: u32,
    pub version: u32,
    pub entry_count: u64,
    pub bounds: BoundingBox,
    pub data_len: u64,
    pub data_checksum: u32,
}

impl IndexHeader {
    pub fn new(entry_count: u64, bounds: BoundingBox, data: &[u8]) -> Self {
        Self {
            magic: INDEX_MAGIC,
            version: FORMAT_VERSION,
            entry_count,
            bounds,
            data_len: data.len() as u64,
            data_checksum: crc32(data),
        }
    }

    /// Checks the magic and format version.
    pub fn validate(&self) -> Result<(), String> {
        if self.magic != INDEX_MAGIC {
            return Err("Invalid file format (bad magic)".into());
        }
        if self.version != FORMAT_VERSION {
            return Err(format!("Unsupported format version {}", self.version));
        }
        if self.entry_count > 0 && !self.bounds.is_valid() {
            return Err(format!("Invalid index bounds {}", self.bounds));
        }
        Ok(())
    }

    /// Checks that `data` is the file this header was written for.
    pub fn verify(&self, data: &[u8]) -> Result<(), String> {
        if data.len() as u64 != self.data_len {
            return Err(format!(
                "Index data length mismatch (expected: {}, got: {})",
                self.data_len,
                data.len()
            ));
        }
        let actual = crc32(data);
        if actual != self.data_checksum {
            return Err(format!(
                "Index data checksum mismatch - possible corruption (expected: {:x}, got: {:x})",
                self.data_checksum, actual
            ));
        }
        Ok(())
    }
}

/// On-disk form of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub magic: u32,
    pub version: u32,
    pub catalog: TileCatalog,
}

impl CatalogFile {
    pub fn new(catalog: TileCatalog) -> Self {
        Self {
            magic: CATALOG_MAGIC,
            version: FORMAT_VERSION,
            catalog,
        }
    }
}

/// CRC32-MPEG2 checksum.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFFFFFF;
    const POLY: u32 = 0x04C11DB7;

    for &byte in data {
        crc ^= (byte as u32) << 24;
        for _ in 0..8 {
            crc = if crc & 0x80000000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }

    crc ^ 0xFFFFFFFF
}

fn map_file(path: &Path) -> LoadResult<Mmap> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    // SAFETY: artifacts are read-only inputs; the map is dropped before
    // `open` returns and nothing in this process writes to the file.
    unsafe { Mmap::map(&file) }.map_err(|e| LoadError::io(path, e))
}

fn decode<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> LoadResult<T> {
    bincode::serde::decode_from_slice(bytes, bincode::config::legacy())
        .map(|(value, _)| value)
        .map_err(|e| LoadError::corrupt(path, e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> WriteResult<Vec<u8>> {
    bincode::serde::encode_to_vec(value, bincode::config::legacy())
        .map_err(|e| WriteError::Serialization(e.to_string()))
}

/// Reads and validates the metadata file.
pub fn read_header(path: &Path) -> LoadResult<IndexHeader> {
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let header: IndexHeader = decode(path, &bytes)?;
    header
        .validate()
        .map_err(|reason| LoadError::corrupt(path, reason))?;
    Ok(header)
}

/// Reads the R-Tree, verifying it against `header`.
pub fn read_rtree(path: &Path, header: &IndexHeader) -> LoadResult<TileRTree> {
    let data = map_file(path)?;
    log::debug!("Mapped index data {:?} ({} bytes)", path, data.len());

    header
        .verify(&data)
        .map_err(|reason| LoadError::corrupt(path, reason))?;
    let tree: TileRTree = decode(path, &data)?;

    if tree.size() as u64 != header.entry_count {
        return Err(LoadError::corrupt(
            path,
            format!(
                "Index holds {} entries but metadata records {}",
                tree.size(),
                header.entry_count
            ),
        ));
    }
    Ok(tree)
}

/// Reads the catalog file.
pub fn read_catalog(path: &Path) -> LoadResult<TileCatalog> {
    let data = map_file(path)?;
    log::debug!("Mapped catalog {:?} ({} bytes)", path, data.len());

    let file: CatalogFile = decode(path, &data)?;
    if file.magic != CATALOG_MAGIC {
        return Err(LoadError::corrupt(path, "Invalid file format (bad magic)"));
    }
    if file.version != FORMAT_VERSION {
        return Err(LoadError::corrupt(
            path,
            format!("Unsupported format version {}", file.version),
        ));
    }
    Ok(file.catalog)
}

/// Writes the index data and its metadata. Returns the header written.
pub fn write_rtree(tree: &TileRTree, data_path: &Path, meta_path: &Path) -> WriteResult<IndexHeader> {
    let data = encode(tree)?;
    let header = IndexHeader::new(
        tree.size() as u64,
        tree.bounds().unwrap_or_default(),
        &data,
    );
    write_file(data_path, &data)?;
    write_file(meta_path, &encode(&header)?)?;
    Ok(header)
}

/// Writes the catalog file.
pub fn write_catalog(catalog: &TileCatalog, path: &Path) -> WriteResult<()> {
    let bytes = encode(&CatalogFile::new(catalog.clone()))?;
    write_file(path, &bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> WriteResult<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    log::debug!("Wrote {:?} ({} bytes)", path, bytes.len());
    Ok(())
}

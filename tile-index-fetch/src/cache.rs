//! Download-with-cache.
//!
//! A destination that already exists is never downloaded again unless the
//! cache is forced. Bodies are streamed into a temporary file next to the
//! destination and renamed into place, so two concurrent fetches of the same
//! destination both leave a complete file behind.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult};
use crate::progress::ProgressObserver;
use crate::transport::Transport;

/// Derives a cache file name from a URL.
///
/// Unique enough for the artifact URLs this crate fetches; not a general
/// purpose URL escape.
pub fn url_to_file_name(url: &str) -> String {
    url.replace("://", "_").replace('/', "_")
}

/// Downloads files through a [`Transport`], skipping existing ones.
pub struct DownloadCache<T: Transport> {
    transport: T,
    cache_dir: PathBuf,
    force: bool,
}

impl<T: Transport> DownloadCache<T> {
    pub fn new(transport: T, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            cache_dir: cache_dir.into(),
            force: false,
        }
    }

    pub fn from_config(transport: T, config: &FetchConfig) -> Self {
        Self::new(transport, config.get_cache_dir()).force(config.is_forced())
    }

    /// Re-download even when the destination exists.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Where `url` is stored when no destination is given.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(url_to_file_name(url))
    }

    /// Downloads `url` to `destination` (or to [`cache_path`](Self::cache_path))
    /// and returns the local path.
    ///
    /// On success the returned file exists and is non-empty.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Empty`] if the server returned no data
    /// - transport and I/O errors otherwise; the destination is left untouched
    pub fn fetch(
        &self,
        url: &str,
        destination: Option<&Path>,
        progress: &mut dyn ProgressObserver,
    ) -> FetchResult<PathBuf> {
        let destination = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cache_path(url));

        if !self.force && is_non_empty_file(&destination) {
            log::info!(
                "Bypassing download of already-downloaded file {}",
                file_name(url)
            );
            return Ok(destination);
        }

        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        log::info!("Downloading file {} to {:?}", file_name(url), destination);
        let mut partial = NamedTempFile::new_in(parent)?;
        let bytes = self.transport.get(url, partial.as_file_mut(), progress)?;
        if bytes == 0 {
            return Err(FetchError::Empty {
                url: url.to_string(),
            });
        }

        partial
            .persist(&destination)
            .map_err(|e| FetchError::Io(e.error))?;
        log::info!("...done, {} bytes.", bytes);

        Ok(destination)
    }
}

fn is_non_empty_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

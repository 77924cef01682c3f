use std::path::{Path, PathBuf};

use tile_index::{ArtifactLayout, OpenOptions, TileIndex};

use crate::cache::DownloadCache;
use crate::config::FetchConfig;
use crate::errors::FetchResult;
use crate::progress::LogProgress;
use crate::transport::{ReqwestTransport, Transport};

/// Fetches the three index artifacts from a base URL and opens them.
///
/// ```rust,no_run
/// use tile_index_fetch::ArtifactFetcher;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = ArtifactFetcher::with_defaults()?;
/// let index = fetcher.open_index("/tmp/naip")?;
/// let tiles = index.lookup_lat_lon(45.03, -93.28)?;
/// # Ok(())
/// # }
/// ```
pub struct ArtifactFetcher<T: Transport> {
    cache: DownloadCache<T>,
    base_url: String,
    layout: ArtifactLayout,
}

impl ArtifactFetcher<ReqwestTransport> {
    /// A fetcher for the published NAIP index using a reqwest transport.
    pub fn with_defaults() -> FetchResult<Self> {
        Self::from_config(&FetchConfig::default())
    }

    pub fn from_config(config: &FetchConfig) -> FetchResult<Self> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(
            DownloadCache::from_config(transport, config),
            config.get_base_url(),
        ))
    }
}

impl<T: Transport> ArtifactFetcher<T> {
    pub fn new(cache: DownloadCache<T>, base_url: impl Into<String>) -> Self {
        Self {
            cache,
            base_url: base_url.into(),
            layout: ArtifactLayout::default(),
        }
    }

    /// Sets the artifact file names to fetch and open.
    pub fn layout(mut self, layout: ArtifactLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn cache(&self) -> &DownloadCache<T> {
        &self.cache
    }

    /// URL of one artifact.
    pub fn artifact_url(&self, file_name: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, file_name)
        } else {
            format!("{}/{}", self.base_url, file_name)
        }
    }

    /// Makes sure every artifact exists in `dir`, downloading missing ones.
    pub fn fetch_all(&self, dir: impl AsRef<Path>) -> FetchResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        self.layout
            .file_names()
            .iter()
            .map(|name| {
                let url = self.artifact_url(name);
                self.cache
                    .fetch(&url, Some(dir.join(name).as_path()), &mut LogProgress::new(*name))
            })
            .collect()
    }

    /// Fetches the artifacts into `dir` and opens the index.
    pub fn open_index(&self, dir: impl AsRef<Path>) -> FetchResult<TileIndex> {
        self.open_index_with(dir, OpenOptions::new())
    }

    /// Like [`open_index`](Self::open_index) with explicit open options. The
    /// fetcher's layout replaces the one in `options`.
    pub fn open_index_with(
        &self,
        dir: impl AsRef<Path>,
        options: OpenOptions,
    ) -> FetchResult<TileIndex> {
        let dir = dir.as_ref();
        self.fetch_all(dir)?;
        Ok(options.layout(self.layout.clone()).open(dir)?)
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote directory holding the published NAIP index artifacts.
pub const DEFAULT_BASE_URL: &str = "https://naipblobs.blob.core.windows.net/naip-index/rtree/";

/// Nominatim search endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// User agent sent with every request. Nominatim rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "NAIP";

/// Default request timeout. Index artifacts are large.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Settings for downloads and geocoding.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tile_index_fetch::FetchConfig;
///
/// let config = FetchConfig::default()
///     .cache_dir("/var/cache/naip")
///     .timeout(Duration::from_secs(60))
///     .force(true);
/// assert!(config.is_forced());
/// ```
#[derive(Debug, Clone)]
pub struct FetchConfig {
    base_url: String,
    geocoder_url: String,
    cache_dir: PathBuf,
    force: bool,
    timeout: Duration,
    user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            cache_dir: std::env::temp_dir().join("naip"),
            force: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Sets the URL the artifact file names are appended to.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn geocoder_url(mut self, geocoder_url: impl Into<String>) -> Self {
        self.geocoder_url = geocoder_url.into();
        self
    }

    /// Sets the directory for downloads without an explicit destination.
    pub fn cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Re-download files even if they already exist.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get_geocoder_url(&self) -> &str {
        &self.geocoder_url
    }

    pub fn get_cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn is_forced(&self) -> bool {
        self.force
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_user_agent(&self) -> &str {
        &self.user_agent
    }
}

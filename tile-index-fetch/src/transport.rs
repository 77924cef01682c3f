//! HTTP transport abstraction for testability

use std::io::{Read, Write};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult};
use crate::progress::ProgressObserver;

const CHUNK_SIZE: usize = 64 * 1024;

/// Streams the body of a URL into a writer.
///
/// This abstraction allows mock transports in tests.
pub trait Transport: Send + Sync {
    /// Performs a GET request, copying the response body into `sink`.
    ///
    /// Returns the number of bytes written.
    fn get(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn ProgressObserver,
    ) -> FetchResult<u64>;
}

/// Blocking transport backed by reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default timeout and user agent.
    pub fn new() -> FetchResult<Self> {
        Self::from_config(&FetchConfig::default())
    }

    pub fn from_config(config: &FetchConfig) -> FetchResult<Self> {
        Self::with_settings(config.get_timeout(), config.get_user_agent())
    }

    pub fn with_settings(timeout: Duration, user_agent: &str) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn ProgressObserver,
    ) -> FetchResult<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let total = response.content_length();
        progress.on_progress(0, total);

        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut transferred = 0u64;
        loop {
            let n = response
                .read(&mut buffer)
                .map_err(|e| FetchError::Http(format!("Failed to read response: {}", e)))?;
            if n == 0 {
                break;
            }
            sink.write_all(&buffer[..n])?;
            transferred += n as u64;
            progress.on_progress(transferred, total);
        }
        sink.flush()?;

        Ok(transferred)
    }
}

//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::{FetchError, FetchResult};
use crate::progress::ProgressObserver;
use crate::transport::Transport;

/// Serves fixed bodies by URL; unknown URLs answer 404.
#[derive(Default)]
pub struct MockTransport {
    bodies: HashMap<String, Vec<u8>>,
    requests: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn get(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn ProgressObserver,
    ) -> FetchResult<u64> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let body = self.bodies.get(url).ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })?;

        let total = Some(body.len() as u64);
        progress.on_progress(0, total);
        sink.write_all(body)?;
        progress.on_progress(body.len() as u64, total);
        Ok(body.len() as u64)
    }
}

//! Download progress observers.
//!
//! Progress is purely observational: an observer cannot affect the outcome
//! of a transfer.

/// Receives `(bytes transferred, total bytes)` as a transfer proceeds.
/// `total` is `None` when the server does not announce a length.
pub trait ProgressObserver {
    fn on_progress(&mut self, transferred: u64, total: Option<u64>);
}

impl<F> ProgressObserver for F
where
    F: FnMut(u64, Option<u64>),
{
    fn on_progress(&mut self, transferred: u64, total: Option<u64>) {
        self(transferred, total)
    }
}

/// Ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _transferred: u64, _total: Option<u64>) {}
}

/// Logs progress at info level every 10 percent.
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
    next_percent: u64,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            next_percent: 0,
        }
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, transferred: u64, total: Option<u64>) {
        let Some(total) = total.filter(|t| *t > 0) else {
            log::trace!("{}: {} bytes", self.label, transferred);
            return;
        };

        let percent = (transferred.min(total) * 100) / total;
        if percent >= self.next_percent {
            log::info!("{}: {}% ({} of {} bytes)", self.label, percent, transferred, total);
            self.next_percent = (percent / 10 + 1) * 10;
        }
    }
}

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Write};
use std::panic::{self, RefUnwindSafe, UnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::{env, thread};
use std::time::Duration;

use tile_index::{CatalogBuilder, LoadResult, Polygon, TileIndex};
use tile_index_fetch::{FetchError, FetchResult, ProgressObserver, Transport};

pub type TestResult<T> = Result<T, Box<dyn Error>>;

/// Runs a test between a setup and a teardown step.
/// The teardown runs even when the test fails or panics.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> TestResult<()> + UnwindSafe + RefUnwindSafe,
    B: Fn() -> TestResult<TestContext>,
    A: Fn(TestContext) -> TestResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_ctx = ctx.clone();
    let result = panic::catch_unwind(move || test(test_ctx));

    if let Err(e) = after(ctx) {
        eprintln!("After run failed: {:?}", e);
    }

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(payload) => panic::resume_unwind(payload),
    }
}

#[derive(Clone, Debug)]
pub struct TestContext {
    path: PathBuf,
}

impl TestContext {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> LoadResult<TileIndex> {
        TileIndex::open(&self.path)
    }

    pub fn open_strict(&self) -> LoadResult<TileIndex> {
        TileIndex::options()
            .strict_consistency(true)
            .open(&self.path)
    }
}

pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("tile-index-{}", id))
}

/// Axis-aligned square footprint with its lower-left corner at `(x, y)`.
pub fn square(x: f64, y: f64, size: f64) -> Polygon {
    Polygon::from_tuples(&[
        (x, y),
        (x, y + size),
        (x + size, y + size),
        (x + size, y),
    ])
    .unwrap()
}

/// Two unit-height tiles sharing the edge `x = 2`:
/// `A` covers `[0,2]x[0,2]` and `B` covers `[2,4]x[0,2]`.
pub fn scenario_builder() -> CatalogBuilder {
    CatalogBuilder::new()
        .add("A", square(0.0, 0.0, 2.0))
        .add("B", square(2.0, 0.0, 2.0))
}

/// `cols * rows` non-overlapping square tiles named `tile_<col>_<row>`.
pub fn grid_builder(cols: usize, rows: usize, size: f64) -> CatalogBuilder {
    let mut builder = CatalogBuilder::new();
    for col in 0..cols {
        for row in 0..rows {
            builder = builder.add(
                format!("tile_{}_{}", col, row),
                square(col as f64 * size, row as f64 * size, size),
            );
        }
    }
    builder
}

/// Writes `builder` to a fresh directory.
pub fn create_context_with(builder: CatalogBuilder) -> TestResult<TestContext> {
    let path = random_path();
    builder.write_to(&path)?;
    Ok(TestContext::new(path))
}

pub fn create_test_context() -> TestResult<TestContext> {
    create_context_with(scenario_builder())
}

pub fn create_grid_context() -> TestResult<TestContext> {
    create_context_with(grid_builder(16, 16, 0.0625))
}

/// A fresh directory with no artifacts in it.
pub fn create_empty_context() -> TestResult<TestContext> {
    let path = random_path();
    fs::create_dir_all(&path)?;
    Ok(TestContext::new(path))
}

pub fn cleanup(ctx: TestContext) -> TestResult<()> {
    const MAX_ATTEMPTS: u32 = 3;
    for attempt in 1..=MAX_ATTEMPTS {
        match fs::remove_dir_all(ctx.path()) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) if attempt == MAX_ATTEMPTS => return Err(e.into()),
            Err(_) => thread::sleep(Duration::from_millis(50 * attempt as u64)),
        }
    }
    Ok(())
}

/// Serves the files of a local directory as if they were published under
/// `base_url`. Unknown files answer 404.
pub struct DirectoryTransport {
    base_url: String,
    root: PathBuf,
    requests: AtomicUsize,
}

impl DirectoryTransport {
    pub fn new(base_url: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            root: root.into(),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Transport for DirectoryTransport {
    fn get(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn ProgressObserver,
    ) -> FetchResult<u64> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let not_found = || FetchError::Status {
            url: url.to_string(),
            status: 404,
        };

        let name = url.strip_prefix(&self.base_url).ok_or_else(not_found)?;
        let mut file = File::open(self.root.join(name)).map_err(|_| not_found())?;

        let total = file.metadata()?.len();
        progress.on_progress(0, Some(total));
        let copied = io::copy(&mut file, sink)?;
        progress.on_progress(copied, Some(total));
        Ok(copied)
    }
}

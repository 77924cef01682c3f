use rand::Rng;
use tile_index_int_test::test_util::{cleanup, create_context_with, grid_builder, TestResult};

fn main() -> TestResult<()> {
    println!("Starting lookup stress test...");
    let size = 0.0625;
    let cells = 256;

    let start = std::time::Instant::now();
    let ctx = create_context_with(grid_builder(cells, cells, size))?;
    println!("Wrote {} tiles in {:?}", cells * cells, start.elapsed());

    let start = std::time::Instant::now();
    let index = ctx.open()?;
    println!("Opened index in {:?}", start.elapsed());

    let extent = cells as f64 * size;
    let count = 1_000_000;
    let mut rng = rand::rng();
    let mut hits = 0usize;

    let start = std::time::Instant::now();
    for _ in 0..count {
        let point = (rng.random_range(0.0..extent), rng.random_range(0.0..extent));
        hits += index.lookup(point)?.len();
    }
    println!("Ran {} lookups ({} hits) in {:?}", count, hits, start.elapsed());

    cleanup(ctx)
}

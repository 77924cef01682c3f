//! Opening damaged or mismatched artifacts.

use std::fs;

use tile_index::artifacts::{read_catalog, write_catalog};
use tile_index::config::{CATALOG_FILE, INDEX_DATA_FILE, INDEX_META_FILE};
use tile_index::{LoadError, LookupError, TileCatalog};
use tile_index_int_test::test_util::{
    cleanup, create_empty_context, create_test_context, run_test, TestContext, TestResult,
};

/// Rewrites the catalog without its last record, leaving the index intact.
fn drop_last_catalog_entry(ctx: &TestContext) -> TestResult<()> {
    let path = ctx.path().join(CATALOG_FILE);
    let catalog = read_catalog(&path)?;
    let mut records = catalog.records().to_vec();
    records.pop();
    write_catalog(&TileCatalog::new(records), &path)?;
    Ok(())
}

#[test]
fn test_removed_catalog_entry_is_ambiguous() {
    run_test(
        create_test_context,
        |ctx| {
            drop_last_catalog_entry(&ctx)?;
            let index = ctx.open()?;

            // only B covers (3, 1) and B's record is gone
            assert!(matches!(
                index.lookup((3.0, 1.0)),
                Err(LookupError::AmbiguousOverlap { candidates: 1, .. })
            ));
            // A is unaffected, and the shared edge still finds it
            assert_eq!(index.lookup((1.0, 1.0))?[0].primary(), "A");
            let edge = index.lookup((2.0, 1.0))?;
            assert_eq!(edge.len(), 1);
            assert_eq!(edge[0].primary(), "A");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_removed_catalog_entry_fails_strict_open() {
    run_test(
        create_test_context,
        |ctx| {
            drop_last_catalog_entry(&ctx)?;
            assert!(matches!(ctx.open_strict(), Err(LoadError::Inconsistent(_))));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_consistent_index_opens_strict() {
    run_test(
        create_test_context,
        |ctx| {
            let index = ctx.open_strict()?;
            assert_eq!(index.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_artifacts() {
    run_test(
        create_empty_context,
        |ctx| {
            assert!(matches!(ctx.open(), Err(LoadError::Missing { .. })));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_each_missing_artifact() {
    for name in [INDEX_DATA_FILE, INDEX_META_FILE, CATALOG_FILE] {
        run_test(
            create_test_context,
            move |ctx| {
                fs::remove_file(ctx.path().join(name))?;
                match ctx.open() {
                    Err(LoadError::Missing { path }) => assert!(path.ends_with(name)),
                    other => panic!("expected missing {}, got {:?}", name, other),
                }
                Ok(())
            },
            cleanup,
        )
    }
}

#[test]
fn test_flipped_byte_in_index_data() {
    run_test(
        create_test_context,
        |ctx| {
            let path = ctx.path().join(INDEX_DATA_FILE);
            let mut bytes = fs::read(&path)?;
            let last = bytes.len() - 1;
            bytes[last] ^= 0xFF;
            fs::write(&path, bytes)?;

            assert!(matches!(ctx.open(), Err(LoadError::Corrupt { .. })));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_truncated_catalog() {
    run_test(
        create_test_context,
        |ctx| {
            let path = ctx.path().join(CATALOG_FILE);
            let bytes = fs::read(&path)?;
            fs::write(&path, &bytes[..bytes.len() / 2])?;

            assert!(matches!(ctx.open(), Err(LoadError::Corrupt { .. })));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_swapped_artifacts() {
    run_test(
        create_test_context,
        |ctx| {
            let data = ctx.path().join(INDEX_DATA_FILE);
            let catalog = ctx.path().join(CATALOG_FILE);
            let data_bytes = fs::read(&data)?;
            fs::write(&catalog, data_bytes)?;

            assert!(matches!(ctx.open(), Err(LoadError::Corrupt { .. })));
            Ok(())
        },
        cleanup,
    )
}

//! File-backed tests: restart behavior and concurrent writers/readers.

use std::collections::HashSet;
use std::path::Path;

use catalog_db::{Database, DbConfig, SearchPath};

async fn open(path: &Path) -> Database {
    Database::new(DbConfig::new(path).max_connections(4))
        .await
        .unwrap()
}

#[tokio::test]
async fn reopen_preserves_products_and_search() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let db = open(&path).await;
    db.catalog().generate(75, Some(21)).await.unwrap();
    let before = db.catalog().list(1, 50).await.unwrap();
    let search_before = db.catalog().search("acme", 1, 50).await.unwrap();
    db.close().await;

    let db = open(&path).await;
    let after = db.catalog().list(1, 50).await.unwrap();
    assert_eq!(after.total, 75);
    assert_eq!(after.total, before.total);

    let ids = |items: &[catalog_core::Product]| items.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids(&after.items), ids(&before.items));

    let search_after = db.catalog().search("acme", 1, 50).await.unwrap();
    assert_eq!(search_after.total, search_before.total);

    // Nothing to repair after a clean shutdown.
    assert!(!db.search_index().ensure_consistent().await.unwrap());
    db.close().await;
}

#[tokio::test]
async fn dropped_index_is_rebuilt_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let db = open(&path).await;
    db.catalog().generate(40, Some(3)).await.unwrap();
    let expected = db.catalog().search("Umbrella", 1, 50).await.unwrap().total;

    sqlx::query("DROP TABLE products_fts")
        .execute(db.pool())
        .await
        .unwrap();
    db.close().await;

    let db = open(&path).await;
    assert_eq!(db.search_index().len().await.unwrap(), 40);

    let outcome = db
        .catalog()
        .search_detailed("Umbrella", 1, 50)
        .await
        .unwrap();
    assert_eq!(outcome.page.total, expected);
    if expected > 0 {
        assert_eq!(outcome.path, Some(SearchPath::Index));
    }
    db.close().await;
}

#[tokio::test]
async fn stale_index_is_rebuilt_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let db = open(&path).await;
    db.catalog().generate(30, Some(9)).await.unwrap();
    sqlx::query("DELETE FROM products_fts")
        .execute(db.pool())
        .await
        .unwrap();
    db.close().await;

    let db = open(&path).await;
    assert_eq!(db.search_index().len().await.unwrap(), 30);
    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_generates_never_interleave() {
    const BATCHES: usize = 6;
    const BATCH_SIZE: i64 = 150;

    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir.path().join("catalog.db")).await;

    let writers: Vec<_> = (0..BATCHES)
        .map(|_| {
            let catalog = db.catalog();
            tokio::spawn(async move { catalog.generate(BATCH_SIZE, None).await })
        })
        .collect();

    // Readers run alongside and must only ever see whole batches.
    let readers: Vec<_> = (0..2)
        .map(|_| {
            let catalog = db.catalog();
            tokio::spawn(async move {
                for _ in 0..20 {
                    let page = catalog.list(1, 1).await.unwrap();
                    assert_eq!(page.total % BATCH_SIZE, 0, "observed a partial batch");

                    let hits = catalog.search("acme", 1, 200).await.unwrap();
                    assert!(hits.items.iter().all(|p| p.matches_term("acme")));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    let mut ranges = Vec::new();
    for writer in writers {
        let result = writer.await.unwrap().unwrap();
        let first = result.first_id.unwrap();
        let last = result.last_id.unwrap();
        assert_eq!(last - first + 1, BATCH_SIZE);
        ranges.push((first, last));
    }
    for reader in readers {
        reader.await.unwrap();
    }

    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        assert!(pair[0].1 < pair[1].0, "batches overlap: {:?}", pair);
    }

    let total = BATCHES as i64 * BATCH_SIZE;
    let catalog = db.catalog();
    assert_eq!(catalog.list(1, 1).await.unwrap().total, total);
    assert_eq!(db.search_index().len().await.unwrap(), total);

    let mut skus = HashSet::new();
    let mut page = 1;
    loop {
        let chunk = catalog.list(page, 200).await.unwrap();
        if chunk.items.is_empty() {
            break;
        }
        for product in chunk.items {
            assert!(skus.insert(product.sku));
        }
        page += 1;
    }
    assert_eq!(skus.len() as i64, total);

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_a_partial_rebuild() {
    const REBUILDS: usize = 10;

    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir.path().join("catalog.db")).await;
    let catalog = db.catalog();
    catalog
        .generate(catalog_core::MAX_GENERATE as i64, Some(17))
        .await
        .unwrap();

    let baseline = catalog.search_detailed("acme", 1, 20).await.unwrap();
    assert!(baseline.page.total > 0);
    assert_eq!(baseline.path, Some(SearchPath::Index));
    let expected_total = baseline.page.total;

    let index = db.search_index();
    let rebuilder = tokio::spawn(async move {
        for _ in 0..REBUILDS {
            assert_eq!(
                index.rebuild().await.unwrap(),
                catalog_core::MAX_GENERATE as u64
            );
            tokio::task::yield_now().await;
        }
    });

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let catalog = db.catalog();
            tokio::spawn(async move {
                for _ in 0..40 {
                    let outcome = catalog.search_detailed("acme", 1, 20).await.unwrap();
                    assert_eq!(outcome.page.total, expected_total, "saw a partial index");
                    assert_eq!(outcome.path, Some(SearchPath::Index));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    rebuilder.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    assert_eq!(
        db.search_index().len().await.unwrap(),
        catalog_core::MAX_GENERATE as i64
    );
    db.close().await;
}

#[tokio::test]
async fn chunked_seeding_past_max_generate() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir.path().join("catalog.db")).await;
    let catalog = db.catalog();

    let max = catalog_core::MAX_GENERATE as i64;
    catalog.generate(max, Some(1)).await.unwrap();
    catalog.generate(500, Some(2)).await.unwrap();

    let health = catalog.health().await;
    assert!(health.ready);
    assert_eq!(health.products, Some(max + 500));

    let last = catalog.list((max + 500 + 199) / 200, 200).await.unwrap();
    assert_eq!(last.items.len(), 100);

    db.close().await;
}

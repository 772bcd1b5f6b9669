//! Stress tests for concurrent cache access.
//!
//! Uses a finite number of operations per thread so writers cannot starve.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use viewcache_core::{
    CollectionDataCache, CollectionEntry, ColumnSnapshot, ColumnValue, DiffTime, ReadFlag,
    ReadMask, ViewEntry,
};

fn entry(id: u32) -> CollectionEntry {
    CollectionEntry::with_columns(
        id,
        vec![
            ColumnValue::Number(f64::from(id)),
            ColumnValue::Text(format!("note {id}")),
        ],
    )
}

/// Smoke test: 4 readers + 4 writers × 100 ops
#[test]
fn test_stress_smoke_8_threads() {
    run_cache_stress(4, 4, 100, 128);
}

/// Medium stress: 10+10 threads × 250 ops
#[test]
fn test_stress_medium_20_threads() {
    run_cache_stress(10, 10, 250, 512);
}

/// Heavy stress: 25+25 threads × 2000 ops (ignored for CI)
#[test]
#[ignore = "Heavy stress test, run manually"]
fn test_stress_50_threads() {
    run_cache_stress(25, 25, 2_000, 1_024);
}

fn run_cache_stress(readers: u32, writers: u32, ops: u32, capacity: i64) {
    let cache: Arc<CollectionDataCache<ColumnSnapshot>> =
        Arc::new(CollectionDataCache::new(capacity).expect("valid size"));
    let mask = ReadMask::from(ReadFlag::SummaryValues);
    let diff_time = DiffTime::from_u64(7);
    let filled_total = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let mut handles = Vec::new();

    for w in 0..writers {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops {
                let base = (w * ops + i) % 2_048;
                let batch: Vec<_> = (base..base + 4).map(entry).collect();
                cache.add_cache_values(mask, diff_time, &batch);
                assert!(cache.size() <= capacity as usize);
            }
        }));
    }

    for r in 0..readers {
        let cache = Arc::clone(&cache);
        let filled_total = Arc::clone(&filled_total);
        handles.push(thread::spawn(move || {
            for i in 0..ops {
                let id = (r * 31 + i) % 2_048;
                let mut stubs = vec![CollectionEntry::stub(id), CollectionEntry::stub(id + 1)];
                let filled = cache.populate_entry_stubs_with_data(&mut stubs);
                for s in stubs.iter().filter(|s| !s.is_stub()) {
                    // Filled data always belongs to the note it was cached for.
                    assert_eq!(s.column(1), entry(s.note_id()).column(1));
                }
                filled_total.fetch_add(filled as u64, Ordering::Relaxed);
            }
        }));
    }

    for h in handles {
        h.join().expect("worker panicked");
    }

    let stats = cache.stats();
    assert_eq!(stats.hits, filled_total.load(Ordering::Relaxed));
    assert_eq!(stats.hits, cache.usage_stats());
    assert!(cache.size() <= capacity as usize);
    assert_eq!(cache.size(), cache.snapshot().len());
    assert_eq!(stats.invalidations, 0);

    println!(
        "stress {}r/{}w x {} ops: {:?}, hits={}, misses={}, evictions={}",
        readers,
        writers,
        ops,
        start.elapsed(),
        stats.hits,
        stats.misses,
        stats.evictions
    );
}

//! Integration test for statistics persistence.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use veinminer_core::PlayerId;
use veinminer_economy::{
    open_store, AutoSaver, PlayerStats, StatsAggregator, StatsConfig, StorageKind, StoreConfig,
};

fn store_config(dir: &std::path::Path, kind: StorageKind) -> StoreConfig {
    StoreConfig { kind, data_folder: dir.to_path_buf(), ..StoreConfig::default() }
}

fn reload(config: &StoreConfig) -> StatsAggregator {
    let records = open_store(config).load_all().unwrap();
    StatsAggregator::with_records(
        StatsConfig::default(),
        records.into_iter().map(|r| (r.player_id, r.stats)),
    )
}

#[test]
fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = store_config(dir.path(), StorageKind::File);
    let alice = PlayerId::new("alice");

    {
        let stats = Arc::new(StatsAggregator::new(StatsConfig::default()));
        let saver = AutoSaver::start(Arc::clone(&stats), Arc::from(open_store(&config)), Duration::ZERO);
        assert_eq!(saver.store_name(), "file");
        stats.record(&alice, 60, 1_000);
        saver.after_record();
        stats.record(&alice, 50, 2_000);
        saver.after_record();
    }

    let restored = reload(&config);
    let s = restored.get(&alice).unwrap();
    assert_eq!(s.total_veins, 2);
    assert_eq!(s.total_blocks, 110);
    assert_eq!(s.largest_vein, 60);
    assert!(s.achieved_milestones.contains(&100));

    // Already achieved, not reported again
    assert!(restored.record(&alice, 10, 3_000).newly_crossed.is_empty());
}

#[test]
fn test_sqlite_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        table_prefix: "vm_test_".into(),
        ..store_config(dir.path(), StorageKind::Sqlite)
    };

    {
        let stats = Arc::new(StatsAggregator::new(StatsConfig::default()));
        let saver = AutoSaver::start(Arc::clone(&stats), Arc::from(open_store(&config)), Duration::from_secs(60));
        assert_eq!(saver.store_name(), "sqlite");
        for i in 0..8 {
            stats.record(&PlayerId::new(format!("p{i}")), 5 + i, 0);
        }
        // Dropped: final flush on shutdown
    }

    let restored = reload(&config);
    assert_eq!(restored.snapshot().len(), 8);
    assert_eq!(restored.get(&PlayerId::new("p7")).unwrap().total_blocks, 12);
}

#[test]
fn test_sqlite_failure_falls_back_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();

    let config = StoreConfig {
        sqlite_path: blocker.join("veinminer.db"),
        ..store_config(dir.path(), StorageKind::Sqlite)
    };
    assert_eq!(open_store(&config).name(), "file");

    let no_fallback = StoreConfig { save_to_file: false, ..config };
    assert_eq!(open_store(&no_fallback).name(), "null");
}

#[test]
fn test_concurrent_recording_with_periodic_saver() {
    let dir = tempfile::tempdir().unwrap();
    let config = store_config(dir.path(), StorageKind::File);
    let stats = Arc::new(StatsAggregator::new(StatsConfig::default()));
    let saver = AutoSaver::start(Arc::clone(&stats), Arc::from(open_store(&config)), Duration::from_millis(5));

    let workers: Vec<_> = (0..4)
        .map(|t| {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                let id = PlayerId::new(format!("worker{t}"));
                for _ in 0..250 {
                    stats.record(&id, 2, 0);
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
    saver.flush().unwrap();
    drop(saver);

    let restored = reload(&config);
    for t in 0..4 {
        let s: PlayerStats = restored.get(&PlayerId::new(format!("worker{t}"))).unwrap();
        assert_eq!(s.total_veins, 250);
        assert_eq!(s.total_blocks, 500);
    }
}

//! Cuckoo容器集成测试

use cuckoo_collections::{
    batch_get, batch_insert, CuckooError, CuckooFilter, CuckooMap, CuckooMapConfig,
    CuckooMultiMap, ShardedCuckooMap, ShardedCuckooMultiMap,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use test_log::test;

const SEED: u64 = 42;
const ITEM_COUNT: usize = 100_000;
const KEY_SIZE: usize = 16;
const VALUE_SIZE: usize = 8;

/// 生成随机键值对
fn generate_items(count: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count)
        .map(|_| {
            let mut key = vec![0u8; KEY_SIZE];
            let mut value = vec![0u8; VALUE_SIZE];
            rng.fill(&mut key[..]);
            rng.fill(&mut value[..]);
            (key, value)
        })
        .collect()
}

#[test]
fn test_high_load() {
    let items = generate_items(ITEM_COUNT);
    let mut map = CuckooMap::new(2048).unwrap();

    for (key, value) in &items {
        assert!(map.insert(key.clone(), value.clone()));
    }

    let stats = map.stats();
    assert_eq!(stats.size, ITEM_COUNT);
    assert!(stats.generation_count >= 2, "10万条目远超初始容量，必须扩容");

    for (index, (key, value)) in items.iter().enumerate() {
        assert_eq!(
            map.get(key),
            Some(value),
            "Assertion failed at index {} for key {:?}",
            index,
            key
        );
    }
}

#[test]
fn test_growth_from_minimal_capacity() {
    // 容量16装入100个键：全部可查，规模准确，至少两代
    let mut map = CuckooMap::new(16).unwrap();
    for k in 0..100u64 {
        assert!(map.insert(k, k * 3));
    }
    assert_eq!(map.len(), 100);
    assert!(map.generation_count() >= 2);
    for k in 0..100u64 {
        assert_eq!(map.get(&k), Some(&(k * 3)));
    }
    assert_eq!(map.get(&100), None);
}

#[test]
fn test_insert_remove_drain() {
    let mut map = CuckooMap::new(64).unwrap();
    for k in 0..10u64 {
        assert!(map.insert(k, k));
    }
    for k in (0..10u64).rev() {
        assert!(map.remove(&k));
    }
    assert_eq!(map.len(), 0);
    for k in 0..10u64 {
        assert_eq!(map.get(&k), None);
    }
}

#[test]
fn test_size_law_random_mix() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut map = CuckooMap::new(256).unwrap();
    let mut model: HashSet<u64> = HashSet::new();

    for _ in 0..50_000 {
        let key = rng.gen_range(0..2_000u64);
        if rng.gen_bool(0.6) {
            assert_eq!(map.insert(key, key), model.insert(key));
        } else {
            assert_eq!(map.remove(&key), model.remove(&key));
        }
        // 规模守恒：成功插入数减成功删除数
        debug_assert_eq!(map.len(), model.len());
    }
    assert_eq!(map.len(), model.len());
    for key in &model {
        assert_eq!(map.get(key), Some(key));
    }
}

#[test]
fn test_multimap_equivalence_classes() {
    let mut mm = CuckooMultiMap::new(256).unwrap();
    for i in 0..10_000u64 {
        mm.insert(i % 1000, i);
    }
    assert_eq!(mm.len(), 10_000);
    for k in 0..1000u64 {
        let values: Vec<u64> = mm.get_all(&k).copied().collect();
        assert_eq!(values.len(), 10, "键 {} 的等价类大小错误", k);
        for v in values {
            assert_eq!(v % 1000, k);
        }
    }

    assert_eq!(mm.remove_all(&0), 10);
    assert_eq!(mm.len(), 9_990);
    assert_eq!(mm.get_all(&0).count(), 0);
}

#[test]
fn test_filter_no_false_negatives_and_bounded_false_positives() {
    let items = generate_items(1000);
    let mut filter = CuckooFilter::new(2048).unwrap();

    for (key, _) in &items {
        assert!(filter.insert(key));
    }
    for (key, _) in &items {
        assert!(filter.contains(key), "已插入键不得漏报: {:?}", key);
    }

    // 1000个未插入的随机键，误报率应低于3%
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let false_positives = (0..1000)
        .filter(|_| {
            let mut probe = vec![0u8; KEY_SIZE + 1];
            rng.fill(&mut probe[..]);
            filter.contains(&probe)
        })
        .count();
    assert!(false_positives < 30, "误报率超限: {}/1000", false_positives);
}

#[test]
fn test_filter_remove_after_insert() {
    let mut filter = CuckooFilter::new(64).unwrap();
    for k in 0..100u64 {
        filter.insert(&k);
    }
    for k in 0..100u64 {
        assert!(filter.remove(&k));
    }
    assert!(filter.is_empty());
}

#[test]
fn test_sharded_concurrent_disjoint_ranges() {
    const THREADS: u64 = 2;
    const OPS: usize = 100_000;
    const RANGE: u64 = 50_000;

    let map = Arc::new(ShardedCuckooMap::new(4096, 8).unwrap());
    let mut handles = Vec::new();

    for t in 0..THREADS {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(SEED + t);
            let base = t * 1_000_000;
            let mut model: HashSet<u64> = HashSet::new();

            for _ in 0..OPS {
                let key = base + rng.gen_range(0..RANGE);
                match rng.gen_range(0..10) {
                    0..=4 => {
                        // 插入
                        assert_eq!(map.insert(key, key + 1), model.insert(key), "插入结果与模型不符");
                    }
                    5..=7 => {
                        // 查询
                        let expected = model.contains(&key).then_some(key + 1);
                        assert_eq!(map.get(&key), expected);
                    }
                    _ => {
                        // 删除
                        assert_eq!(map.remove(&key), model.remove(&key));
                    }
                }
            }
            model
        }));
    }

    let mut expected_total = 0;
    for handle in handles {
        let model = handle.join().unwrap();
        expected_total += model.len();
        for key in model {
            assert_eq!(map.get(&key), Some(key + 1), "并发后键 {} 丢失", key);
        }
    }
    assert_eq!(map.len(), expected_total, "净规模必须等于净插入数");
}

#[test]
fn test_sharded_multimap_concurrent() {
    let mm = Arc::new(ShardedCuckooMultiMap::new(1024, 4).unwrap());
    let mut handles = Vec::new();

    for t in 0..4u64 {
        let mm = Arc::clone(&mm);
        handles.push(thread::spawn(move || {
            for i in 0..1000u64 {
                mm.insert(t * 10_000 + i % 100, i);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(mm.len(), 4_000);
    for t in 0..4u64 {
        assert_eq!(mm.get_all(&(t * 10_000)).len(), 10);
    }
}

#[test]
fn test_batch_helpers() {
    let items = generate_items(5_000);
    let mut map = CuckooMap::new(1024).unwrap();

    let inserted = batch_insert(&mut map, items.iter().cloned());
    assert_eq!(inserted, 5_000);
    // 重复批次全部被拒绝
    let reinserted = batch_insert(&mut map, items.iter().cloned());
    assert_eq!(reinserted, 0);

    let keys: Vec<&Vec<u8>> = items.iter().map(|(k, _)| k).collect();
    let values = batch_get(&map, keys.iter().copied());
    for (result, (_, expected)) in values.iter().zip(items.iter()) {
        assert_eq!(result.as_ref(), Some(expected));
    }
}

#[test]
fn test_invalid_configs_fail_fast() {
    assert!(matches!(
        CuckooMap::<u64, u64>::new(0),
        Err(CuckooError::ZeroCapacity)
    ));
    let config = CuckooMapConfig {
        max_walk: Some(0),
        ..CuckooMapConfig::default()
    };
    assert!(matches!(
        CuckooMap::<u64, u64>::with_config(config),
        Err(CuckooError::ZeroWalkBudget)
    ));
    assert!(ShardedCuckooMap::<u64, u64>::new(1024, 3).is_err());
}

#[test]
fn test_stats_export_smoke() {
    let mut map = CuckooMap::new(64).unwrap();
    for k in 0..50u64 {
        map.insert(k, k);
        map.get(&k);
    }
    let metrics = cuckoo_collections::export_prometheus();
    assert!(metrics.contains("cuckoo_operation_insert_count"));
    assert!(metrics.contains("cuckoo_operation_get_count"));

    let snapshot = cuckoo_collections::operation_snapshot();
    assert!(snapshot.insert_count >= 50);
}

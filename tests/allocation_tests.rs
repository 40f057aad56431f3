use rescue_app::domains::allocation::*;
use rescue_app::domains::world::{Coord, Victim};

fn victim(seq: u32, x: i32, y: i32) -> Victim {
    Victim::new(seq, Coord::new(x, y), vec![seq as f64])
}

#[test]
fn single_cluster_centroid_is_the_mean_position() {
    let victims = [victim(1, 0, 0), victim(2, 4, 0), victim(3, 2, 6)];
    let allocation = VictimAllocator::default().allocate(&victims, 1).unwrap();
    assert_eq!(allocation.labels, vec![0, 0, 0]);
    assert_eq!(allocation.centroids, vec![Some([2.0, 2.0])]);
    assert_eq!(allocation.members(0).len(), 3);
}

#[test]
fn fewer_distinct_positions_than_clusters_leaves_surplus_empty() {
    let victims = [victim(1, 1, 1), victim(2, 5, 5)];
    let allocation = VictimAllocator::default().allocate(&victims, 4).unwrap();
    assert_eq!(allocation.cluster_count(), 4);
    assert_eq!(allocation.centroids.iter().filter(|c| c.is_some()).count(), 2);
    assert_ne!(allocation.labels[0], allocation.labels[1]);

    let non_empty = (0..4).filter(|c| !allocation.members(*c).is_empty()).count();
    assert_eq!(non_empty, 2);
}

#[test]
fn same_seed_gives_the_same_partition() {
    let victims: Vec<Victim> = (0..12)
        .map(|i| victim(i, (i as i32 * 7) % 11, (i as i32 * 3) % 5))
        .collect();
    let allocator = VictimAllocator::new(AllocationConfig {
        seed: 99,
        ..AllocationConfig::default()
    })
    .unwrap();
    let a = allocator.allocate(&victims, 3).unwrap();
    let b = allocator.allocate(&victims, 3).unwrap();
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.centroids, b.centroids);
    assert!(a.iterations >= 1);
}

#[test]
fn every_victim_lands_in_exactly_one_cluster() {
    let victims: Vec<Victim> = (0..9).map(|i| victim(i, i as i32, (i as i32) % 3)).collect();
    let allocation = VictimAllocator::default().allocate(&victims, 3).unwrap();
    let total: usize = (0..3).map(|c| allocation.members(c).len()).sum();
    assert_eq!(total, victims.len());
}

#[test]
fn invalid_config_is_rejected() {
    let config = AllocationConfig {
        max_iterations: 0,
        ..AllocationConfig::default()
    };
    assert!(VictimAllocator::new(config).is_err());
    let config = AllocationConfig {
        tolerance: f64::NAN,
        ..AllocationConfig::default()
    };
    assert!(VictimAllocator::new(config).is_err());
}

//! Partitions discovered victims across rescuers by position.

use crate::common::{DomainError, DomainResult};
use crate::domains::world::{Coord, Victim};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub max_iterations: usize,
    /// Stop once no centroid moves farther than this.
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-4,
            seed: 0,
        }
    }
}

impl AllocationConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.max_iterations == 0 {
            return Err(DomainError::invalid_config(
                "allocation max_iterations must be at least 1",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(DomainError::invalid_config(format!(
                "allocation tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub victims: Vec<Victim>,
    /// Cluster of each victim, index-aligned with `victims`.
    pub labels: Vec<usize>,
    /// One entry per cluster; `None` for clusters that never received a seed position.
    pub centroids: Vec<Option<[f64; 2]>>,
    pub iterations: usize,
}

impl Allocation {
    pub fn cluster_count(&self) -> usize {
        self.centroids.len()
    }

    pub fn members(&self, cluster: usize) -> Vec<&Victim> {
        self.victims
            .iter()
            .zip(self.labels.iter())
            .filter(|(_, label)| **label == cluster)
            .map(|(victim, _)| victim)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VictimAllocator {
    config: AllocationConfig,
}

fn point(pos: Coord) -> [f64; 2] {
    [pos.x as f64, pos.y as f64]
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

fn nearest_centroid(centroids: &[Option<[f64; 2]>], p: [f64; 2]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        if let Some(c) = centroid {
            let d = distance(*c, p);
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
    }
    best
}

impl VictimAllocator {
    pub fn new(config: AllocationConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn allocate(&self, victims: &[Victim], k: usize) -> DomainResult<Allocation> {
        if k == 0 {
            return Err(DomainError::invalid_config(
                "cannot allocate victims to zero clusters",
            ));
        }

        let points: Vec<[f64; 2]> = victims.iter().map(|v| point(v.position)).collect();
        let distinct: Vec<Coord> = victims
            .iter()
            .map(|v| v.position)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let seeded = k.min(distinct.len());
        let mut centroids: Vec<Option<[f64; 2]>> = vec![None; k];
        for (slot, idx) in rand::seq::index::sample(&mut rng, distinct.len(), seeded)
            .into_iter()
            .enumerate()
        {
            centroids[slot] = Some(point(distinct[idx]));
        }

        let mut labels = vec![0; points.len()];
        let mut iterations = 0;
        if seeded > 0 {
            while iterations < self.config.max_iterations {
                iterations += 1;
                for (label, p) in labels.iter_mut().zip(points.iter()) {
                    *label = nearest_centroid(&centroids, *p);
                }

                let mut sums = vec![[0.0_f64; 2]; k];
                let mut counts = vec![0usize; k];
                for (label, p) in labels.iter().zip(points.iter()) {
                    sums[*label][0] += p[0];
                    sums[*label][1] += p[1];
                    counts[*label] += 1;
                }

                let mut shift: f64 = 0.0;
                for (cluster, centroid) in centroids.iter_mut().enumerate() {
                    let n = counts[cluster];
                    // an emptied cluster keeps its last centroid
                    let Some(current) = centroid.as_mut().filter(|_| n > 0) else {
                        continue;
                    };
                    let mean = [sums[cluster][0] / n as f64, sums[cluster][1] / n as f64];
                    shift = shift.max(distance(*current, mean));
                    *current = mean;
                }

                debug!("k-means iteration {} max shift {:.6}", iterations, shift);
                if shift < self.config.tolerance {
                    break;
                }
            }
            for (label, p) in labels.iter_mut().zip(points.iter()) {
                *label = nearest_centroid(&centroids, *p);
            }
        }

        Ok(Allocation {
            victims: victims.to_vec(),
            labels,
            centroids,
            iterations,
        })
    }
}

//! Genetic search over move sequences for a single rescuer.

use super::chromosome::{Chromosome, RouteSpace};
use crate::common::{DomainError, DomainResult};
use crate::domains::world::{Coord, DynPriority, DynSeverity, PartialGrid, Victim};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Weight of each rescued victim, severity point and priority point in the fitness.
const RESCUE_WEIGHT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 32,
            generations: 30,
            crossover_probability: 0.75,
            mutation_probability: 0.04,
            seed: None,
        }
    }
}

impl GeneticConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.population_size < 2 {
            return Err(DomainError::invalid_config(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.generations == 0 {
            return Err(DomainError::invalid_config("generations must be at least 1"));
        }
        for (name, p) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(DomainError::invalid_config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct RescueTarget {
    seq: u32,
    position: Coord,
    severity: f64,
}

/// Fitness breakdown of one repaired chromosome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub fitness: f64,
    pub rescued: Vec<u32>,
    pub severity_sum: f64,
    pub priority_sum: f64,
    pub leftover_energy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOptimization {
    pub best: Chromosome,
    pub fitness: f64,
    /// Generation in which `best` was first seen; equals the generation count when it came from
    /// the final population.
    pub generation: usize,
    /// Start cell followed by every visited cell.
    pub route: Vec<Coord>,
    pub rescued: Vec<u32>,
    pub leftover_energy: f64,
}

pub struct RescueRouteOptimizer {
    config: GeneticConfig,
    space: RouteSpace,
    targets: Vec<RescueTarget>,
    initial_energy: f64,
    priority: DynPriority,
    rng: StdRng,
    population: Vec<Chromosome>,
    best: Option<(Chromosome, Evaluation, usize)>,
}

impl RescueRouteOptimizer {
    pub fn new(
        config: GeneticConfig,
        grid: PartialGrid,
        start: Coord,
        victims: &[Victim],
        initial_energy: f64,
        severity: DynSeverity,
        priority: DynPriority,
    ) -> DomainResult<Self> {
        config.validate()?;
        if !initial_energy.is_finite() {
            return Err(DomainError::invalid_config(format!(
                "initial energy must be finite, got {}",
                initial_energy
            )));
        }
        let space = RouteSpace::new(grid, start).ok_or_else(|| {
            DomainError::invalid_config(format!(
                "start {} lies outside the known grid",
                start
            ))
        })?;

        let targets = victims
            .iter()
            .map(|victim| {
                let score = match victim.severity_inputs() {
                    Some((q_pa, pulse, resp_rate)) => severity.severity(q_pa, pulse, resp_rate),
                    None => {
                        warn!(
                            "victim {} has {} readings, scoring severity 0",
                            victim.seq,
                            victim.vital_signs.len()
                        );
                        0.0
                    }
                };
                RescueTarget {
                    seq: victim.seq,
                    position: victim.position,
                    severity: score,
                }
            })
            .collect();

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut optimizer = Self {
            config,
            space,
            targets,
            initial_energy,
            priority,
            rng,
            population: Vec::new(),
            best: None,
        };
        let population = (0..optimizer.config.population_size)
            .map(|_| optimizer.random_walk())
            .collect();
        optimizer.population = population;
        Ok(optimizer)
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    pub fn space(&self) -> &RouteSpace {
        &self.space
    }

    /// Walks from the start picking uniformly among valid moves until the energy runs out or the
    /// walker is boxed in.
    fn random_walk(&mut self) -> Chromosome {
        let mut pos = self.space.start();
        let mut energy = self.initial_energy;
        let mut moves = Vec::new();
        while energy > 0.0 {
            let valid = self.space.valid_moves(pos);
            if valid.is_empty() {
                break;
            }
            let mv = valid[self.rng.gen_range(0..valid.len())];
            pos = pos + mv;
            moves.push(mv);
            energy -= self.space.cost(pos);
        }
        Chromosome::new(moves)
    }

    /// Repairs the chromosome in place and scores it. Moves past the point where the energy runs
    /// out are never credited.
    pub fn evaluate(&self, chromosome: &mut Chromosome) -> Evaluation {
        let start = self.space.start();
        let repaired = self.space.repair(chromosome);
        let visited = self.affordable(&repaired);

        let mut done = vec![false; self.targets.len()];
        let mut rescued = Vec::new();
        let mut severity_sum = 0.0;
        let mut priority_sum = 0.0;
        let mut difficulty = 0.0;
        let mut spent_at_last_rescue = None;

        for &pos in visited {
            difficulty += self.space.cost(pos);
            for (target, done) in self.targets.iter().zip(done.iter_mut()) {
                if *done || target.position != pos {
                    continue;
                }
                *done = true;
                rescued.push(target.seq);
                severity_sum += target.severity;
                let distance = start.euclidean(&pos);
                priority_sum +=
                    self.priority
                        .priority(difficulty, target.severity, distance, rescued.len());
                spent_at_last_rescue = Some(difficulty);
            }
        }

        let leftover_energy = if rescued.len() == self.targets.len() {
            self.initial_energy - spent_at_last_rescue.unwrap_or(0.0)
        } else {
            0.0
        };
        let fitness =
            RESCUE_WEIGHT * (rescued.len() as f64 + severity_sum + priority_sum) + leftover_energy;

        Evaluation {
            fitness,
            rescued,
            severity_sum,
            priority_sum,
            leftover_energy,
        }
    }

    /// Prefix of a replayed route whose cumulative cost stays within the initial energy.
    fn affordable<'a>(&self, visited: &'a [Coord]) -> &'a [Coord] {
        let mut spent = 0.0;
        let reachable = visited
            .iter()
            .take_while(|pos| {
                spent += self.space.cost(**pos);
                spent <= self.initial_energy
            })
            .count();
        &visited[..reachable]
    }

    fn evaluate_population(&mut self, generation: usize) -> Vec<f64> {
        let mut population = std::mem::take(&mut self.population);
        let mut scores = Vec::with_capacity(population.len());
        for chromosome in population.iter_mut() {
            let evaluation = self.evaluate(chromosome);
            scores.push(evaluation.fitness);
            let improved = match &self.best {
                Some((_, best, _)) => evaluation.fitness > best.fitness,
                None => true,
            };
            if improved {
                trace!(
                    "generation {} new best {:.2}, rescued {:?}",
                    generation,
                    evaluation.fitness,
                    evaluation.rescued
                );
                self.best = Some((chromosome.clone(), evaluation, generation));
            }
        }
        self.population = population;
        scores
    }

    /// Roulette draws with replacement. Non-positive and non-finite scores weigh nothing; with no
    /// usable weight at all the draw is uniform.
    fn select(&mut self, fitness: &[f64]) -> Vec<usize> {
        let n = fitness.len();
        let weights: Vec<f64> = fitness
            .iter()
            .map(|f| if f.is_finite() && *f > 0.0 { *f } else { 0.0 })
            .collect();
        match WeightedIndex::new(&weights) {
            Ok(roulette) => (0..n).map(|_| roulette.sample(&mut self.rng)).collect(),
            Err(e) => {
                debug!("roulette unavailable ({}), selecting uniformly", e);
                (0..n).map(|_| self.rng.gen_range(0..n)).collect()
            }
        }
    }

    fn crossover(&mut self, parents: &[usize]) -> Vec<Chromosome> {
        let mut offspring = Vec::with_capacity(parents.len());
        for pair in parents.chunks(2) {
            match pair {
                [a, b] => {
                    let mut first = self.population[*a].clone();
                    let mut second = self.population[*b].clone();
                    let shortest = first.len().min(second.len());
                    if shortest >= 2 && self.rng.gen_bool(self.config.crossover_probability) {
                        let cut = self.rng.gen_range(1..shortest);
                        let first_tail = first.moves.split_off(cut);
                        let second_tail = second.moves.split_off(cut);
                        first.moves.extend(second_tail);
                        second.moves.extend(first_tail);
                    }
                    self.space.repair(&mut first);
                    self.space.repair(&mut second);
                    offspring.push(first);
                    offspring.push(second);
                }
                [single] => {
                    let mut child = self.population[*single].clone();
                    self.space.repair(&mut child);
                    offspring.push(child);
                }
                _ => {}
            }
        }
        offspring
    }

    fn mutate(&mut self, offspring: &mut [Chromosome]) {
        for child in offspring.iter_mut() {
            if child.is_empty() || !self.rng.gen_bool(self.config.mutation_probability) {
                continue;
            }
            let index = self.rng.gen_range(0..child.len());
            let pos = self.space.position_after(child, index);
            let valid = self.space.valid_moves(pos);
            if !valid.is_empty() {
                child.moves[index] = valid[self.rng.gen_range(0..valid.len())];
            }
            self.space.repair_from(child, index, pos);
        }
    }

    /// Runs every generation, then scores the final population.
    pub fn run(&mut self) -> DomainResult<RouteOptimization> {
        for generation in 0..self.config.generations {
            let fitness = self.evaluate_population(generation);
            let parents = self.select(&fitness);
            let mut offspring = self.crossover(&parents);
            self.mutate(&mut offspring);
            self.population = offspring;

            if let Some((_, best, _)) = &self.best {
                debug!(
                    "generation {}/{} best fitness {:.2}",
                    generation + 1,
                    self.config.generations,
                    best.fitness
                );
            }
        }
        self.evaluate_population(self.config.generations);

        let (best, evaluation, generation) =
            self.best.clone().ok_or_else(|| DomainError::InvalidCommand {
                reason: "optimizer finished without evaluating any route".to_string(),
            })?;

        let mut route = vec![self.space.start()];
        let replayed = self.space.replay(&best);
        route.extend_from_slice(self.affordable(&replayed));

        Ok(RouteOptimization {
            best,
            fitness: evaluation.fitness,
            generation,
            route,
            rescued: evaluation.rescued,
            leftover_energy: evaluation.leftover_energy,
        })
    }
}

impl std::fmt::Debug for RescueRouteOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RescueRouteOptimizer")
            .field("config", &self.config)
            .field("start", &self.space.start())
            .field("targets", &self.targets.len())
            .field("initial_energy", &self.initial_energy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::world::{CellKind, Move};
    use std::sync::Arc;

    fn open_grid(size: i32) -> PartialGrid {
        let mut grid = PartialGrid::new();
        for y in 0..size {
            for x in 0..size {
                grid.observe(Coord::new(x, y), 1.0, CellKind::Free);
            }
        }
        grid
    }

    fn optimizer(victims: &[Victim], energy: f64) -> RescueRouteOptimizer {
        let config = GeneticConfig {
            population_size: 4,
            generations: 1,
            seed: Some(7),
            ..GeneticConfig::default()
        };
        RescueRouteOptimizer::new(
            config,
            open_grid(5),
            Coord::ORIGIN,
            victims,
            energy,
            Arc::new(|_: f64, _: f64, _: f64| 1.0),
            Arc::new(|_: f64, _: f64, _: f64, _: usize| 0.0),
        )
        .unwrap()
    }

    fn victim_at(seq: u32, x: i32, y: i32) -> Victim {
        Victim::new(seq, Coord::new(x, y), vec![seq as f64, 0.0, 0.0, 0.0, 80.0, 15.0])
    }

    #[test]
    fn rejects_invalid_parameters() {
        let config = GeneticConfig {
            population_size: 1,
            ..GeneticConfig::default()
        };
        assert!(config.validate().is_err());
        let config = GeneticConfig {
            mutation_probability: 1.5,
            ..GeneticConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(GeneticConfig::default().validate().is_ok());
    }

    #[test]
    fn leftover_energy_only_when_all_victims_rescued() {
        let victims = [victim_at(1, 2, 2), victim_at(2, 4, 0)];
        let opt = optimizer(&victims, 10.0);

        let mut partial = Chromosome::new(vec![Move::SE, Move::SE]);
        let evaluation = opt.evaluate(&mut partial);
        assert_eq!(evaluation.rescued, vec![1]);
        assert_eq!(evaluation.leftover_energy, 0.0);
        assert_eq!(evaluation.fitness, 200.0);

        let mut complete = Chromosome::new(vec![Move::SE, Move::SE, Move::NE, Move::NE]);
        let evaluation = opt.evaluate(&mut complete);
        assert_eq!(evaluation.rescued, vec![1, 2]);
        assert_eq!(evaluation.leftover_energy, 6.0);
        assert_eq!(evaluation.fitness, 406.0);
    }

    #[test]
    fn revisiting_a_victim_counts_once() {
        let victims = [victim_at(1, 1, 1)];
        let opt = optimizer(&victims, 10.0);
        let mut route = Chromosome::new(vec![Move::SE, Move::NW, Move::SE]);
        let evaluation = opt.evaluate(&mut route);
        assert_eq!(evaluation.rescued, vec![1]);
        // spent up to the first (and only counted) rescue
        assert_eq!(evaluation.leftover_energy, 9.0);
    }

    #[test]
    fn victim_past_the_energy_ceiling_is_not_credited() {
        let victims = [victim_at(1, 4, 4)];
        let mut route = Chromosome::new(vec![Move::SE; 4]);

        let short = optimizer(&victims, 3.0);
        let evaluation = short.evaluate(&mut route);
        assert!(evaluation.rescued.is_empty());
        assert_eq!(evaluation.fitness, 0.0);

        let exact = optimizer(&victims, 4.0);
        let evaluation = exact.evaluate(&mut route);
        assert_eq!(evaluation.rescued, vec![1]);
        assert_eq!(evaluation.leftover_energy, 0.0);
    }

    #[test]
    fn wandering_after_the_last_rescue_does_not_lower_fitness() {
        let victims = [victim_at(1, 1, 1), victim_at(2, 2, 2)];
        let opt = optimizer(&victims, 10.0);
        let mut full = Chromosome::new(vec![Move::SE, Move::SE, Move::E, Move::N, Move::W]);
        let mut truncated = Chromosome::new(vec![Move::SE, Move::SE]);
        let full = opt.evaluate(&mut full);
        let truncated = opt.evaluate(&mut truncated);
        assert_eq!(full.rescued, truncated.rescued);
        assert!(full.fitness >= truncated.fitness);
    }

    #[test]
    fn zero_fitness_population_selects_uniformly() {
        let mut opt = optimizer(&[victim_at(1, 4, 4)], 3.0);
        let picks = opt.select(&[0.0, 0.0, -5.0, f64::NAN]);
        assert_eq!(picks.len(), 4);
        assert!(picks.iter().all(|i| *i < 4));
    }

    #[test]
    fn random_walks_stay_on_the_grid() {
        let opt = optimizer(&[victim_at(1, 4, 4)], 6.0);
        for chromosome in opt.population() {
            assert!(!chromosome.is_empty());
            for pos in opt.space().replay(chromosome) {
                assert!(opt.space().grid().is_traversable(pos));
            }
        }
    }
}

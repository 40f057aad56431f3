//! Text scenario maps.
//!
//! One row per line: `.` open ground with cost 1, `1`-`9` open ground with that cost, `#` wall,
//! `B` the base (cost 1). Everything outside the text is wall. Victim coordinates are absolute
//! map coordinates.

use crate::common::{DomainError, DomainResult};
use crate::config::ScenarioConfig;
use crate::domains::world::{CellKind, Coord, PartialGrid, Victim};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    costs: HashMap<Coord, f64>,
    base: Coord,
    width: i32,
    height: i32,
    victims: Vec<Victim>,
}

impl Scenario {
    pub fn from_config(config: &ScenarioConfig) -> DomainResult<Self> {
        let mut scenario = Self::parse_map(&config.map)?;
        for (i, record) in config.victims.iter().enumerate() {
            let position = Coord::new(record.x, record.y);
            if !scenario.is_open(position) {
                return Err(DomainError::invalid_config(format!(
                    "victim {} at {} is not on open ground",
                    i + 1,
                    position
                )));
            }
            if scenario.victims.iter().any(|v| v.position == position) {
                return Err(DomainError::invalid_config(format!(
                    "two victims share cell {}",
                    position
                )));
            }
            scenario.victims.push(Victim::new(
                (i + 1) as u32,
                position,
                record.vital_signs.clone(),
            ));
        }
        Ok(scenario)
    }

    pub fn parse_map(text: &str) -> DomainResult<Self> {
        let mut costs = HashMap::new();
        let mut base = None;
        let mut width = 0;
        let mut height = 0;

        for (y, line) in text.lines().enumerate() {
            let y = y as i32;
            height = y + 1;
            for (x, ch) in line.trim_end().chars().enumerate() {
                let x = x as i32;
                width = width.max(x + 1);
                let pos = Coord::new(x, y);
                let cost = match ch {
                    '#' => continue,
                    '.' => 1.0,
                    'B' => {
                        if let Some(previous) = base.replace(pos) {
                            return Err(DomainError::invalid_config(format!(
                                "map has more than one base: {} and {}",
                                previous, pos
                            )));
                        }
                        1.0
                    }
                    '1'..='9' => f64::from(ch as u8 - b'0'),
                    other => {
                        return Err(DomainError::invalid_config(format!(
                            "unknown map symbol '{}' at {}",
                            other, pos
                        )))
                    }
                };
                costs.insert(pos, cost);
            }
        }

        let base = base.ok_or_else(|| DomainError::invalid_config("map has no base 'B'"))?;
        Ok(Self {
            costs,
            base,
            width,
            height,
            victims: Vec::new(),
        })
    }

    pub fn base(&self) -> Coord {
        self.base
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn victims(&self) -> &[Victim] {
        &self.victims
    }

    pub fn is_open(&self, pos: Coord) -> bool {
        self.costs.contains_key(&pos)
    }

    /// Traversal cost of an open cell, `None` for walls and anything off the map.
    pub fn cost(&self, pos: Coord) -> Option<f64> {
        self.costs.get(&pos).copied()
    }

    pub fn victim_at(&self, pos: Coord) -> Option<&Victim> {
        self.victims.iter().find(|v| v.position == pos)
    }

    pub fn open_cells(&self) -> usize {
        self.costs.len()
    }

    /// Converts an absolute map coordinate into the base-relative frame agents use.
    pub fn to_relative(&self, pos: Coord) -> Coord {
        Coord::new(pos.x - self.base.x, pos.y - self.base.y)
    }

    /// Full knowledge of the open cells, in base-relative coordinates.
    pub fn ground_truth(&self) -> PartialGrid {
        let mut grid = PartialGrid::new();
        for (pos, cost) in &self.costs {
            let kind = if *pos == self.base {
                CellKind::Start
            } else {
                CellKind::Free
            };
            grid.observe(self.to_relative(*pos), *cost, kind);
        }
        grid
    }
}

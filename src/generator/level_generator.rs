/*
level_generator.rs

Copyright 2025 Hervé Quatremain

This file is part of Mazewise.

Mazewise is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Mazewise is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Mazewise. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Generate a random level for a player.
//!
//! Obstacles are placed one at a time. Each candidate cell is rejected if it is already taken,
//! or if blocking it would prevent the player from reaching the goal. After
//! [`GeneratorConfig::max_attempts`] rejected candidates, the obstacle is dropped.
//! Coins are then placed on free interior cells the same way, without the reachability check
//! because coins do not block the player.

use log::{debug, warn};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::fmt;

use super::difficulty::{self, DifficultyTier, Weights};
use super::level::{Coin, Level};
use super::performance::PerformanceRecord;
use super::position::Position;
use super::retry::{self, retry};
use super::solvability;

/// Default width and height of the grid.
pub const GRID_SIZE: i32 = 15;

/// Smallest grid where the player start and the goal are distinct interior cells.
pub const MIN_GRID_SIZE: i32 = 4;

/// Largest grid. Each obstacle candidate runs a search over the whole grid.
pub const MAX_GRID_SIZE: i32 = 256;

/// Probability to place an obstacle next to an existing one, when the tier clusters obstacles.
const CLUSTER_PROBABILITY: f64 = 0.6;

/// Tiers with a path complexity above this value cluster obstacles.
const CLUSTER_MIN_COMPLEXITY: f64 = 0.5;

/// Maximum distance, on each axis, between a clustered obstacle and its anchor.
const CLUSTER_MAX_OFFSET: i32 = 2;

/// Type of configuration errors.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The grid is too small to hold distinct start and goal cells.
    GridTooSmall(i32),

    /// The grid is too large.
    GridTooLarge(i32),

    /// No attempt allowed to place an obstacle or a coin.
    NoAttempts,

    /// The classification would not look at any record.
    EmptyWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::GridTooSmall(s) => {
                write!(f, "grid size {s} is smaller than {MIN_GRID_SIZE}")
            }
            ConfigError::GridTooLarge(s) => {
                write!(f, "grid size {s} is larger than {MAX_GRID_SIZE}")
            }
            ConfigError::NoAttempts => write!(f, "the number of attempts must be at least 1"),
            ConfigError::EmptyWindow => write!(f, "the recency window must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Generator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Width and height of the grid.
    pub grid_size: i32,

    /// Number of candidates to try for each obstacle and each coin.
    pub max_attempts: usize,

    /// Number of recent performance records used to classify the player.
    pub recency_window: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            max_attempts: retry::MAX_ATTEMPTS,
            recency_window: difficulty::RECENCY_WINDOW,
        }
    }
}

impl GeneratorConfig {
    /// Verify the parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if self.recency_window == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        Ok(())
    }
}

/// Number of requested and placed items for one generated level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementReport {
    /// Number of obstacles the tier asked for.
    pub requested_obstacles: usize,

    /// Number of obstacles in the level.
    pub placed_obstacles: usize,

    /// Number of coins the tier asked for.
    pub requested_coins: usize,

    /// Number of coins in the level.
    pub placed_coins: usize,
}

impl PlacementReport {
    /// Number of obstacles and coins that could not be placed.
    pub fn dropped(&self) -> usize {
        (self.requested_obstacles - self.placed_obstacles)
            + (self.requested_coins - self.placed_coins)
    }

    /// Whether fewer than half of the obstacles or of the coins could be placed.
    pub fn is_degraded(&self) -> bool {
        self.placed_obstacles * 2 < self.requested_obstacles
            || self.placed_coins * 2 < self.requested_coins
    }
}

/// Level generator.
///
/// The object only holds its configuration, so it can be shared between threads and used for
/// any number of players.
#[derive(Debug, Clone, Default)]
pub struct LevelGenerator {
    config: GeneratorConfig,
}

impl LevelGenerator {
    /// Create a [`LevelGenerator`] object.
    ///
    /// # Errors
    ///
    /// The method returns an error if the configuration is not valid.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Return the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Classify the player from their performance history.
    pub fn classify_difficulty(&self, history: &[PerformanceRecord]) -> DifficultyTier {
        difficulty::classify_difficulty(history, self.config.recency_window)
    }

    /// Generate a level adapted to the player's performance history.
    pub fn generate_level(&self, user_id: &str, history: &[PerformanceRecord]) -> Level {
        self.generate_level_with_rng(&mut rand::rng(), user_id, history)
    }

    /// Generate a level adapted to the player's performance history, using the provided random
    /// number generator.
    pub fn generate_level_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        user_id: &str,
        history: &[PerformanceRecord],
    ) -> Level {
        let tier: DifficultyTier = self.classify_difficulty(history);
        self.generate_with_tier(rng, user_id, tier).0
    }

    /// Generate a level at the given difficulty, without looking at any history.
    pub fn generate_level_with_tier(&self, user_id: &str, tier: DifficultyTier) -> Level {
        self.generate_with_tier(&mut rand::rng(), user_id, tier).0
    }

    /// Generate a level at the given difficulty and return it with its placement report.
    pub fn generate_with_tier<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        user_id: &str,
        tier: DifficultyTier,
    ) -> (Level, PlacementReport) {
        let weights: Weights = tier.weights();
        let mut level: Level = Level::new(user_id, tier, self.config.grid_size);

        let mut occupied: HashSet<Position> = HashSet::new();
        occupied.insert(level.player);
        occupied.insert(level.goal);

        let mut report = PlacementReport {
            requested_obstacles: tier.obstacle_count(),
            requested_coins: tier.coin_count(),
            ..Default::default()
        };
        debug!(
            "Generating {tier} level for {user_id}: grid = {}  obstacles = {}  coins = {}",
            self.config.grid_size, report.requested_obstacles, report.requested_coins
        );

        self.place_obstacles(rng, &mut level, &mut occupied, &weights, report.requested_obstacles);
        self.place_coins(rng, &mut level, &mut occupied, report.requested_coins);
        report.placed_obstacles = level.obstacles.len();
        report.placed_coins = level.coins.len();

        level.expected_time = level.compute_expected_time();

        if report.is_degraded() {
            warn!(
                "Level {}: only {}/{} obstacles and {}/{} coins placed",
                level.id,
                report.placed_obstacles,
                report.requested_obstacles,
                report.placed_coins,
                report.requested_coins
            );
        } else if report.dropped() > 0 {
            debug!("Level {}: {} items dropped", level.id, report.dropped());
        }
        (level, report)
    }

    /// Place up to `count` obstacles without blocking the way to the goal.
    fn place_obstacles<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        level: &mut Level,
        occupied: &mut HashSet<Position>,
        weights: &Weights,
        count: usize,
    ) {
        let grid_size: i32 = level.grid_size;
        let clustering: bool = weights.path_complexity > CLUSTER_MIN_COMPLEXITY;
        let mut obstacle_set: HashSet<Position> = HashSet::with_capacity(count);

        for i in 0..count {
            let obstacles: &Vec<Position> = &level.obstacles;
            let candidate: Option<Position> = retry(
                self.config.max_attempts,
                || {
                    let anchor: Option<&Position> = if clustering
                        && !obstacles.is_empty()
                        && rng.random_bool(CLUSTER_PROBABILITY)
                    {
                        obstacles.choose(rng)
                    } else {
                        None
                    };
                    match anchor {
                        Some(a) => a.offset(cluster_offset(rng), cluster_offset(rng)),
                        None => random_interior_cell(rng, grid_size),
                    }
                },
                |p| {
                    p.is_inside(grid_size)
                        && !occupied.contains(p)
                        && solvability::is_path_possible(
                            grid_size,
                            level.player,
                            level.goal,
                            &obstacle_set,
                            Some(*p),
                        )
                },
            );

            match candidate {
                Some(p) => {
                    obstacle_set.insert(p);
                    occupied.insert(p);
                    level.obstacles.push(p);
                }
                None => debug!("Obstacle {i} dropped after {} attempts", self.config.max_attempts),
            }
        }
    }

    /// Place up to `count` coins on free interior cells.
    fn place_coins<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        level: &mut Level,
        occupied: &mut HashSet<Position>,
        count: usize,
    ) {
        let grid_size: i32 = level.grid_size;

        for i in 0..count {
            let candidate: Option<Position> = retry(
                self.config.max_attempts,
                || random_interior_cell(rng, grid_size),
                |p| !occupied.contains(p),
            );

            match candidate {
                Some(p) => {
                    occupied.insert(p);
                    level.coins.push(Coin {
                        position: p,
                        collected: false,
                    });
                }
                None => debug!("Coin {i} dropped after {} attempts", self.config.max_attempts),
            }
        }
    }
}

/// Return a random cell that is not on the grid border.
fn random_interior_cell<R: Rng + ?Sized>(rng: &mut R, grid_size: i32) -> Position {
    Position::new(
        rng.random_range(1..=grid_size - 2),
        rng.random_range(1..=grid_size - 2),
    )
}

/// Return a random offset in `-2..=-1` or `1..=2`.
fn cluster_offset<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    let distance: i32 = rng.random_range(1..=CLUSTER_MAX_OFFSET);
    if rng.random_bool(0.5) { -distance } else { distance }
}

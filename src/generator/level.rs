/*
level.rs

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

//! Generated level.
//!
//! A [`Level`] is created by [`super::level_generator::LevelGenerator`] and is not modified
//! afterwards. Play sessions work on their own copy (see [`crate::game::Game`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use super::difficulty::DifficultyTier;
use super::position::Position;
use super::solvability;

/// Each obstacle slows the player down by this fraction of the base time.
const OBSTACLE_SLOWDOWN: f64 = 1.0 / 50.0;

/// Seconds per cell of Manhattan distance.
const SECONDS_PER_CELL: f64 = 0.5;

/// Coin on the grid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    /// Cell of the coin.
    pub position: Position,

    /// Whether the player picked up the coin. Always false in a generated level.
    pub collected: bool,
}

/// Broken level invariant, as reported by [`Level::validate`].
#[derive(Debug, PartialEq)]
pub enum LevelError {
    /// The player starts on the goal.
    StartOnGoal,

    /// A cell is outside the grid.
    OutOfGrid(Position),

    /// Two entities share the same cell.
    Overlap(Position),

    /// The goal cannot be reached from the player start.
    Unsolvable,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LevelError::StartOnGoal => write!(f, "the player starts on the goal"),
            LevelError::OutOfGrid(p) => write!(f, "cell {p} is outside the grid"),
            LevelError::Overlap(p) => write!(f, "several entities on cell {p}"),
            LevelError::Unsolvable => write!(f, "the goal cannot be reached"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Level layout and metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Unique level identifier.
    pub id: Uuid,

    /// Identifier of the player the level was generated for.
    pub user_id: String,

    /// Difficulty the level was generated at.
    pub difficulty: DifficultyTier,

    /// Width and height of the grid.
    pub grid_size: i32,

    /// Player start.
    pub player: Position,

    /// Cell to reach.
    pub goal: Position,

    /// Blocked cells, in placement order.
    pub obstacles: Vec<Position>,

    /// Coins, in placement order.
    pub coins: Vec<Coin>,

    /// Rough completion time estimate, in seconds.
    pub expected_time: f64,

    /// Generation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Level {
    /// Create an empty [`Level`] object.
    ///
    /// The player starts next to the top left corner and the goal is next to the bottom right
    /// corner.
    pub fn new(user_id: &str, difficulty: DifficultyTier, grid_size: i32) -> Self {
        let player: Position = Position::new(1, 1);
        let goal: Position = Position::new(grid_size - 2, grid_size - 2);
        let mut level = Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            difficulty,
            grid_size,
            player,
            goal,
            obstacles: Vec::new(),
            coins: Vec::new(),
            expected_time: 0.0,
            created_at: Utc::now(),
        };
        level.expected_time = level.compute_expected_time();
        level
    }

    /// Compute the expected completion time from the distance and the number of obstacles.
    pub fn compute_expected_time(&self) -> f64 {
        let distance: f64 = self.player.manhattan_distance(&self.goal) as f64;
        distance * (1.0 + self.obstacles.len() as f64 * OBSTACLE_SLOWDOWN) * SECONDS_PER_CELL
    }

    /// Return the obstacles as a set.
    pub fn obstacle_set(&self) -> HashSet<Position> {
        self.obstacles.iter().copied().collect()
    }

    /// Whether the cell holds an obstacle.
    pub fn is_obstacle(&self, position: &Position) -> bool {
        self.obstacles.contains(position)
    }

    /// Whether the goal would still be reachable if `candidate` became an obstacle.
    pub fn is_path_possible(&self, candidate: Position) -> bool {
        solvability::is_path_possible(
            self.grid_size,
            self.player,
            self.goal,
            &self.obstacle_set(),
            Some(candidate),
        )
    }

    /// Whether the goal is reachable with the current obstacles.
    pub fn is_solvable(&self) -> bool {
        solvability::is_path_possible(
            self.grid_size,
            self.player,
            self.goal,
            &self.obstacle_set(),
            None,
        )
    }

    /// Verify the level invariants.
    ///
    /// # Errors
    ///
    /// Return the first broken invariant found.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.player == self.goal {
            return Err(LevelError::StartOnGoal);
        }

        let mut occupied: HashSet<Position> = HashSet::new();
        let cells = [self.player, self.goal]
            .into_iter()
            .chain(self.obstacles.iter().copied())
            .chain(self.coins.iter().map(|c| c.position));
        for cell in cells {
            if !cell.is_inside(self.grid_size) {
                return Err(LevelError::OutOfGrid(cell));
            }
            if !occupied.insert(cell) {
                return Err(LevelError::Overlap(cell));
            }
        }

        if !self.is_solvable() {
            return Err(LevelError::Unsolvable);
        }
        Ok(())
    }
}

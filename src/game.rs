/*
game.rs

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

//! Manage the status of a game in progress.
//!
//! The [`Game`] object plays a copy of a generated level.
//! Coins collected during the game are tracked in the game's own list, so the generated level
//! stays untouched and can be replayed.
//! When the player reaches the goal, [`Game::performance_record`] returns the record to add to
//! the player's history.

use chrono::Utc;
use log::debug;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::generator::level::{Coin, Level};
use crate::generator::performance::PerformanceRecord;
use crate::generator::position::Position;

/// Player move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the (x, y) offset of the move.
    fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse a direction from a key: `U`, `D`, `L`, `R` (any case), or an arrow character.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_uppercase() {
            'U' | '↑' => Some(Direction::Up),
            'D' | '↓' => Some(Direction::Down),
            'L' | '←' => Some(Direction::Left),
            'R' | '→' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Direction::from_key(c).ok_or_else(|| format!("unknown move {c:?}")),
            _ => match s.to_ascii_lowercase().as_str() {
                "up" => Ok(Direction::Up),
                "down" => Ok(Direction::Down),
                "left" => Ok(Direction::Left),
                "right" => Ok(Direction::Right),
                _ => Err(format!("unknown move {s:?}")),
            },
        }
    }
}

/// Parse a sequence of single-key moves, ignoring white spaces and commas.
pub fn parse_moves(moves: &str) -> Result<Vec<Direction>, String> {
    moves
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| Direction::from_key(c).ok_or_else(|| format!("unknown move {c:?}")))
        .collect()
}

/// Result of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game is not started, or is already completed.
    Ignored,

    /// The move would leave the grid or hit an obstacle.
    Blocked,

    /// The player moved to an empty cell.
    Moved,

    /// The player moved and picked up a coin.
    CoinCollected,

    /// The player reached the goal and the game is completed.
    GoalReached,
}

/// Manage the status of the game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    /// Copy of the level being played.
    level: Level,

    /// Current player position.
    player: Position,

    /// Coins with the collected status of this game.
    coins: Vec<Coin>,

    /// Number of moves made.
    moves: usize,

    /// Time when the game started. Used to compute the game duration.
    start_time: Option<Instant>,

    /// Game duration, set when the player reaches the goal.
    duration: Option<Duration>,
}

impl Game {
    /// Create a [`Game`] object for a copy of the provided level.
    pub fn new(level: &Level) -> Self {
        let mut game = Self {
            level: level.clone(),
            player: level.player,
            coins: Vec::new(),
            moves: 0,
            start_time: None,
            duration: None,
        };
        game.reset();
        game
    }

    /// Restart the game: the player goes back to the start, and all the coins are available.
    pub fn reset(&mut self) {
        self.player = self.level.player;
        self.coins = self
            .level
            .coins
            .iter()
            .map(|c| Coin {
                position: c.position,
                collected: false,
            })
            .collect();
        self.moves = 0;
        self.start_time = None;
        self.duration = None;
    }

    /// Allow the player to move and start the timer.
    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
    }

    /// Whether the game has started.
    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Whether the player reached the goal.
    pub fn is_completed(&self) -> bool {
        self.duration.is_some()
    }

    /// Return the level being played.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Return the current player position.
    pub fn player(&self) -> Position {
        self.player
    }

    /// Return the number of moves made.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Return the coins with their collected status for this game.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Return the number of collected coins.
    pub fn coins_collected(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }

    /// Percentage of the coins collected. A level without coins is 100% efficient.
    pub fn efficiency(&self) -> f64 {
        if self.coins.is_empty() {
            100.0
        } else {
            self.coins_collected() as f64 * 100.0 / self.coins.len() as f64
        }
    }

    /// Return the time elapsed since the start, or the game duration if completed.
    pub fn elapsed(&self) -> Duration {
        match (self.duration, self.start_time) {
            (Some(d), _) => d,
            (None, Some(s)) => s.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    /// Move the player one cell in the given direction.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        if !self.is_started() || self.is_completed() {
            return MoveOutcome::Ignored;
        }

        let (dx, dy) = direction.delta();
        let target: Position = self.player.offset(dx, dy);
        if !target.is_inside(self.level.grid_size) || self.level.is_obstacle(&target) {
            debug!("Move {direction:?} to {target} blocked");
            return MoveOutcome::Blocked;
        }

        self.player = target;
        self.moves += 1;

        if target == self.level.goal {
            self.duration = Some(self.elapsed());
            debug!(
                "Goal reached in {} moves and {:.1}s",
                self.moves,
                self.elapsed().as_secs_f64()
            );
            return MoveOutcome::GoalReached;
        }

        match self
            .coins
            .iter_mut()
            .find(|c| c.position == target && !c.collected)
        {
            Some(coin) => {
                coin.collected = true;
                MoveOutcome::CoinCollected
            }
            None => MoveOutcome::Moved,
        }
    }

    /// Return the record of the completed game, or None if the goal has not been reached.
    pub fn performance_record(&self) -> Option<PerformanceRecord> {
        let duration: Duration = self.duration?;
        Some(PerformanceRecord {
            completed: true,
            coins_collected: self.coins_collected(),
            total_coins: self.coins.len(),
            time_spent: duration.as_secs_f64(),
            expected_time: self.level.expected_time,
            level_id: Some(self.level.id),
            difficulty: Some(self.level.difficulty),
            moves: self.moves,
            timestamp: Some(Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::difficulty::DifficultyTier;

    /// 5x5 level: player (1, 1), goal (3, 3), wall on (2, 1), coins on (1, 2) and (1, 3).
    fn small_level() -> Level {
        let mut level = Level::new("alice", DifficultyTier::Easy, 5);
        level.obstacles = vec![Position::new(2, 1)];
        level.coins = vec![
            Coin {
                position: Position::new(1, 2),
                collected: false,
            },
            Coin {
                position: Position::new(1, 3),
                collected: false,
            },
        ];
        level.expected_time = level.compute_expected_time();
        level
    }

    #[test]
    fn test_moves_ignored_before_start() {
        let mut game = Game::new(&small_level());
        assert_eq!(game.move_player(Direction::Down), MoveOutcome::Ignored);
        assert_eq!(game.player(), Position::new(1, 1));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_blocked_moves() {
        let mut game = Game::new(&small_level());
        game.start();
        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Blocked);
        assert_eq!(game.move_player(Direction::Up), MoveOutcome::Moved);
        assert_eq!(game.move_player(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(game.player(), Position::new(1, 0));
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_collect_and_complete() {
        let level = small_level();
        let mut game = Game::new(&level);
        game.start();

        let outcomes: Vec<MoveOutcome> = parse_moves("DDRR")
            .unwrap()
            .into_iter()
            .map(|d| game.move_player(d))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                MoveOutcome::CoinCollected,
                MoveOutcome::CoinCollected,
                MoveOutcome::Moved,
                MoveOutcome::GoalReached
            ]
        );
        assert!(game.is_completed());
        assert_eq!(game.move_player(Direction::Up), MoveOutcome::Ignored);

        let record = game.performance_record().unwrap();
        assert!(record.completed);
        assert_eq!(record.coins_collected, 2);
        assert_eq!(record.total_coins, 2);
        assert_eq!(record.moves, 4);
        assert_eq!(record.expected_time, level.expected_time);
        assert_eq!(record.level_id, Some(level.id));
        assert_eq!(record.difficulty, Some(DifficultyTier::Easy));
        assert_eq!(game.efficiency(), 100.0);

        // The generated level is not modified
        assert!(level.coins.iter().all(|c| !c.collected));
    }

    #[test]
    fn test_coin_collected_once() {
        let mut game = Game::new(&small_level());
        game.start();
        assert_eq!(game.move_player(Direction::Down), MoveOutcome::CoinCollected);
        assert_eq!(game.move_player(Direction::Up), MoveOutcome::Moved);
        assert_eq!(game.move_player(Direction::Down), MoveOutcome::Moved);
        assert_eq!(game.coins_collected(), 1);
        assert_eq!(game.efficiency(), 50.0);
        assert_eq!(game.performance_record(), None);
    }

    #[test]
    fn test_reset() {
        let mut game = Game::new(&small_level());
        game.start();
        game.move_player(Direction::Down);
        game.reset();
        assert_eq!(game.player(), Position::new(1, 1));
        assert_eq!(game.coins_collected(), 0);
        assert_eq!(game.moves(), 0);
        assert!(!game.is_started());
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!(
            parse_moves("uldd, ↑RDL").unwrap(),
            vec![
                Direction::Up,
                Direction::Left,
                Direction::Down,
                Direction::Down,
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left
            ]
        );
        assert!(parse_moves("UX").is_err());
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("r".parse::<Direction>(), Ok(Direction::Right));
        assert!("sideways".parse::<Direction>().is_err());
    }
}

/*
performance.rs

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

//! Result of a finished level attempt.
//!
//! A [`PerformanceRecord`] is produced once per attempt by the play session (see
//! [`crate::game::Game::performance_record`]) and is then only read, by the difficulty
//! classification and by the user statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::difficulty::DifficultyTier;

/// Time spent is never considered shorter than this when computing the pace ratio.
const MIN_TIME_SPENT_SEC: f64 = 1.0;

/// Outcome of one level attempt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    /// Whether the player reached the goal.
    pub completed: bool,

    /// Number of coins the player picked up.
    pub coins_collected: usize,

    /// Number of coins in the level.
    pub total_coins: usize,

    /// Seconds from the first move to the goal.
    pub time_spent: f64,

    /// Expected completion time of the level, in seconds, copied from the level.
    pub expected_time: f64,

    /// Identifier of the level that was played.
    #[serde(default)]
    pub level_id: Option<Uuid>,

    /// Difficulty of the level that was played.
    #[serde(default)]
    pub difficulty: Option<DifficultyTier>,

    /// Number of moves the player made.
    #[serde(default)]
    pub moves: usize,

    /// Completion timestamp.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PerformanceRecord {
    /// Create a [`PerformanceRecord`] object with only the fields that the difficulty
    /// classification uses.
    pub fn new(
        completed: bool,
        coins_collected: usize,
        total_coins: usize,
        time_spent: f64,
        expected_time: f64,
    ) -> Self {
        Self {
            completed,
            coins_collected,
            total_coins,
            time_spent,
            expected_time,
            level_id: None,
            difficulty: None,
            moves: 0,
            timestamp: None,
        }
    }

    /// Fraction of the coins that the player collected, between 0 and 1.
    ///
    /// Return None for a level without coins: such a level says nothing about the player's
    /// collecting skill.
    pub fn coin_ratio(&self) -> Option<f64> {
        if self.total_coins == 0 {
            return None;
        }
        Some((self.coins_collected as f64 / self.total_coins as f64).clamp(0.0, 1.0))
    }

    /// Expected time divided by the time spent. Above 1 when the player was faster than expected.
    pub fn pace_ratio(&self) -> f64 {
        self.expected_time / self.time_spent.max(MIN_TIME_SPENT_SEC)
    }
}

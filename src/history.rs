/*
history.rs

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

//! Manage the performance history of the players.
//!
//! The main object, [`PerformanceHistory`], keeps the records of each player in the order they
//! were played.
//! The most recent records feed the difficulty classification for the next level.
//! See the [`crate::saver::history`] module that saves and restores the [`PerformanceHistory`]
//! object.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::generator::difficulty::mean_coin_ratio;
use crate::generator::performance::PerformanceRecord;

/// Number of records kept per player. Older records are discarded.
const HISTORY_SIZE: usize = 100;

/// Summary of a player's history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserStats {
    /// Number of recorded attempts.
    pub attempts: usize,

    /// Number of completed levels.
    pub levels_completed: usize,

    /// Mean percentage of coins collected per attempt, over the levels that had coins.
    pub average_coin_percent: f64,
}

/// Records of all the players.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PerformanceHistory {
    /// Records indexed by user identifier, oldest first.
    users: HashMap<String, Vec<PerformanceRecord>>,
}

impl PerformanceHistory {
    /// Create a [`PerformanceHistory`] object.
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
    }

    /// Append a record to the player's history.
    pub fn add_record(&mut self, user_id: &str, record: PerformanceRecord) {
        let records: &mut Vec<PerformanceRecord> =
            self.users.entry(user_id.to_string()).or_default();
        records.push(record);
        if records.len() > HISTORY_SIZE {
            let extra: usize = records.len() - HISTORY_SIZE;
            records.drain(..extra);
        }
    }

    /// Return all the records of the player, oldest first.
    ///
    /// Return None when the player has no record.
    pub fn get_records(&self, user_id: &str) -> Option<&Vec<PerformanceRecord>> {
        self.users.get(user_id)
    }

    /// Return the `count` most recent records of the player, oldest first.
    pub fn recent(&self, user_id: &str, count: usize) -> &[PerformanceRecord] {
        match self.users.get(user_id) {
            Some(records) => &records[records.len().saturating_sub(count)..],
            None => &[],
        }
    }

    /// Return the summary of the player's history.
    pub fn user_stats(&self, user_id: &str) -> UserStats {
        let records: &[PerformanceRecord] = match self.users.get(user_id) {
            Some(r) if !r.is_empty() => r.as_slice(),
            _ => return UserStats::default(),
        };
        UserStats {
            attempts: records.len(),
            levels_completed: records.iter().filter(|r| r.completed).count(),
            average_coin_percent: mean_coin_ratio(records) * 100.0,
        }
    }

    /// Remove all the records of the player.
    pub fn clear_user(&mut self, user_id: &str) {
        self.users.remove(user_id);
    }

    /// Return whether the history is empty (no record for any player).
    pub fn is_empty(&self) -> bool {
        self.users.values().all(|r| r.is_empty())
    }
}

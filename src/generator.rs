/*
generator.rs

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

//! Generate levels adapted to the player's skill.
//!
//! Generating a level is done in three steps:
//!
//! * The player's recent [`performance::PerformanceRecord`] objects are turned into a
//!   [`difficulty::DifficultyTier`] by [`difficulty::classify_difficulty`].
//!   Each tier comes with [`difficulty::Weights`] that control how many obstacles and coins are
//!   requested, and whether obstacles are clustered.
//!
//! * A [`level::Level`] is filled by [`level_generator::LevelGenerator`].
//!   Every obstacle candidate goes through the [`solvability::is_path_possible`] search, so the
//!   goal always stays reachable.
//!   Candidates are drawn with the [`retry::retry`] loop; if no candidate is accepted in time,
//!   the obstacle or coin is dropped and the level simply has fewer of them.
//!
//! * The expected completion time is computed from the distance to the goal and the number of
//!   obstacles. It is later compared to the real completion time to classify the player for the
//!   next level.
//!
//! [`recommend::recommend_tier`] is an alternative to the first step: it draws the tier at
//! random, with probabilities that depend on the player's last plays.

pub mod difficulty;
pub mod level;
pub mod level_generator;
pub mod performance;
pub mod position;
pub mod recommend;
pub mod retry;
pub mod solvability;

/*
solvability.rs

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

//! Verify that the goal can be reached from the player start.
//!
//! The check is a breadth-first search over the 4-connected grid. It runs once per obstacle
//! candidate during generation, so its cost is bounded by the grid area for each candidate.

use std::collections::{HashSet, VecDeque};

use super::position::Position;

/// Whether a path exists from `start` to `goal` when the cells in `obstacles`, and the optional
/// `candidate` cell, are blocked.
///
/// The search stays within `[0, grid_size)` on both axes. A blocked start or goal cannot be
/// reached.
pub fn is_path_possible(
    grid_size: i32,
    start: Position,
    goal: Position,
    obstacles: &HashSet<Position>,
    candidate: Option<Position>,
) -> bool {
    let is_blocked = |p: &Position| obstacles.contains(p) || candidate == Some(*p);

    if !start.is_inside(grid_size) || is_blocked(&start) {
        return false;
    }

    let mut queue: VecDeque<Position> = VecDeque::new();
    let mut visited: HashSet<Position> = HashSet::new();
    queue.push_back(start);
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return true;
        }
        for next in current.neighbours() {
            if next.is_inside(grid_size) && !is_blocked(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

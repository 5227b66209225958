/*
difficulty.rs

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

//! Difficulty tiers and player skill classification.
//!
//! The skill score is a weighted mean of three signals computed over the most recent records:
//!
//! * the completion rate,
//! * the coin collection ratio, over the levels that had coins,
//! * the pace ratio (expected time over time spent).
//!
//! The score selects one of the four [`DifficultyTier`] values, and each tier maps to the
//! [`Weights`] that drive the level generation.

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

use super::performance::PerformanceRecord;

/// Default number of recent records used for the classification.
pub const RECENCY_WINDOW: usize = 5;

const COMPLETION_FACTOR: f64 = 0.4;
const COIN_FACTOR: f64 = 0.3;
const PACE_FACTOR: f64 = 0.3;

/// Score thresholds, evaluated from the hardest tier.
const SUPERHARD_THRESHOLD: f64 = 0.8;
const HARD_THRESHOLD: f64 = 0.6;
const MEDIUM_THRESHOLD: f64 = 0.4;

/// Level difficulty, ordered by increasing challenge.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DifficultyTier {
    #[default]
    Easy,
    Medium,
    Hard,
    Superhard,
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DifficultyTier::Easy => write!(f, "easy"),
            DifficultyTier::Medium => write!(f, "medium"),
            DifficultyTier::Hard => write!(f, "hard"),
            DifficultyTier::Superhard => write!(f, "superhard"),
        }
    }
}

/// Generation weights for a tier. All values are between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Scales the number of obstacles.
    pub obstacle: f64,

    /// Scales the number of coins.
    pub coin: f64,

    /// Above 0.5, obstacles tend to be placed next to existing ones.
    pub path_complexity: f64,
}

impl DifficultyTier {
    /// All the tiers, from the easiest.
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
        DifficultyTier::Superhard,
    ];

    /// Rank of the tier, from 0 (easy) to 3 (superhard).
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Return the generation weights for the tier.
    pub const fn weights(&self) -> Weights {
        match self {
            DifficultyTier::Easy => Weights {
                obstacle: 0.3,
                coin: 0.8,
                path_complexity: 0.2,
            },
            DifficultyTier::Medium => Weights {
                obstacle: 0.5,
                coin: 0.6,
                path_complexity: 0.5,
            },
            DifficultyTier::Hard => Weights {
                obstacle: 0.7,
                coin: 0.5,
                path_complexity: 0.7,
            },
            DifficultyTier::Superhard => Weights {
                obstacle: 0.9,
                coin: 0.4,
                path_complexity: 0.9,
            },
        }
    }

    /// Number of obstacles requested for the tier.
    pub fn obstacle_count(&self) -> usize {
        (15.0 + 40.0 * self.weights().obstacle).floor() as usize
    }

    /// Number of coins requested for the tier.
    pub fn coin_count(&self) -> usize {
        (10.0 + 15.0 * self.weights().coin).floor() as usize
    }

    /// Map a skill score to a tier.
    pub fn from_score(score: f64) -> Self {
        if score > SUPERHARD_THRESHOLD {
            DifficultyTier::Superhard
        } else if score > HARD_THRESHOLD {
            DifficultyTier::Hard
        } else if score > MEDIUM_THRESHOLD {
            DifficultyTier::Medium
        } else {
            DifficultyTier::Easy
        }
    }
}

/// Compute the skill score over the last `window` records.
///
/// Return None when there is no record to analyze.
pub fn skill_score(history: &[PerformanceRecord], window: usize) -> Option<f64> {
    let recent: &[PerformanceRecord] = &history[history.len().saturating_sub(window)..];
    if recent.is_empty() {
        return None;
    }
    let n: f64 = recent.len() as f64;

    let completion_rate: f64 = recent.iter().filter(|r| r.completed).count() as f64 / n;
    let coin_ratio: f64 = mean_coin_ratio(recent);
    let pace_ratio: f64 = recent.iter().map(|r| r.pace_ratio()).sum::<f64>() / n;

    let score: f64 =
        COMPLETION_FACTOR * completion_rate + COIN_FACTOR * coin_ratio + PACE_FACTOR * pace_ratio;
    debug!(
        "Skill over {} records: completion = {completion_rate:.2}  coins = {coin_ratio:.2}  pace = {pace_ratio:.2}  score = {score:.3}",
        recent.len()
    );
    Some(score)
}

/// Mean coin ratio of the records. Levels without coins are left out, and 0 is returned when
/// none of the records had coins.
pub fn mean_coin_ratio(records: &[PerformanceRecord]) -> f64 {
    let ratios: Vec<f64> = records.iter().filter_map(|r| r.coin_ratio()).collect();
    if ratios.is_empty() {
        0.0
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    }
}

/// Classify the player from their performance history, using the last `window` records.
///
/// An empty history always gives [`DifficultyTier::Easy`].
pub fn classify_difficulty(history: &[PerformanceRecord], window: usize) -> DifficultyTier {
    match skill_score(history, window) {
        Some(score) => DifficultyTier::from_score(score),
        None => DifficultyTier::Easy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(
        completed: usize,
        total: usize,
        coin_ratio: f64,
        pace: f64,
    ) -> Vec<PerformanceRecord> {
        (0..total)
            .map(|i| {
                PerformanceRecord::new(
                    i < completed,
                    (coin_ratio * 10.0).round() as usize,
                    10,
                    10.0,
                    10.0 * pace,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_history_is_easy() {
        assert_eq!(classify_difficulty(&[], RECENCY_WINDOW), DifficultyTier::Easy);
        assert_eq!(skill_score(&[], RECENCY_WINDOW), None);
    }

    #[test]
    fn test_perfect_window_is_superhard() {
        let history = records(5, 5, 1.0, 1.0);
        let score = skill_score(&history, RECENCY_WINDOW).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
        assert_eq!(
            classify_difficulty(&history, RECENCY_WINDOW),
            DifficultyTier::Superhard
        );
    }

    #[test]
    fn test_null_window_is_easy() {
        let history = records(0, 5, 0.0, 0.0);
        assert_eq!(skill_score(&history, RECENCY_WINDOW), Some(0.0));
        assert_eq!(classify_difficulty(&history, RECENCY_WINDOW), DifficultyTier::Easy);
    }

    #[test]
    fn test_only_recent_window_is_used() {
        // Five perfect recent runs after many failures
        let mut history = records(0, 20, 0.0, 0.0);
        history.extend(records(5, 5, 1.0, 1.0));
        assert_eq!(
            classify_difficulty(&history, RECENCY_WINDOW),
            DifficultyTier::Superhard
        );

        // A failure at the end only lowers the completion rate of the window
        history.push(PerformanceRecord::new(false, 10, 10, 10.0, 10.0));
        let score = skill_score(&history, RECENCY_WINDOW).unwrap();
        assert!((score - 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_shorter_history_than_window() {
        let history = records(1, 2, 0.5, 0.5);
        // 0.4 * 0.5 + 0.3 * 0.5 + 0.3 * 0.5 = 0.5
        let score = skill_score(&history, RECENCY_WINDOW).unwrap();
        assert!((score - 0.5).abs() < 1e-9);
        assert_eq!(classify_difficulty(&history, RECENCY_WINDOW), DifficultyTier::Medium);
    }

    #[test]
    fn test_levels_without_coins_do_not_inflate_the_tier() {
        // Completed at par pace, but nothing to collect: 0.4 + 0.3 = 0.7
        let history: Vec<PerformanceRecord> = (0..5)
            .map(|_| PerformanceRecord::new(true, 0, 0, 10.0, 10.0))
            .collect();
        let score = skill_score(&history, RECENCY_WINDOW).unwrap();
        assert!((score - 0.7).abs() < 1e-9);
        assert_eq!(classify_difficulty(&history, RECENCY_WINDOW), DifficultyTier::Hard);
    }

    #[test]
    fn test_coin_mean_skips_levels_without_coins() {
        let history = vec![
            PerformanceRecord::new(true, 3, 4, 10.0, 10.0),
            PerformanceRecord::new(true, 0, 0, 10.0, 10.0),
            PerformanceRecord::new(true, 1, 4, 10.0, 10.0),
        ];
        assert!((mean_coin_ratio(&history) - 0.5).abs() < 1e-9);
        assert_eq!(mean_coin_ratio(&history[1..2]), 0.0);
        assert_eq!(mean_coin_ratio(&[]), 0.0);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(DifficultyTier::from_score(0.4), DifficultyTier::Easy);
        assert_eq!(DifficultyTier::from_score(0.41), DifficultyTier::Medium);
        assert_eq!(DifficultyTier::from_score(0.6), DifficultyTier::Medium);
        assert_eq!(DifficultyTier::from_score(0.61), DifficultyTier::Hard);
        assert_eq!(DifficultyTier::from_score(0.8), DifficultyTier::Hard);
        assert_eq!(DifficultyTier::from_score(0.81), DifficultyTier::Superhard);
        assert_eq!(DifficultyTier::from_score(3.5), DifficultyTier::Superhard);
    }

    #[test]
    fn test_completion_rate_is_monotonic() {
        for (coin_ratio, pace) in [(0.0, 0.0), (0.3, 0.5), (0.6, 0.2), (1.0, 1.0)] {
            let mut previous: u8 = 0;
            for completed in 0..=5 {
                let tier = classify_difficulty(&records(completed, 5, coin_ratio, pace), 5);
                assert!(tier.rank() >= previous);
                previous = tier.rank();
            }
        }
    }

    #[test]
    fn test_requested_counts() {
        assert_eq!(DifficultyTier::Easy.obstacle_count(), 27);
        assert_eq!(DifficultyTier::Medium.obstacle_count(), 35);
        assert_eq!(DifficultyTier::Hard.obstacle_count(), 43);
        assert_eq!(DifficultyTier::Superhard.obstacle_count(), 51);
        assert_eq!(DifficultyTier::Easy.coin_count(), 22);
        assert_eq!(DifficultyTier::Medium.coin_count(), 19);
        assert_eq!(DifficultyTier::Hard.coin_count(), 17);
        assert_eq!(DifficultyTier::Superhard.coin_count(), 16);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(DifficultyTier::Easy < DifficultyTier::Medium);
        assert!(DifficultyTier::Hard < DifficultyTier::Superhard);
        for (i, tier) in DifficultyTier::ALL.iter().enumerate() {
            assert_eq!(tier.rank() as usize, i);
            assert_eq!(DifficultyTier::from_repr(i as u8), Some(*tier));
        }
    }

    #[test]
    fn test_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&DifficultyTier::Superhard).unwrap(),
            "\"superhard\""
        );
        assert_eq!(DifficultyTier::Superhard.to_string(), "superhard");
    }
}

/*
recommend.rs

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

//! Probabilistic tier recommendation.
//!
//! [`difficulty::classify_difficulty`](super::difficulty::classify_difficulty) always gives the
//! same tier for the same history.
//! The recommender instead scores the last few plays and draws the tier from a probability table
//! selected by that score, so a strong player still gets an easier level from time to time and a
//! struggling player occasionally gets a harder one.
//!
//! Each play is reduced to a [`PlayFeature`]: whether the goal was reached, the fraction of coins
//! collected, and a speed value that decreases with the time spent.
//! Missing plays, for a player with a short history, count as failed plays.

use log::{debug, warn};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::difficulty::DifficultyTier;
use super::performance::PerformanceRecord;

/// Number of recent plays used by the recommender.
pub const RECOMMEND_PLAYS: usize = 3;

/// Tier probabilities when there is no play to score, from easy to superhard.
pub const DEFAULT_PROBABILITIES: [f64; 4] = [0.5, 0.3, 0.15, 0.05];

const FINISHED_FACTOR: f64 = 0.5;
const COINS_FACTOR: f64 = 0.3;
const SPEED_FACTOR: f64 = 0.2;

/// Score limits and the matching probabilities. The last table applies above the last limit.
const PROBABILITY_TABLE: [(f64, [f64; 4]); 3] = [
    (0.3, [0.8, 0.15, 0.04, 0.01]),
    (0.6, [0.4, 0.4, 0.15, 0.05]),
    (0.85, [0.15, 0.5, 0.25, 0.10]),
];
const TOP_PROBABILITIES: [f64; 4] = [0.05, 0.25, 0.45, 0.25];

/// Summary of one play, with all the values between 0 and 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayFeature {
    /// 1 if the goal was reached, 0 otherwise.
    pub finished: f64,

    /// Fraction of the coins collected.
    pub coins: f64,

    /// `1 / (1 + time spent)`.
    pub speed: f64,
}

impl PlayFeature {
    pub fn from_record(record: &PerformanceRecord) -> Self {
        Self {
            finished: if record.completed { 1.0 } else { 0.0 },
            coins: (record.coins_collected as f64 / record.total_coins.max(1) as f64).min(1.0),
            speed: (1.0 / (1.0 + record.time_spent.max(0.0))).min(1.0),
        }
    }
}

/// Return the features of the [`RECOMMEND_PLAYS`] most recent plays, oldest first.
///
/// When the history is shorter, the missing plays are zero features at the end.
pub fn play_features(history: &[PerformanceRecord]) -> [PlayFeature; RECOMMEND_PLAYS] {
    let recent: &[PerformanceRecord] = &history[history.len().saturating_sub(RECOMMEND_PLAYS)..];
    let mut features: [PlayFeature; RECOMMEND_PLAYS] = [PlayFeature::default(); RECOMMEND_PLAYS];
    for (feature, record) in features.iter_mut().zip(recent) {
        *feature = PlayFeature::from_record(record);
    }
    features
}

/// Return the probability of each tier, from easy to superhard.
pub fn tier_probabilities(features: &[PlayFeature]) -> [f64; 4] {
    if features.is_empty() {
        return DEFAULT_PROBABILITIES;
    }
    let n: f64 = features.len() as f64;
    let finished: f64 = features.iter().map(|f| f.finished).sum::<f64>() / n;
    let coins: f64 = features.iter().map(|f| f.coins).sum::<f64>() / n;
    let speed: f64 = features.iter().map(|f| f.speed).sum::<f64>() / n;
    let score: f64 = FINISHED_FACTOR * finished + COINS_FACTOR * coins + SPEED_FACTOR * speed;

    let probabilities: [f64; 4] = PROBABILITY_TABLE
        .iter()
        .find(|(limit, _)| score < *limit)
        .map_or(TOP_PROBABILITIES, |(_, p)| *p);
    debug!("Recommendation score = {score:.3}  probabilities = {probabilities:?}");
    probabilities
}

/// Reward of a play: 1 when the goal was reached, otherwise the fraction of coins collected.
pub fn reward(record: &PerformanceRecord) -> f64 {
    if record.completed {
        1.0
    } else {
        (record.coins_collected as f64 / record.total_coins.max(1) as f64).min(1.0)
    }
}

/// Draw a tier for the player from their recent history.
///
/// Return the tier and the probabilities it was drawn from.
pub fn recommend_tier<R: Rng + ?Sized>(
    rng: &mut R,
    history: &[PerformanceRecord],
) -> (DifficultyTier, [f64; 4]) {
    let probabilities: [f64; 4] = tier_probabilities(&play_features(history));
    let ranked: Vec<(usize, f64)> = probabilities.iter().copied().enumerate().collect();
    let tier: DifficultyTier = match ranked.choose_weighted(rng, |(_, p)| *p) {
        Ok((rank, _)) => DifficultyTier::from_repr(*rank as u8).unwrap_or_default(),
        Err(e) => {
            warn!("Cannot draw a tier from {probabilities:?}: {e}");
            DifficultyTier::default()
        }
    };
    (tier, probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn perfect_play() -> PerformanceRecord {
        PerformanceRecord::new(true, 8, 8, 0.0, 12.0)
    }

    fn failed_play() -> PerformanceRecord {
        PerformanceRecord::new(false, 0, 8, 30.0, 12.0)
    }

    #[test]
    fn test_play_feature() {
        let feature = PlayFeature::from_record(&PerformanceRecord::new(false, 3, 4, 1.0, 10.0));
        assert_eq!(
            feature,
            PlayFeature {
                finished: 0.0,
                coins: 0.75,
                speed: 0.5
            }
        );
        // No coin to collect
        assert_eq!(
            PlayFeature::from_record(&PerformanceRecord::new(true, 0, 0, 0.0, 1.0)).coins,
            0.0
        );
    }

    #[test]
    fn test_features_use_the_last_plays() {
        let mut history = vec![perfect_play(); 5];
        history.push(failed_play());
        let features = play_features(&history);
        assert_eq!(features[0], PlayFeature::from_record(&perfect_play()));
        assert_eq!(features[2], PlayFeature::from_record(&failed_play()));
    }

    #[test]
    fn test_short_history_is_padded() {
        let features = play_features(&[perfect_play()]);
        assert_eq!(features[0].finished, 1.0);
        assert_eq!(features[1], PlayFeature::default());
        assert_eq!(features[2], PlayFeature::default());

        // Score is 1/3: second table
        assert_eq!(tier_probabilities(&features), [0.4, 0.4, 0.15, 0.05]);
    }

    #[test]
    fn test_probability_tables() {
        assert_eq!(tier_probabilities(&[]), DEFAULT_PROBABILITIES);
        assert_eq!(
            tier_probabilities(&play_features(&[])),
            [0.8, 0.15, 0.04, 0.01]
        );
        assert_eq!(
            tier_probabilities(&play_features(&std::array::from_fn::<_, 3, _>(|_| perfect_play()))),
            TOP_PROBABILITIES
        );

        // Scores of 0.9 and 0.75
        let fast = PlayFeature {
            finished: 1.0,
            coins: 1.0,
            speed: 0.5,
        };
        assert_eq!(tier_probabilities(&[fast]), TOP_PROBABILITIES);
        let half_coins = PlayFeature { coins: 0.5, ..fast };
        assert_eq!(tier_probabilities(&[half_coins]), [0.15, 0.5, 0.25, 0.10]);

        for (_, p) in PROBABILITY_TABLE {
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reward() {
        assert_eq!(reward(&perfect_play()), 1.0);
        assert_eq!(reward(&PerformanceRecord::new(false, 3, 4, 10.0, 5.0)), 0.75);
        assert_eq!(reward(&PerformanceRecord::new(false, 0, 0, 10.0, 5.0)), 0.0);
    }

    #[test]
    fn test_recommended_tiers_follow_probabilities() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut counts = [0usize; 4];
        for _ in 0..2000 {
            let (tier, probabilities) = recommend_tier(&mut rng, &std::array::from_fn::<_, 3, _>(|_| failed_play()));
            assert_eq!(probabilities, [0.8, 0.15, 0.04, 0.01]);
            counts[tier.rank() as usize] += 1;
        }
        assert!(counts[0] > 1400);
        assert!(counts[3] < 100);

        let mut counts = [0usize; 4];
        for _ in 0..2000 {
            let (tier, _) = recommend_tier(&mut rng, &std::array::from_fn::<_, 3, _>(|_| perfect_play()));
            counts[tier.rank() as usize] += 1;
        }
        assert!(counts[2] > counts[0]);
        assert!(counts[3] > counts[0]);
    }

    #[test]
    fn test_seeded_recommendation_is_reproducible() {
        let history = vec![perfect_play(), failed_play()];
        let draw = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| recommend_tier(&mut rng, &history).0)
                .collect::<Vec<DifficultyTier>>()
        };
        assert_eq!(draw(3), draw(3));
    }
}

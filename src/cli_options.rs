/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! List the difficulty tiers:
//!
//! ```text
//! $ mazewise --ls
//! tier       obstacles  coins  clustering
//! easy              27     22  no
//! medium            35     19  no
//! hard              43     17  yes
//! superhard         51     16  yes
//! ```
//!
//! Generate a level for `alice` from her saved history, play it, and record the result:
//!
//! ```text
//! $ mazewise -u alice --data-dir ~/.local/share/mazewise --play RRRRDDDDRRRRDDDDRRRRDDDD
//! ```
//!
//! Generate three reproducible superhard levels and print some statistics:
//!
//! ```text
//! $ mazewise -f superhard -c 3 --seed 42 -s
//! ```

use clap::Parser;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::env;
use std::path::PathBuf;
use std::time::Instant;

use mazewise::game::{self, Game, MoveOutcome};
use mazewise::generator::difficulty::DifficultyTier;
use mazewise::generator::level::Level;
use mazewise::generator::level_generator::{
    GRID_SIZE, GeneratorConfig, LevelGenerator, PlacementReport,
};
use mazewise::generator::performance::PerformanceRecord;
use mazewise::generator::recommend::{self, RECOMMEND_PLAYS};
use mazewise::history::{PerformanceHistory, UserStats};
use mazewise::saver::history::SaverHistory;

/// Generate maze levels adapted to the player's skill.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// List the difficulty tiers
    #[arg(short, long, default_value_t = false)]
    ls: bool,

    /// Identifier of the player
    #[arg(short, long, default_value = "player")]
    user: String,

    /// Difficulty level, instead of classifying the player from their history
    #[arg(value_enum, short = 'f', long)]
    difficulty: Option<DifficultyTier>,

    /// Draw the difficulty at random, with probabilities based on the player's last plays
    #[arg(short, long, default_value_t = false, conflicts_with = "difficulty")]
    recommend: bool,

    /// Number of levels to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Width and height of the grid
    #[arg(short, long, default_value_t = GRID_SIZE)]
    grid_size: i32,

    /// Seed for reproducible levels
    #[arg(long)]
    seed: Option<u64>,

    /// Directory where the performance history is saved
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Moves to play on the first level (U, D, L, R)
    #[arg(short, long)]
    play: Option<String>,

    /// Time spent in seconds to record for the played level, instead of the measured time
    #[arg(short, long, requires = "play")]
    time: Option<f64>,

    /// Print the player statistics
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Delete the player's history before generating
    #[arg(long, default_value_t = false)]
    clear_history: bool,

    /// Print some statistics after generating the levels
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Reject the option combinations that clap cannot express.
fn check_args(args: &Args) -> Result<(), String> {
    if args.play.is_some() && args.count == 0 {
        return Err("--play needs at least one level (--count must not be 0)".to_string());
    }
    Ok(())
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();
    if let Err(e) = check_args(&args) {
        eprintln!("Error: {e}");
        return 1;
    }

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // List the tiers
    //
    if args.ls {
        println!("tier       obstacles  coins  clustering");
        for tier in DifficultyTier::ALL {
            println!(
                "{:<10} {:>9} {:>6}  {}",
                tier.to_string(),
                tier.obstacle_count(),
                tier.coin_count(),
                if tier.weights().path_complexity > 0.5 { "yes" } else { "no" }
            );
        }
        return 0;
    }

    let generator: LevelGenerator = match LevelGenerator::new(GeneratorConfig {
        grid_size: args.grid_size,
        ..Default::default()
    }) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    //
    // Load the history of the player
    //
    let saver: Option<SaverHistory> = args.data_dir.clone().map(SaverHistory::new);
    let mut history: PerformanceHistory = match &saver {
        Some(s) => match s.get_history() {
            Ok(Some(h)) => h,
            Ok(None) => PerformanceHistory::new(),
            Err(e) => {
                eprintln!("Error: cannot read the history: {e}");
                return 1;
            }
        },
        None => PerformanceHistory::new(),
    };
    let mut history_updated: bool = false;
    if args.clear_history {
        history.clear_user(&args.user);
        match (&saver, history.is_empty()) {
            (Some(s), true) => {
                if let Err(e) = s.delete_save() {
                    eprintln!("Error: cannot delete the history: {e}");
                    return 1;
                }
            }
            _ => history_updated = true,
        }
    }

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let tier: DifficultyTier = match (args.difficulty, args.recommend) {
        (Some(t), _) => t,
        (None, true) => {
            let (t, probabilities) =
                recommend::recommend_tier(&mut rng, history.recent(&args.user, RECOMMEND_PLAYS));
            debug!("Tier {t} drawn from {probabilities:?}");
            t
        }
        (None, false) => generator.classify_difficulty(
            history.recent(&args.user, generator.config().recency_window),
        ),
    };
    debug!("Difficulty for {}: {tier}", args.user);

    //
    // Generate the levels
    //
    let mut levels: Vec<Level> = Vec::with_capacity(args.count);
    let mut reports: Vec<PlacementReport> = Vec::with_capacity(args.count);
    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    for i in 0..args.count {
        debug!("Iteration {i}");
        let start: Instant = Instant::now();
        let (level, report) = generator.generate_with_tier(&mut rng, &args.user, tier);
        let duration: f32 = start.elapsed().as_secs_f32();
        total += duration;
        if duration > max {
            max = duration;
        }

        match serde_json::to_string_pretty(&level) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: cannot serialize level {}: {e}", level.id);
                return 1;
            }
        }
        levels.push(level);
        reports.push(report);
    }

    //
    // Play the first level
    //
    if let (Some(moves), Some(level)) = (&args.play, levels.first()) {
        let directions: Vec<game::Direction> = match game::parse_moves(moves) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        };

        let mut game: Game = Game::new(level);
        game.start();
        for direction in directions {
            let outcome: MoveOutcome = game.move_player(direction);
            debug!("{direction:?}: {outcome:?} at {}", game.player());
            if outcome == MoveOutcome::GoalReached {
                break;
            }
        }

        match game.performance_record() {
            Some(mut record) => {
                if let Some(t) = args.time {
                    record.time_spent = t;
                }
                print_record(&record, game.efficiency());
                history.add_record(&args.user, record);
                history_updated = true;
            }
            None => println!(
                "Goal not reached after {} moves: player at {}, goal at {}",
                game.moves(),
                game.player(),
                level.goal
            ),
        }
    }

    if let (Some(s), true) = (&saver, history_updated) {
        if let Err(e) = s.save_history(&history) {
            eprintln!("Error: cannot save the history: {e}");
            return 1;
        }
    }

    if args.stats {
        print_stats(&args.user, &history.user_stats(&args.user));
    }

    // Print some stats
    if args.summary && args.count > 0 {
        let obstacles: usize = reports.iter().map(|r| r.placed_obstacles).sum();
        let coins: usize = reports.iter().map(|r| r.placed_coins).sum();
        let dropped: usize = reports.iter().map(|r| r.dropped()).sum();
        let degraded: usize = reports.iter().filter(|r| r.is_degraded()).count();
        println!(
            "
           difficulty = {}
           total time = {}s
         average time = {}s
             max time = {}s
    average obstacles = {}/{}
        average coins = {}/{}
        dropped items = {}
      degraded levels = {}",
            tier,
            total,
            total / args.count as f32,
            max,
            obstacles as f32 / args.count as f32,
            tier.obstacle_count(),
            coins as f32 / args.count as f32,
            tier.coin_count(),
            dropped,
            degraded
        );
    }
    0
}

/// Print the result of a played level.
fn print_record(record: &PerformanceRecord, efficiency: f64) {
    println!(
        "Level complete! Time: {:.1}s (expected {:.1}s) | Coins: {}/{} | Moves: {} | Efficiency: {:.0}% | Reward: {:.2}",
        record.time_spent,
        record.expected_time,
        record.coins_collected,
        record.total_coins,
        record.moves,
        efficiency,
        recommend::reward(record)
    );
}

/// Print the player statistics.
fn print_stats(user_id: &str, stats: &UserStats) {
    println!(
        "{user_id}: {} levels completed out of {} attempts, {:.0}% coins collected on average",
        stats.levels_completed, stats.attempts, stats.average_coin_percent
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_needs_a_level() {
        let args = Args::try_parse_from(["mazewise", "--play", "RRDD", "-c", "0"]).unwrap();
        assert!(check_args(&args).is_err());

        let args = Args::try_parse_from(["mazewise", "--play", "RRDD"]).unwrap();
        assert!(check_args(&args).is_ok());
        let args = Args::try_parse_from(["mazewise", "-c", "0"]).unwrap();
        assert!(check_args(&args).is_ok());
    }

    #[test]
    fn test_recommend_conflicts_with_difficulty() {
        assert!(Args::try_parse_from(["mazewise", "--recommend", "-f", "hard"]).is_err());
        let args = Args::try_parse_from(["mazewise", "-r"]).unwrap();
        assert!(args.recommend);
        assert_eq!(args.difficulty, None);
    }

    #[test]
    fn test_time_requires_play() {
        assert!(Args::try_parse_from(["mazewise", "-t", "12.5"]).is_err());
    }
}

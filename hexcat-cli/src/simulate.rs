//! Simulate command - automated games against the cat
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_simulation(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use hexcat_core::{Blocker, Difficulty, GameConfig, GameState, GameStatus};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Board radius
    #[arg(long, default_value = "11")]
    pub board_size: i32,

    /// easy, normal or hard
    #[arg(long, default_value = "normal")]
    pub difficulty: Difficulty,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Block random cells instead of the best simulated block
    #[arg(long)]
    pub random: bool,

    /// Maximum blocks per game
    #[arg(long, default_value = "500")]
    pub max_moves: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    status: GameStatus,
    moves: u32,
    score: u32,
}

/// Aggregated simulation results
#[derive(Clone, Debug, Serialize)]
struct SimulationResults {
    blocker: &'static str,
    total_games: usize,
    player_wins: usize,
    cat_escapes: usize,
    unfinished: usize,
    win_rate: f32,
    avg_score: f32,
    avg_moves: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Validate configuration
/// 2. Play every game with the chosen blocker
/// 3. Report results
pub fn run(args: SimulateArgs) -> Result<()> {
    let config = GameConfig::new(args.board_size, args.difficulty);
    config.validate().context("Invalid game configuration")?;

    tracing::info!(
        "Simulating {} games (board {}, difficulty {}, {} blocker)",
        args.games,
        args.board_size,
        args.difficulty,
        if args.random { "random" } else { "greedy" }
    );

    let results = run_simulation(&args, config)?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_simulation(args: &SimulateArgs, config: GameConfig) -> Result<SimulationResults> {
    let mut rng = create_rng(args.seed);
    let mut games = Vec::with_capacity(args.games);
    let mut blocker_name = "greedy";

    for game_number in 1..=args.games {
        let mut blocker = if args.random {
            Blocker::random(rng.gen())
        } else {
            Blocker::Greedy
        };
        blocker_name = blocker.name();

        let record = play_single_game(game_number, config, &mut blocker, args.max_moves)?;
        tracing::info!(
            "Game {}: {} ({} moves, score {})",
            record.game_number,
            record.status,
            record.moves,
            record.score
        );
        games.push(record);
    }

    Ok(compute_statistics(blocker_name, games))
}

fn report_results(results: &SimulationResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(
    game_number: usize,
    config: GameConfig,
    blocker: &mut Blocker,
    max_moves: u32,
) -> Result<GameRecord> {
    let state = GameState::new(format!("sim-{}", game_number), config.board_size, config.difficulty)?;
    let (final_state, _history) = blocker.play_game(state, max_moves);

    Ok(GameRecord {
        game_number,
        status: final_state.status(),
        moves: final_state.move_count(),
        score: final_state.score(),
    })
}

fn compute_statistics(blocker: &'static str, games: Vec<GameRecord>) -> SimulationResults {
    let count = |status| games.iter().filter(|g| g.status == status).count();
    let player_wins = count(GameStatus::PlayerWon);
    let cat_escapes = count(GameStatus::PlayerLost);
    let unfinished = count(GameStatus::InProgress);

    let total = games.len();
    let average = |sum: u64| if total == 0 { 0.0 } else { sum as f32 / total as f32 };
    let score_sum: u64 = games.iter().map(|g| u64::from(g.score)).sum();
    let move_sum: u64 = games.iter().map(|g| u64::from(g.moves)).sum();

    SimulationResults {
        blocker,
        total_games: total,
        player_wins,
        cat_escapes,
        unfinished,
        win_rate: average(player_wins as u64),
        avg_score: average(score_sum),
        avg_moves: average(move_sum),
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn print_text_results(results: &SimulationResults) {
    println!("\n=== Simulation Results ({} blocker) ===", results.blocker);
    println!("Total games:  {}", results.total_games);
    println!(
        "Player wins:  {} ({:.1}%)",
        results.player_wins,
        results.win_rate * 100.0
    );
    println!("Cat escapes:  {}", results.cat_escapes);
    if results.unfinished > 0 {
        println!("Unfinished:   {}", results.unfinished);
    }
    println!("Avg score:    {:.1}", results.avg_score);
    println!("Avg moves:    {:.1}", results.avg_moves);
}

// ============================================================================
// TESTS
// ============================================================================

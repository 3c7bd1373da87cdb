//! Play command - interactive terminal game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_session(), report_result()
//! - Level 3: handle_command()
//! - Level 4: parse_command(), render_board()

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use hexcat_core::{Difficulty, GameConfig, GameEngine, GameState, GameStatus, Hex};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board radius
    #[arg(long, default_value = "11")]
    pub board_size: i32,

    /// easy, normal or hard (hard uses the A* cat)
    #[arg(long, default_value = "normal")]
    pub difficulty: Difficulty,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Block(Hex),
    Hint,
    Help,
    Quit,
}

const HELP: &str = "Enter `q r` to block a cell, `hint` for a suggestion, `quit` to leave.";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Start a game in an in-memory engine
/// 2. Read moves from stdin until the game ends
/// 3. Report the outcome
pub fn run(args: PlayArgs) -> Result<()> {
    let engine = GameEngine::in_memory();
    let state = engine
        .start_new_game(GameConfig::new(args.board_size, args.difficulty))
        .context("Failed to start game")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let final_state = play_session(&engine, state.game_id(), stdin.lock(), &mut stdout)?;

    report_result(&final_state, &mut stdout)?;
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Drive one game from `input` until it ends, input runs out, or the player quits
fn play_session<R: BufRead, W: Write>(
    engine: &GameEngine,
    game_id: &str,
    input: R,
    out: &mut W,
) -> Result<GameState> {
    let state = load(engine, game_id)?;
    writeln!(out, "{}", render_board(&state))?;
    writeln!(out, "{}", HELP)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let Some(command) = parse_command(&line) else {
            writeln!(out, "Unrecognized input: {:?}. {}", line.trim(), HELP)?;
            continue;
        };
        if command == Command::Quit {
            break;
        }
        if handle_command(engine, game_id, command, out)? {
            break;
        }
    }

    load(engine, game_id)
}

fn report_result<W: Write>(state: &GameState, out: &mut W) -> Result<()> {
    let verdict = match state.status() {
        GameStatus::PlayerWon => "You trapped the cat!",
        GameStatus::PlayerLost => "The cat escaped.",
        GameStatus::InProgress => "Game abandoned.",
    };
    writeln!(out, "\n=== {} ===", verdict)?;
    writeln!(out, "Moves: {}", state.move_count())?;
    writeln!(out, "Score: {}", state.score())?;
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Apply one command. Returns true once the game is over.
fn handle_command<W: Write>(
    engine: &GameEngine,
    game_id: &str,
    command: Command,
    out: &mut W,
) -> Result<bool> {
    match command {
        Command::Help | Command::Quit => {
            writeln!(out, "{}", HELP)?;
            Ok(false)
        }
        Command::Hint => {
            match engine.intelligent_suggestion(game_id)? {
                Some(cell) => writeln!(out, "Try blocking {} {}", cell.q, cell.r)?,
                None => writeln!(out, "No suggestion available")?,
            }
            Ok(false)
        }
        Command::Block(cell) => {
            let outcome = engine
                .execute_player_move(game_id, cell)?
                .with_context(|| format!("Game {} disappeared", game_id))?;

            if !outcome.accepted {
                writeln!(out, "Cannot block {}", cell)?;
                return Ok(false);
            }
            if let Some(record) = outcome.record {
                if record.cat_from != record.cat_to {
                    writeln!(out, "Cat moved {} -> {}", record.cat_from, record.cat_to)?;
                }
            }
            writeln!(out, "{}", render_board(&outcome.state))?;
            Ok(outcome.state.is_finished())
        }
    }
}

fn load(engine: &GameEngine, game_id: &str) -> Result<GameState> {
    engine
        .game_state(game_id)?
        .with_context(|| format!("Game {} not found", game_id))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["hint" | "h"] => Some(Command::Hint),
        ["help" | "?"] => Some(Command::Help),
        ["quit" | "exit"] => Some(Command::Quit),
        [q, r] => Some(Command::Block(Hex::checked(q.parse().ok()?, r.parse().ok()?).ok()?)),
        _ => None,
    }
}

/// Rows of the hexagon, one per `r`, indented so neighbors line up.
/// `C` is the cat, `#` a blocked cell, `o` a free border cell.
fn render_board(state: &GameState) -> String {
    let board = state.board();
    let n = board.radius();
    let mut rows = Vec::new();

    for r in -n..=n {
        let mut row = " ".repeat(r.unsigned_abs() as usize);
        for q in -n..=n {
            let pos = Hex::new(q, r);
            if !board.in_bounds(pos) {
                continue;
            }
            let symbol = if pos == state.cat_position() {
                'C'
            } else if board.is_blocked(pos) {
                '#'
            } else if board.is_border(pos) {
                'o'
            } else {
                '.'
            };
            row.push(symbol);
            row.push(' ');
        }
        rows.push(row.trim_end().to_string());
    }

    rows.join("\n")
}

// ============================================================================
// TESTS
// ============================================================================

//! Command line arguments and the fixed game constants.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Maximum number of segments the snake can ever have.
pub const SNAKE_MAX_SIZE: usize = 25;
pub const SNAKE_INITIAL_SIZE: usize = 5;

/// Ticks between a goodie being eaten and the next one showing up.
pub const GOODIE_SPAWN_TICKS: u32 = 25;
/// Random cells tried per tick before a spawn is postponed to the next tick.
pub const MAX_SPAWN_ATTEMPTS: usize = 16;

pub const SNAKE_GLYPH: char = '█';
pub const GOODIE_GLYPH: char = 'O';
pub const DEAD_GLYPH: char = 'X';
pub const EMPTY_GLYPH: char = ' ';

const TICK_MS: u64 = 100;
const INPUT_POLL_MS: u64 = 50;

/// What happens when the head runs into the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionPolicy {
    /// The game is over.
    End,
    /// The head crawls over the body as if it wasn't there.
    PassThrough,
}

#[derive(Parser, Debug)]
#[command(name = "term-snake", about = "A snake that wraps around your terminal")]
pub struct Args {
    /// Milliseconds between two moves of the snake
    #[arg(long, default_value_t = TICK_MS, value_parser = clap::value_parser!(u64).range(20..=1000))]
    pub tick_ms: u64,

    /// Behaviour on self-collision
    #[arg(long, value_enum, default_value_t = CollisionPolicy::End)]
    pub collision: CollisionPolicy,

    /// Write logs to this file. Nothing is logged otherwise, the terminal belongs to the game.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub tick: Duration,
    pub collision: CollisionPolicy,
    /// Pause after each handled key. One tick, so at most one turn lands per move.
    pub input_cooldown: Duration,
    /// How long the input thread waits for a key before rechecking the exit flag.
    pub input_poll: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tick: Duration::from_millis(TICK_MS),
            collision: CollisionPolicy::End,
            input_cooldown: Duration::from_millis(TICK_MS),
            input_poll: Duration::from_millis(INPUT_POLL_MS),
        }
    }
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Settings {
            tick: Duration::from_millis(args.tick_ms),
            collision: args.collision,
            input_cooldown: Duration::from_millis(args.tick_ms),
            ..Settings::default()
        }
    }
}

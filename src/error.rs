use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    /// A lock was poisoned by a panicking thread. Not recoverable.
    #[error("synchronization failure: {0}")]
    Synchronization(&'static str),

    #[error("could not spawn the input thread")]
    ThreadSpawn(#[source] io::Error),

    #[error("the input thread panicked")]
    ThreadJoin,

    #[error("snake is already at its maximum size of {capacity} segments")]
    SnakeFull { capacity: usize },

    #[error("snake length {len} does not fit a capacity of {capacity}")]
    InvalidLength { len: usize, capacity: usize },

    #[error("terminal error")]
    Terminal(#[from] io::Error),
}

pub mod config;
pub mod controls;
pub mod direction;
pub mod error;
pub mod game;
pub mod goodie;
pub mod snake;
pub mod term;

pub type TermInt = u16;
/// A cell on screen as (x, y), that is (column, row).
pub type Coords = (TermInt, TermInt);

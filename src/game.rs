use std::thread::sleep;

use crate::Coords;
use crate::config::{CollisionPolicy, Settings, DEAD_GLYPH, EMPTY_GLYPH, GOODIE_GLYPH, SNAKE_GLYPH};
use crate::controls::{join_input_thread, spawn_input_thread, Controls, KeySource, Snapshot};
use crate::direction::Direction;
use crate::error::Result;
use crate::goodie::Goodies;
use crate::snake::{SnakeBody, Step};
use crate::term::{CrosstermKeys, Display, TermManager};

use rand::Rng;
use tracing::{info, warn};

/// How a game ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Crashed { length: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickResult {
    Continue,
    Exit,
    Crashed,
}

pub struct SnakeGame<D: Display, R: Rng> {
    display: D,
    controls: Controls,
    snake: SnakeBody,
    goodies: Goodies,
    rng: R,
    settings: Settings,
}

impl<D: Display, R: Rng> SnakeGame<D, R> {
    /// Starts with the snake in the middle of the screen, heading whichever
    /// way `controls` currently points.
    pub fn new(display: D, controls: Controls, rng: R, settings: Settings) -> Result<Self> {
        let bounds = display.dimensions();
        let center = (bounds.0 / 2, bounds.1 / 2);
        let heading = controls.snapshot()?.direction;
        let snake = SnakeBody::new(center, heading, bounds)?;

        Self::with_snake(display, controls, snake, rng, settings)
    }

    pub fn with_snake(mut display: D, controls: Controls, snake: SnakeBody, rng: R, settings: Settings) -> Result<Self> {
        snake.paint(&mut display)?;
        display.refresh()?;

        Ok(SnakeGame { display, controls, snake, goodies: Goodies::new(), rng, settings })
    }

    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn goodies(&self) -> &Goodies {
        &self.goodies
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn place_goodie(&mut self, pos: Coords) -> Result<()> {
        self.goodies.place(&mut self.display, pos)?;
        Ok(())
    }

    /// Ticks until someone asks to exit or the snake crashes, sleeping
    /// between ticks.
    pub fn run(&mut self) -> Result<Outcome> {
        loop {
            match self.tick()? {
                TickResult::Continue => sleep(self.settings.tick),
                TickResult::Exit => return Ok(Outcome::Quit),
                TickResult::Crashed => return Ok(Outcome::Crashed { length: self.snake.len() }),
            }
        }
    }

    /// One step of the game, without the sleep.
    pub fn tick(&mut self) -> Result<TickResult> {
        let Snapshot { direction, should_exit } = self.controls.snapshot()?;
        if should_exit {
            return Ok(TickResult::Exit);
        }

        let bounds = self.display.dimensions();
        let new_head = direction.step(self.snake.head_coords(), bounds);

        match self.display.get_glyph(new_head) {
            SNAKE_GLYPH => match self.settings.collision {
                CollisionPolicy::End => {
                    info!(pos = ?new_head, length = self.snake.len(), "snake crashed into itself");
                    return Ok(TickResult::Crashed);
                }
                CollisionPolicy::PassThrough => self.crawl(new_head)?,
            },
            GOODIE_GLYPH => {
                self.goodies.consume();
                if self.snake.is_full() {
                    warn!(capacity = self.snake.capacity(), "snake can't grow any longer");
                    self.crawl(new_head)?;
                } else {
                    self.snake.advance(new_head, true)?;
                }
            }
            _ => self.crawl(new_head)?,
        }

        self.snake.paint(&mut self.display)?;
        self.goodies.tick(&mut self.display, &mut self.rng)?;
        self.display.refresh()?;

        Ok(TickResult::Continue)
    }

    /// Paints the whole snake as dead.
    pub fn paint_wreck(&mut self) -> Result<()> {
        self.snake.paint_with(&mut self.display, DEAD_GLYPH)?;
        self.display.refresh()?;
        Ok(())
    }

    fn crawl(&mut self, new_head: Coords) -> Result<()> {
        if let Step::Moved { vacated } = self.snake.advance(new_head, false)? {
            self.display.put_glyph(vacated, EMPTY_GLYPH)?;
        }
        Ok(())
    }
}

/// Runs a full game on `display`: starts the input thread reading from
/// `keys`, plays until quit or crash, then stops and joins the input thread.
pub fn run_session<D, K, R>(display: D, keys: K, rng: R, settings: &Settings) -> Result<Outcome>
where
    D: Display,
    K: KeySource + Send + 'static,
    R: Rng,
{
    // Set before the input thread exists, no one else can see it yet
    let controls = Controls::new(Direction::Left);
    let input = spawn_input_thread(controls.clone(), keys, settings)?;

    let outcome = SnakeGame::new(display, controls.clone(), rng, settings.clone()).and_then(|mut game| {
        let outcome = game.run()?;
        if let Outcome::Crashed { .. } = outcome {
            game.paint_wreck()?;
        }
        Ok(outcome)
    });

    // The input thread has to stop whatever happened to the game
    let stopped = controls.request_exit();
    let joined = join_input_thread(input);

    let outcome = outcome?;
    stopped?;
    joined?;
    Ok(outcome)
}

/// Plays one game on the real terminal.
pub fn play(term: &mut TermManager, settings: &Settings) -> Result<Outcome> {
    term.clear()?;

    let (max_x, max_y) = term.dimensions();
    info!(width = max_x + 1, height = max_y + 1, tick = ?settings.tick, "game started");

    let outcome = run_session(&mut *term, CrosstermKeys, rand::thread_rng(), settings)?;

    if let Outcome::Crashed { length } = outcome {
        term.show_message(&[
            "Game over!",
            &format!("Length: {}", length),
            "",
            "Press any key to quit",
        ])?;
        term.read_key_blocking()?;
    }

    Ok(outcome)
}

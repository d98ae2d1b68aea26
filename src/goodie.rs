use std::io;

use rand::Rng;
use tracing::debug;

use crate::config::{EMPTY_GLYPH, GOODIE_GLYPH, GOODIE_SPAWN_TICKS, MAX_SPAWN_ATTEMPTS};
use crate::term::Display;
use crate::Coords;

/// The single goodie on the board and the countdown to the next one.
#[derive(Debug)]
pub struct Goodies {
    on_screen: Option<Coords>,
    ticks_until_spawn: u32,
}

impl Goodies {
    pub(crate) fn new() -> Self {
        Goodies { on_screen: None, ticks_until_spawn: GOODIE_SPAWN_TICKS }
    }

    pub fn on_screen(&self) -> bool {
        self.on_screen.is_some()
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> Option<Coords> {
        self.on_screen
    }

    #[cfg(test)]
    pub(crate) fn ticks_until_spawn(&self) -> u32 {
        self.ticks_until_spawn
    }

    /// The snake ate it. The countdown for the next one starts on the next tick.
    pub fn consume(&mut self) {
        self.on_screen = None;
    }

    pub fn place<D: Display + ?Sized>(&mut self, display: &mut D, pos: Coords) -> io::Result<()> {
        display.put_glyph(pos, GOODIE_GLYPH)?;
        self.on_screen = Some(pos);
        self.ticks_until_spawn = GOODIE_SPAWN_TICKS;
        Ok(())
    }

    /// Counts down while there's no goodie, and drops a new one on a random
    /// empty cell when the countdown runs out. Returns where it landed.
    pub fn tick<D, R>(&mut self, display: &mut D, rng: &mut R) -> io::Result<Option<Coords>>
    where
        D: Display + ?Sized,
        R: Rng,
    {
        if self.on_screen() {
            return Ok(None);
        }
        if self.ticks_until_spawn > 0 {
            self.ticks_until_spawn -= 1;
            return Ok(None);
        }

        let (max_x, max_y) = display.dimensions();
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let pos = (rng.gen_range(0..=max_x), rng.gen_range(0..=max_y));
            if display.get_glyph(pos) == EMPTY_GLYPH {
                self.place(display, pos)?;
                debug!(?pos, "goodie spawned");
                return Ok(Some(pos));
            }
        }

        // Board is crowded, try again next tick
        Ok(None)
    }
}

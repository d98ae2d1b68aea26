use std::io;

use crate::config::{SNAKE_GLYPH, SNAKE_INITIAL_SIZE, SNAKE_MAX_SIZE};
use crate::direction::Direction;
use crate::error::{GameError, Result};
use crate::term::Display;
use crate::Coords;

/// What `SnakeBody::advance` did to the tail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// The tail moved forward and this cell is no longer part of the body.
    Moved { vacated: Coords },
    /// The snake grew; the old tail is still part of the body and must stay painted.
    Grew { kept_tail: Coords },
}

/// The snake's body as a ring buffer of segments. The occupied slots are
/// always the range `tail..=head`, wrapping at the end of the array, and
/// `size` is the length of that range.
pub struct SnakeBody<const CAP: usize = SNAKE_MAX_SIZE> {
    segments: [Coords; CAP],
    head: usize,
    tail: usize,
    size: usize,
}

impl<const CAP: usize> SnakeBody<CAP> {
    pub fn new(head: Coords, heading: Direction, bounds: Coords) -> Result<Self> {
        Self::with_len(head, heading, bounds, SNAKE_INITIAL_SIZE)
    }

    /// Lays out `len` segments in a straight line trailing behind `head`,
    /// so that moving towards `heading` doesn't run into the body.
    pub fn with_len(head: Coords, heading: Direction, bounds: Coords, len: usize) -> Result<Self> {
        if len == 0 || len > CAP {
            return Err(GameError::InvalidLength { len, capacity: CAP });
        }

        let mut segments = [head; CAP];
        let behind = heading.opposite();
        let mut pos = head;

        // Slot `len - 1` is the head, slot 0 the tail
        for slot in (0..len - 1).rev() {
            pos = behind.step(pos, bounds);
            segments[slot] = pos;
        }

        Ok(SnakeBody { segments, head: len - 1, tail: 0, size: len })
    }

    pub fn head_coords(&self) -> Coords {
        self.segments[self.head]
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        CAP
    }

    pub fn is_full(&self) -> bool {
        self.size == CAP
    }

    /// Segments from tail to head.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = Coords> + '_ {
        (0..self.size).map(move |i| self.segments[(self.tail + i) % CAP])
    }

    pub fn advance(&mut self, new_head: Coords, grow: bool) -> Result<Step> {
        if grow && self.is_full() {
            return Err(GameError::SnakeFull { capacity: CAP });
        }

        // Read the tail before writing: at full size the new head lands on its slot
        let old_tail = self.segments[self.tail];
        let next = wrap_inc::<CAP>(self.head);

        let step = if grow {
            self.size += 1;
            Step::Grew { kept_tail: old_tail }
        } else {
            self.tail = wrap_inc::<CAP>(self.tail);
            Step::Moved { vacated: old_tail }
        };

        self.segments[next] = new_head;
        self.head = next;

        debug_assert_eq!(self.span(), self.size);
        Ok(step)
    }

    /// Draws every occupied segment. The occupied range is painted as one
    /// slice, or as two when it wraps past the end of the array.
    pub fn paint<D: Display + ?Sized>(&self, display: &mut D) -> io::Result<()> {
        self.paint_with(display, SNAKE_GLYPH)
    }

    pub fn paint_with<D: Display + ?Sized>(&self, display: &mut D, glyph: char) -> io::Result<()> {
        if self.head >= self.tail {
            paint_slice(display, &self.segments[self.tail..=self.head], glyph)
        } else {
            paint_slice(display, &self.segments[..=self.head], glyph)?;
            paint_slice(display, &self.segments[self.tail..], glyph)
        }
    }

    fn span(&self) -> usize {
        (self.head + CAP - self.tail) % CAP + 1
    }
}

fn wrap_inc<const CAP: usize>(i: usize) -> usize {
    if i + 1 == CAP { 0 } else { i + 1 }
}

fn paint_slice<D: Display + ?Sized>(display: &mut D, cells: &[Coords], glyph: char) -> io::Result<()> {
    for pos in cells {
        display.put_glyph(*pos, glyph)?;
    }
    Ok(())
}

use crate::config::EMPTY_GLYPH;
use crate::controls::{Key, KeySource};
use crate::error::Result;
use crate::{Coords, TermInt};
use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll, read};

/// A grid of character cells the game draws on.
pub trait Display {
    fn put_glyph(&mut self, pos: Coords, glyph: char) -> io::Result<()>;

    fn get_glyph(&self, pos: Coords) -> char;

    /// Largest valid (x, y).
    fn dimensions(&self) -> Coords;

    fn refresh(&mut self) -> io::Result<()>;
}

impl<T: Display + ?Sized> Display for &mut T {
    fn put_glyph(&mut self, pos: Coords, glyph: char) -> io::Result<()> {
        (**self).put_glyph(pos, glyph)
    }

    fn get_glyph(&self, pos: Coords) -> char {
        (**self).get_glyph(pos)
    }

    fn dimensions(&self) -> Coords {
        (**self).dimensions()
    }

    fn refresh(&mut self) -> io::Result<()> {
        (**self).refresh()
    }
}

/// What's currently on screen, cell by cell. Lets the game read back
/// glyphs without asking the terminal.
pub struct ScreenBuffer {
    width: TermInt,
    height: TermInt,
    cells: Vec<char>,
}

impl ScreenBuffer {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        let cells = vec![EMPTY_GLYPH; width as usize * height as usize];
        ScreenBuffer { width, height, cells }
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = EMPTY_GLYPH);
    }

    fn index(&self, pos: Coords) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }
}

impl Display for ScreenBuffer {
    fn put_glyph(&mut self, pos: Coords, glyph: char) -> io::Result<()> {
        let i = self.index(pos);
        self.cells[i] = glyph;
        Ok(())
    }

    fn get_glyph(&self, pos: Coords) -> char {
        self.cells[self.index(pos)]
    }

    fn dimensions(&self) -> Coords {
        (self.width - 1, self.height - 1)
    }

    fn refresh(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The real terminal, drawn through crossterm. Every glyph is also recorded
/// in a `ScreenBuffer` so it can be read back.
pub struct TermManager {
    stdout: Stdout,
    screen: ScreenBuffer,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        if width == 0 || height == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "terminal has no cells to draw on"));
        }

        Ok(TermManager { stdout: stdout(), screen: ScreenBuffer::new(width, height) })
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen.clear();
        Ok(())
    }

    /// Blocks until a key is pressed.
    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }

    /// Draws a centered box of text on top of the game. The message isn't
    /// recorded in the screen buffer.
    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        let (width, height) = (self.screen.width, self.screen.height);

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let top_left = (
            (width / 2).saturating_sub(msg_width / 2),
            (height / 2).saturating_sub(msg_height / 2),
        );

        // Blank top and bottom rows
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), EMPTY_GLYPH)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.stdout.flush()
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}

impl Display for TermManager {
    fn put_glyph(&mut self, pos: Coords, glyph: char) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(glyph))?;
        self.screen.put_glyph(pos, glyph)
    }

    fn get_glyph(&self, pos: Coords) -> char {
        self.screen.get_glyph(pos)
    }

    fn dimensions(&self) -> Coords {
        self.screen.dimensions()
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// A screen that has to be switched into game mode and back.
pub trait Session {
    fn setup(&mut self) -> io::Result<()>;

    fn restore(&mut self) -> io::Result<()>;
}

impl Session for TermManager {
    fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }
}

/// Runs `body` between `setup` and `restore`. The screen is restored even if
/// setup fails halfway through, and an error from `body` is reported ahead of
/// one from `restore`.
pub fn with_session<S, T, F>(session: &mut S, body: F) -> Result<T>
where
    S: Session,
    F: FnOnce(&mut S) -> Result<T>,
{
    if let Err(err) = session.setup() {
        let _ = session.restore();
        return Err(err.into());
    }

    let res = body(session);
    let restored = session.restore();

    let value = res?;
    restored?;
    Ok(value)
}

/// Keyboard input straight from crossterm's event queue.
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !poll(timeout)? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) if ev.kind == KeyEventKind::Press => Ok(Some(key_from_event(&ev))),
            _ => Ok(None),
        }
    }
}

pub fn key_from_event(ev: &KeyEvent) -> Key {
    match ev.code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Char('q') => Key::Quit,
        // Raw mode turns CTRL+C into a plain key press
        KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Quit,
        _ => Key::Other,
    }
}

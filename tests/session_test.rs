use std::collections::VecDeque;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};
use term_snake::config::{Settings, SNAKE_GLYPH};
use term_snake::controls::{Key, KeySource};
use term_snake::error::GameError;
use term_snake::game::{run_session, Outcome};
use term_snake::term::{Display, ScreenBuffer};

/// Hands out one key per call after `delay` has passed, then nothing.
struct DelayedKeys {
    keys: VecDeque<Key>,
    delay: Duration,
}

impl KeySource for DelayedKeys {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        thread::sleep(self.delay.min(timeout));
        Ok(self.keys.pop_front())
    }
}

fn quick_settings() -> Settings {
    Settings {
        tick: Duration::from_millis(5),
        input_cooldown: Duration::from_millis(1),
        input_poll: Duration::from_millis(10),
        ..Settings::default()
    }
}

#[test]
fn quit_key_ends_the_session() {
    let mut screen = ScreenBuffer::new(20, 20);
    let keys = DelayedKeys { keys: vec![Key::Other, Key::Up, Key::Quit].into(), delay: Duration::from_millis(10) };

    let started = Instant::now();
    let outcome = run_session(&mut screen, keys, StdRng::seed_from_u64(5), &quick_settings()).unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert!(started.elapsed() < Duration::from_secs(5));

    // Still a whole snake on screen
    let (max_x, max_y) = screen.dimensions();
    let segments = (0..=max_y)
        .flat_map(|y| (0..=max_x).map(move |x| (x, y)))
        .filter(|pos| screen.get_glyph(*pos) == SNAKE_GLYPH)
        .count();
    assert_eq!(segments, 5);
}

#[test]
fn snake_keeps_moving_between_key_presses() {
    let mut screen = ScreenBuffer::new(30, 10);
    let keys = DelayedKeys { keys: vec![Key::Other, Key::Other, Key::Quit].into(), delay: Duration::from_millis(20) };

    let outcome = run_session(&mut screen, keys, StdRng::seed_from_u64(9), &quick_settings()).unwrap();
    assert_eq!(outcome, Outcome::Quit);

    // Started at (14, 4) heading left with its body trailing to the right.
    // After ~60ms of 5ms ticks the old tail cell must have been vacated.
    assert_ne!(screen.get_glyph((18, 4)), SNAKE_GLYPH);
}

#[test]
fn broken_keyboard_ends_the_session_with_an_error() {
    struct BrokenKeys;

    impl KeySource for BrokenKeys {
        fn next_key(&mut self, _timeout: Duration) -> io::Result<Option<Key>> {
            Err(io::Error::new(io::ErrorKind::Other, "keyboard gone"))
        }
    }

    let mut screen = ScreenBuffer::new(20, 20);
    let started = Instant::now();
    let res = run_session(&mut screen, BrokenKeys, StdRng::seed_from_u64(2), &quick_settings());

    assert!(matches!(res, Err(GameError::Terminal(_))));
    assert!(started.elapsed() < Duration::from_secs(5));
}

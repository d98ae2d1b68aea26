//! The direction shared between the input thread and the game loop.
//!
//! `Controls` is the only state touched by both threads. Every read and
//! write happens inside its lock, and nothing blocks while the lock is held.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::Settings;
use crate::direction::Direction;
use crate::error::{GameError, Result};

/// A key press, as far as the game cares.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Quit,
    Other,
}

impl Key {
    /// The direction this key asks for, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Quit | Key::Other => None,
        }
    }
}

pub trait KeySource {
    /// Waits up to `timeout` for a key press.
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

/// What the game loop sees at the start of a tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub direction: Direction,
    pub should_exit: bool,
}

#[derive(Debug)]
struct Steering {
    direction: Direction,
    /// The direction the game loop last picked up, i.e. where the snake is moving.
    moving: Direction,
    should_exit: bool,
}

#[derive(Debug, Clone)]
pub struct Controls {
    inner: Arc<Mutex<Steering>>,
}

impl Controls {
    pub fn new(initial: Direction) -> Self {
        Controls { inner: Arc::new(Mutex::new(Steering { direction: initial, moving: initial, should_exit: false })) }
    }

    /// Called by the game loop once per tick. The returned direction is the
    /// one the snake moves in until the next snapshot.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let mut state = self.lock()?;
        state.moving = state.direction;
        Ok(Snapshot { direction: state.direction, should_exit: state.should_exit })
    }

    /// Commits `proposed` unless it would turn the snake straight back onto
    /// itself, either against the committed direction or against the one the
    /// snake is still moving in. Returns whether the direction was taken.
    pub fn propose(&self, proposed: Direction) -> Result<bool> {
        let mut state = self.lock()?;
        if proposed == state.direction.opposite() || proposed == state.moving.opposite() {
            return Ok(false);
        }
        state.direction = proposed;
        Ok(true)
    }

    pub fn request_exit(&self) -> Result<()> {
        self.lock()?.should_exit = true;
        Ok(())
    }

    pub fn should_exit(&self) -> Result<bool> {
        Ok(self.lock()?.should_exit)
    }

    /// Applies a key press. Returns whether it changed anything.
    pub fn apply(&self, key: Key) -> Result<bool> {
        match key {
            Key::Quit => self.request_exit().map(|_| true),
            other => match other.direction() {
                Some(dir) => self.propose(dir),
                None => Ok(false),
            },
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Steering>> {
        self.inner.lock().map_err(|_| GameError::Synchronization("steering lock poisoned"))
    }
}

/// Starts the thread that turns key presses into direction changes. It
/// returns once an exit has been requested, by a quit key or by anyone
/// else holding the same `Controls`. If reading keys fails, the thread asks
/// the game to exit too and hands the error to whoever joins it.
pub fn spawn_input_thread<K>(controls: Controls, mut keys: K, settings: &Settings) -> Result<JoinHandle<Result<()>>>
where
    K: KeySource + Send + 'static,
{
    let poll = settings.input_poll;
    let cooldown = settings.input_cooldown;

    thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            let res = read_keys(&controls, &mut keys, poll, cooldown);
            if let Err(err) = &res {
                error!(%err, "input thread failed");
            }
            // Without this thread nobody can quit, so the game stops with it
            let _ = controls.request_exit();
            res
        })
        .map_err(GameError::ThreadSpawn)
}

fn read_keys<K: KeySource>(controls: &Controls, keys: &mut K, poll: Duration, cooldown: Duration) -> Result<()> {
    while !controls.should_exit()? {
        let key = match keys.next_key(poll)? {
            Some(key) => key,
            None => continue,
        };

        if controls.apply(key)? {
            debug!(?key, "input applied");
        }
        if key == Key::Quit {
            info!("quit requested");
            break;
        }

        thread::sleep(cooldown);
    }
    Ok(())
}

pub fn join_input_thread(handle: JoinHandle<Result<()>>) -> Result<()> {
    handle.join().map_err(|_| GameError::ThreadJoin)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction::*;
    use std::collections::VecDeque;

    struct ScriptedKeys(VecDeque<Key>);

    impl KeySource for ScriptedKeys {
        fn next_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
            match self.0.pop_front() {
                Some(key) => Ok(Some(key)),
                None => {
                    thread::sleep(timeout);
                    Ok(None)
                }
            }
        }
    }

    fn quick_settings() -> Settings {
        Settings {
            input_cooldown: Duration::from_millis(1),
            input_poll: Duration::from_millis(5),
            ..Settings::default()
        }
    }

    #[test]
    fn rejects_reversals() {
        let controls = Controls::new(Left);

        assert!(!controls.propose(Right).unwrap());
        assert_eq!(controls.snapshot().unwrap().direction, Left);

        assert!(controls.propose(Up).unwrap());
        assert!(!controls.propose(Down).unwrap());
        assert_eq!(controls.snapshot().unwrap().direction, Up);
    }

    #[test]
    fn follows_the_latest_valid_proposal() {
        let controls = Controls::new(Left);

        for dir in [Up, Right, Down, Left, Left, Down, Right, Up] {
            assert!(controls.propose(dir).unwrap());
            assert_eq!(controls.snapshot().unwrap().direction, dir);
        }
    }

    #[test]
    fn other_keys_change_nothing() {
        let controls = Controls::new(Down);

        assert!(!controls.apply(Key::Other).unwrap());
        assert_eq!(controls.snapshot().unwrap(), Snapshot { direction: Down, should_exit: false });
    }

    #[test]
    fn quit_key_sets_exit_flag() {
        let controls = Controls::new(Left);

        assert!(controls.apply(Key::Quit).unwrap());
        assert!(controls.snapshot().unwrap().should_exit);
    }

    #[test]
    fn input_thread_steers_then_quits() {
        let controls = Controls::new(Left);
        let keys = ScriptedKeys(vec![Key::Right, Key::Up, Key::Other, Key::Quit].into());

        let handle = spawn_input_thread(controls.clone(), keys, &quick_settings()).unwrap();
        join_input_thread(handle).unwrap();

        // Right was a reversal and got dropped
        assert_eq!(controls.snapshot().unwrap(), Snapshot { direction: Up, should_exit: true });
    }

    #[test]
    fn input_thread_stops_without_a_key_press() {
        let controls = Controls::new(Left);
        let handle = spawn_input_thread(controls.clone(), ScriptedKeys(VecDeque::new()), &quick_settings()).unwrap();

        controls.request_exit().unwrap();
        join_input_thread(handle).unwrap();
    }

    #[test]
    fn cant_double_back_before_the_snake_moves() {
        let controls = Controls::new(Left);
        controls.snapshot().unwrap();

        // Up then Right within one tick would send the head into the neck
        assert!(controls.propose(Up).unwrap());
        assert!(!controls.propose(Right).unwrap());
        assert_eq!(controls.snapshot().unwrap().direction, Up);

        // Once the snake has moved up, turning right is fine
        assert!(controls.propose(Right).unwrap());
        assert_eq!(controls.snapshot().unwrap().direction, Right);
    }

    #[test]
    fn failing_key_source_stops_the_game() {
        struct BrokenKeys;

        impl KeySource for BrokenKeys {
            fn next_key(&mut self, _timeout: Duration) -> io::Result<Option<Key>> {
                Err(io::Error::new(io::ErrorKind::Other, "keyboard gone"))
            }
        }

        let controls = Controls::new(Left);
        let handle = spawn_input_thread(controls.clone(), BrokenKeys, &quick_settings()).unwrap();

        assert!(matches!(join_input_thread(handle), Err(GameError::Terminal(_))));
        assert!(controls.snapshot().unwrap().should_exit);
    }

    #[test]
    fn poisoned_lock_is_a_sync_failure() {
        let controls = Controls::new(Left);
        let poisoner = controls.clone();

        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(controls.snapshot(), Err(GameError::Synchronization(_))));
    }
}

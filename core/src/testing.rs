//! Deterministic stand-ins for the host, shared by the unit tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::constants::KEY_COUNT;
use crate::peripherals::Peripherals;
use crate::timer::Clock;

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone)]
pub struct FakeClock {
    now: Rc<Cell<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        FakeClock {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Keys are held or not as the test says; `get_key` answers come from a queue.
#[derive(Default)]
pub struct ScriptedPeripherals {
    pub held: [bool; KEY_COUNT],
    pub key_queue: VecDeque<u8>,
    pub keys_queried: Vec<u8>,
    pub sounds_played: usize,
}

impl Peripherals for ScriptedPeripherals {
    fn key_pressed(&mut self, key: u8) -> bool {
        self.keys_queried.push(key);
        self.held[key as usize]
    }

    fn get_key(&mut self) -> u8 {
        self.key_queue
            .pop_front()
            .expect("get_key called with nothing scripted")
    }

    fn play_sound(&mut self) {
        self.sounds_played += 1;
    }
}

use std::time::{Duration, Instant};

use log::{debug, warn};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use c8_core::constants::KEY_COUNT;
use c8_core::Peripherals;

use crate::keymap::keymap;

/// Pitch of the beep
const TONE_HZ: f32 = 416.0;
/// How long a single `play_sound` lasts; about one timer period
const TONE_LENGTH: Duration = Duration::from_millis(17);
/// How long `get_key` waits on the event queue before checking on the beeper
const KEY_WAIT_MS: u32 = 10;

struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # SDL Peripherals
/// The keypad and speaker backed by an SDL2 event pump and audio device.
///
/// Key state is only as fresh as the last `pump`, which the host calls once
/// per frame.
pub struct SdlPeripherals {
    events: EventPump,
    keys: [bool; KEY_COUNT],
    beeper: Option<AudioDevice<SquareWave>>,
    silence_at: Option<Instant>,
    quit: bool,
}

impl SdlPeripherals {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let events = sdl.event_pump()?;
        // a machine without sound is still playable
        let beeper = match open_beeper(sdl) {
            Ok(device) => Some(device),
            Err(e) => {
                warn!("audio unavailable, running silent: {}", e);
                None
            }
        };

        Ok(SdlPeripherals {
            events,
            keys: [false; KEY_COUNT],
            beeper,
            silence_at: None,
            quit: false,
        })
    }

    /// Drains pending events.
    /// Returns false once the user has asked to quit.
    pub fn pump(&mut self) -> bool {
        let events: Vec<Event> = self.events.poll_iter().collect();
        for event in events {
            self.handle(event);
        }
        self.silence_if_due();
        !self.quit
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => self.quit = true,
            Event::KeyDown {
                keycode: Some(key), ..
            } => {
                if let Some(code) = keypad_code(key) {
                    self.keys[code as usize] = true;
                }
            }
            Event::KeyUp {
                keycode: Some(key), ..
            } => {
                if let Some(code) = keymap(key) {
                    self.keys[code as usize] = false;
                }
            }
            _ => {}
        }
    }

    fn silence_if_due(&mut self) {
        if let (Some(at), Some(beeper)) = (self.silence_at, &self.beeper) {
            if Instant::now() >= at {
                beeper.pause();
                self.silence_at = None;
            }
        }
    }

    /// Blocks until the next event, keeping the beeper in check meanwhile
    fn next_event(&mut self) -> Event {
        loop {
            self.silence_if_due();
            if let Some(event) = self.events.wait_event_timeout(KEY_WAIT_MS) {
                return event;
            }
        }
    }
}

impl Peripherals for SdlPeripherals {
    fn key_pressed(&mut self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// Waits for a mapped key to go down and then back up.
    /// If the window is closed meanwhile, gives up and answers key 0.
    fn get_key(&mut self) -> u8 {
        let (pressed, code) = loop {
            if self.quit {
                return 0;
            }
            match self.next_event() {
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } if key != Keycode::Escape => {
                    if let Some(code) = keypad_code(key) {
                        self.keys[code as usize] = true;
                        break (key, code);
                    }
                }
                event => self.handle(event),
            }
        };

        loop {
            if self.quit {
                return code;
            }
            match self.next_event() {
                Event::KeyUp {
                    keycode: Some(key), ..
                } if key == pressed => {
                    self.keys[code as usize] = false;
                    debug!("read key {:X}", code);
                    return code;
                }
                event => self.handle(event),
            }
        }
    }

    fn play_sound(&mut self) {
        if let Some(beeper) = &self.beeper {
            beeper.resume();
            self.silence_at = Some(Instant::now() + TONE_LENGTH);
        }
    }
}

fn open_beeper(sdl: &sdl2::Sdl) -> Result<AudioDevice<SquareWave>, String> {
    let audio = sdl.audio()?;
    let desired = AudioSpecDesired {
        freq: Some(44_100),
        channels: Some(1),
        samples: None,
    };
    audio.open_playback(None, &desired, |spec| SquareWave {
        phase_inc: TONE_HZ / spec.freq as f32,
        phase: 0.0,
        volume: 0.25,
    })
}

/// The keypad code for `key`, warning about keys the keypad doesn't have
fn keypad_code(key: Keycode) -> Option<u8> {
    let code = keymap(key);
    if code.is_none() {
        warn!("ignoring unmapped key {:?}", key);
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_code_passes_mapped_keys_through() {
        assert_eq!(keypad_code(Keycode::Num1), Some(0x1));
        assert_eq!(keypad_code(Keycode::V), Some(0xF));
    }

    #[test]
    fn test_keypad_code_drops_unmapped_keys() {
        assert_eq!(keypad_code(Keycode::P), None);
        assert_eq!(keypad_code(Keycode::Space), None);
    }
}

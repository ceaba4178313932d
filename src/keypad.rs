use std::sync::{Condvar, Mutex};

use crate::error::Error;

struct KeypadState {
    down: [bool; 16],
    /// Edge-triggered press signal, consumed exactly once by a waiting Fx0A
    pressed: Option<u8>,
    shutdown: bool,
}

/// The 16-key Chip-8 keypad
///
/// The producer side (the host's event loop) pushes key-down state and press
/// notifications; the engine queries key state synchronously and blocks on
/// [`Keypad::wait_key`] for the Fx0A instruction. `shutdown` is the
/// cancellation path for that wait so a closing host doesn't leak the engine
/// thread.
pub struct Keypad {
    state: Mutex<KeypadState>,
    press_signal: Condvar,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            state: Mutex::new(KeypadState {
                down: [false; 16],
                pressed: None,
                shutdown: false,
            }),
            press_signal: Condvar::new(),
        }
    }

    /// Whether key 0x0..0xF is currently held down
    pub fn is_key_down(&self, key: u8) -> bool {
        self.state.lock().unwrap().down[usize::from(key & 0xF)]
    }

    pub fn set_key_down(&self, key: u8, down: bool) {
        self.state.lock().unwrap().down[usize::from(key & 0xF)] = down;
    }

    /// Signal that a key was just pressed, unblocking a pending Fx0A wait
    pub fn notify_key_pressed(&self, key: u8) {
        let mut state = self.state.lock().unwrap();
        state.pressed = Some(key & 0xF);
        self.press_signal.notify_all();
    }

    /// Cancel any pending and all future key waits
    pub fn shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        state.shutdown = true;
        self.press_signal.notify_all();
    }

    /// Block until the next key press and return the pressed key
    ///
    /// Presses signalled before the wait started are discarded; only a press
    /// arriving while the engine is actually waiting satisfies Fx0A. Returns
    /// `Error::Interrupted` once the keypad has been shut down.
    pub fn wait_key(&self) -> Result<u8, Error> {
        let mut state = self.state.lock().unwrap();
        state.pressed = None;
        loop {
            if state.shutdown {
                return Err(Error::Interrupted);
            }
            if let Some(key) = state.pressed.take() {
                return Ok(key);
            }
            state = self.press_signal.wait(state).unwrap();
        }
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::HashSet;
use std::sync::Mutex;

/// The set of currently lit cells on the 64x32 logical grid
///
/// Sprites are drawn by XOR: a set sprite bit toggles the cell it lands on,
/// and turning a lit cell back off reports a collision. Cells are never
/// wrapped; a sprite drawn partially off the grid keeps its off-grid cells in
/// the model and whatever renders the display is expected to clip them.
///
/// Shared between the engine thread (draws) and the presentation thread
/// (reads), so the cell set lives behind a mutex. The mutex is only ever held
/// for the duration of a single draw, clear, or snapshot; in particular it is
/// never held across the Fx0A key wait.
pub struct Display {
    lit: Mutex<HashSet<(u16, u16)>>,
}

impl Display {
    pub fn new() -> Self {
        Display {
            lit: Mutex::new(HashSet::new()),
        }
    }

    /// XOR a sprite onto the grid with its top-left corner at (x, y)
    ///
    /// Walks each sprite byte top to bottom and each bit high to low (bit 7
    /// is the leftmost column). Returns true if any lit cell was toggled off.
    pub fn draw(&self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut lit = self.lit.lock().unwrap();
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if byte >> (7 - bit) & 1 == 1 {
                    let cell = (u16::from(x) + bit, u16::from(y) + row as u16);
                    if !lit.insert(cell) {
                        lit.remove(&cell);
                        collision = true;
                    }
                }
            }
        }

        collision
    }

    pub fn clear(&self) {
        self.lit.lock().unwrap().clear();
    }

    /// Snapshot of the lit cells for one render pass
    pub fn cells(&self) -> Vec<(u16, u16)> {
        self.lit.lock().unwrap().iter().copied().collect()
    }

    pub fn is_lit(&self, x: u16, y: u16) -> bool {
        self.lit.lock().unwrap().contains(&(x, y))
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

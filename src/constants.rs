/// The nominal clock speed is 500Hz; this is the time between clocks in ns
pub const CLOCK_SPEED: u64 = 2_000_000;

/// Timers decrement at 50Hz, approximated as once every 10 clocks
pub const CLOCKS_PER_TIMER_TICK: u8 = 10;

/// Total addressable memory
pub const MEMORY_SIZE: usize = 0x1000;

/// Programs are loaded into memory starting at 0x200
pub const PROGRAM_START: u16 = 0x200;

/// Each font glyph is 5 bytes tall
pub const GLYPH_SIZE: u16 = 5;

/// The visible grid dimensions, for whatever renders the display
///
/// The engine itself never clips: [`crate::Display`] keeps off-grid cells in
/// its model and the renderer is expected to discard anything outside
/// `DISPLAY_WIDTH` x `DISPLAY_HEIGHT`.
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites for the hex digits 0..F
///
/// Each glyph is 8x5 pixels with only the high nibble of each row used.
/// The sheet is copied to the beginning of memory so that Fx29 can compute
/// a glyph's address as digit * 5.
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

//! HD44780 instruction set (Hitachi HD44780U datasheet, table 6), RS = 0, R/W = 0.
//!
//! Each instruction is identified by its highest set bit; the bits below it are flags.

/// Clears the entire display and returns home. Also sets the entry mode to increment.
pub const CLEAR_DISPLAY: u8 = 0b00000001;
/// Sets DDRAM address 0 in the address counter and undoes any display shift.
pub const RETURN_HOME: u8 = 0b00000010;
/// Sets cursor move direction and display shift, `000001IS`.
pub const ENTRY_MODE_SET: u8 = 0b00000100;
/// Sets display, cursor and blink controls, `00001DCB`.
pub const CONTROL_SET: u8 = 0b00001000;
/// Moves the cursor or shifts the display without touching DDRAM, `0001SR??`.
pub const SHIFT_SET: u8 = 0b00010000;
/// Sets interface data length, line count and font, `001DNF??`.
pub const FUNCTION_SET: u8 = 0b00100000;
/// Sets the CGRAM address, `01AAAAAA`.
pub const SET_CGRAM_ADDR: u8 = 0b01000000;
pub const SET_CGRAM_MASK: u8 = 0b00111111;
/// Sets the DDRAM address, `1AAAAAAA`.
pub const SET_DDRAM_ADDR: u8 = 0b10000000;
pub const SET_DDRAM_MASK: u8 = 0b01111111;

// ENTRY_MODE_SET flags
/// Shift the entire display instead of the cursor.
pub const DISPLAY_SHIFT: u8 = 0b00000001;
/// Increment (move right) after each write.
pub const INCREMENT: u8 = 0b00000010;

// CONTROL_SET flags
/// The character under the cursor blinks.
pub const BLINK_ON: u8 = 0b00000001;
/// The underline cursor is displayed.
pub const CURSOR_ON: u8 = 0b00000010;
pub const DISPLAY_ON: u8 = 0b00000100;

// SHIFT_SET flags
pub const MOVE_RIGHT: u8 = 0b00000100;
pub const MOVE_LEFT: u8 = 0b00000000;
pub const DISPLAY_MOVE: u8 = 0b00001000;
pub const CURSOR_MOVE: u8 = 0b00000000;

// FUNCTION_SET flags
pub const DATA_LENGTH_8BITS: u8 = 0b00010000;
pub const DATA_LENGTH_4BITS: u8 = 0b00000000;
pub const NR_LINES_2: u8 = 0b00001000;
pub const NR_LINES_1: u8 = 0b00000000;
pub const FONT_5X10DOTS: u8 = 0b00000100;
pub const FONT_5X8DOTS: u8 = 0b00000000;

/// Bus timing characteristics (datasheet, figures 23-25).
pub mod timing {
    /// Wait after power is applied before the first instruction, in milliseconds.
    pub const POWER_ON_MS: u32 = 48;
    /// Wait after the first bootstrap nibble, in microseconds.
    pub const INIT0_US: u32 = 4500;
    /// Wait after each following bootstrap nibble, in microseconds.
    pub const INIT1_US: u32 = 150;
    /// Execution time of clear display and return home, in microseconds.
    pub const LONG_EXEC_US: u32 = 1600;
}

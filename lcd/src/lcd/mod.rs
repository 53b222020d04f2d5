//! Generic character display interface.
//!
//! See [LcdDevice] for the operations shared by character displays, and the
//! [HD44780 module](hd44780) for the controller implementation.

pub mod hd44780;

use crate::{LcdError, LcdResult};
use log::warn;
use std::fmt::Debug;

/// Size of a character display, in characters.
///
/// Immutable once constructed. A single controller addresses 80 characters of display RAM, so
/// lines are at most 40 characters wide, and panels with 3 or 4 lines at most 20.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Geometry {
    width: u8,
    height: u8,
}

impl Geometry {
    pub const MAX_WIDTH: u8 = 40;
    pub const MAX_HEIGHT: u8 = 4;
    /// Display RAM cells one controller can show.
    pub const MAX_CELLS: u16 = 80;

    /// The common 16x2 panel.
    pub const LCD1602: Geometry = Geometry { width: 16, height: 2 };
    /// 16x4 panel. Uses the alternative row layout, see [hd44780::RowOffsets].
    pub const LCD1604: Geometry = Geometry { width: 16, height: 4 };
    /// 20x4 panel.
    pub const LCD2004: Geometry = Geometry { width: 20, height: 4 };

    /// Creates a new geometry.
    ///
    /// # Errors
    /// - [LcdError::InvalidGeometry] if either dimension is zero, or the panel has more
    ///   characters than one controller can address without rows overlapping.
    pub fn new(width: u8, height: u8) -> LcdResult<Self> {
        if width == 0
            || width > Self::MAX_WIDTH
            || height == 0
            || height > Self::MAX_HEIGHT
            || width as u16 * height as u16 > Self::MAX_CELLS
        {
            return Err(LcdError::InvalidGeometry { width, height });
        }
        Ok(Geometry { width, height })
    }

    /// Characters per line.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of lines.
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether `(x, y)` lies on the panel.
    pub fn contains(&self, x: u8, y: u8) -> bool {
        x < self.width && y < self.height
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::LCD1602
    }
}

/// Text display mode.
///
/// Controllers that can't render inverted text just keep track of the flag.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextMode {
    #[default]
    Normal,
    Inverted,
}

impl TextMode {
    /// Gets the opposite mode.
    pub fn inverted(self) -> Self {
        match self {
            TextMode::Normal => TextMode::Inverted,
            TextMode::Inverted => TextMode::Normal,
        }
    }
}

/// Common interface for character displays.
///
/// Text goes through [LcdDevice::write], which interprets control characters:
///
/// | Byte   | Name            | Effect                                          |
/// |--------|-----------------|-------------------------------------------------|
/// | `0x07` | alert           | inverts the text mode                           |
/// | `0x08` | backspace       | erases the character left of the cursor         |
/// | `0x09` | horizontal tab  | moves to the next tab stop                      |
/// | `0x0A` | line feed       | moves to the start of the next line, clearing it |
/// | `0x0C` | form feed       | clears the display                              |
/// | `0x0D` | carriage return | moves to the start of the current line          |
///
/// Any other byte below `0x20` is rejected.
pub trait LcdDevice: Debug {
    /// Starts the display for text output. Returns `true` if successful.
    fn begin(&mut self) -> bool;

    /// Stops the display and powers it down. Returns `true` if successful.
    fn end(&mut self) -> bool;

    /// Turns the backlight on.
    fn backlight_on(&mut self) {}

    /// Turns the backlight off.
    fn backlight_off(&mut self) {}

    /// Sets the display contrast, on displays that support it.
    fn display_contrast(&mut self, _level: u8) {}

    /// Shows the display in normal colors, on displays that support it.
    fn display_normal(&mut self) {}

    /// Shows the display with inverted colors, on displays that support it.
    fn display_inverse(&mut self) {}

    /// Turns the display on.
    fn display_on(&mut self);

    /// Turns the display off. Display RAM is kept.
    fn display_off(&mut self);

    /// Clears the display and moves the cursor home.
    fn display_clear(&mut self);

    /// Gets the current cursor position as `(x, y)`.
    fn cursor(&self) -> (u8, u8);

    /// Moves the cursor to `(x, y)`.
    ///
    /// A position outside the display moves the cursor to `(0, 0)` instead.
    fn cursor_set(&mut self, x: u8, y: u8);

    /// Gets the tab step.
    fn tab_step(&self) -> u8;

    /// Sets the tab step.
    ///
    /// # Errors
    /// - [LcdError::InvalidTabStep] if `step` is zero.
    fn set_tab_step(&mut self, step: u8) -> LcdResult<()>;

    /// Gets the text mode.
    fn text_mode(&self) -> TextMode;

    /// Sets the text mode.
    fn set_text_mode(&mut self, mode: TextMode);

    fn text_normal_mode(&mut self) {
        self.set_text_mode(TextMode::Normal);
    }

    fn text_inverted_mode(&mut self) {
        self.set_text_mode(TextMode::Inverted);
    }

    /// Writes a single byte, interpreting control characters.
    ///
    /// Returns the number of characters written: `1`, or `0` if the byte is an
    /// unsupported control character.
    fn write(&mut self, c: u8) -> usize;

    /// Writes a string. Characters outside ASCII are replaced with `?`.
    ///
    /// Returns the sum of the [LcdDevice::write] results.
    fn print(&mut self, s: &str) -> usize {
        s.chars().map(|c| self.write(encode_char(c))).sum()
    }
}

/// Maps a character to the byte sent to the display.
pub(crate) fn encode_char(c: char) -> u8 {
    if c.is_ascii() {
        c as u8
    } else {
        warn!("Non-ASCII character: {}", c);
        b'?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_bounds() {
        assert!(Geometry::new(40, 2).is_ok());
        assert!(Geometry::new(20, 4).is_ok());
        assert!(Geometry::new(8, 1).is_ok());
        assert_eq!(
            Geometry::new(40, 4),
            Err(LcdError::InvalidGeometry { width: 40, height: 4 })
        );
        assert_eq!(
            Geometry::new(21, 4),
            Err(LcdError::InvalidGeometry { width: 21, height: 4 })
        );
        assert_eq!(
            Geometry::new(32, 3),
            Err(LcdError::InvalidGeometry { width: 32, height: 3 })
        );
        assert_eq!(
            Geometry::new(0, 2),
            Err(LcdError::InvalidGeometry { width: 0, height: 2 })
        );
        assert_eq!(
            Geometry::new(16, 5),
            Err(LcdError::InvalidGeometry { width: 16, height: 5 })
        );
    }

    #[test]
    fn geometry_contains() {
        let geometry = Geometry::LCD1602;
        assert!(geometry.contains(0, 0));
        assert!(geometry.contains(15, 1));
        assert!(!geometry.contains(16, 0));
        assert!(!geometry.contains(0, 2));
    }

    #[test]
    fn text_mode_inverts_back_and_forth() {
        assert_eq!(TextMode::Normal.inverted(), TextMode::Inverted);
        assert_eq!(TextMode::Normal.inverted().inverted(), TextMode::Normal);
    }

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(encode_char('A'), b'A');
        assert_eq!(encode_char('ż'), b'?');
    }
}

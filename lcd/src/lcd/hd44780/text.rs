use super::Hd44780;
use crate::lcd::{encode_char, Geometry, LcdDevice};
use embedded_hal::delay::DelayNs;
use log::{trace, warn};
use std::fmt;

const ALERT: u8 = 0x07;
const BACKSPACE: u8 = 0x08;
const HORIZONTAL_TAB: u8 = 0x09;
const LINE_FEED: u8 = 0x0A;
const FORM_FEED: u8 = 0x0C;
const CARRIAGE_RETURN: u8 = 0x0D;

const BLANK_LINE: [u8; Geometry::MAX_WIDTH as usize] = [b' '; Geometry::MAX_WIDTH as usize];

impl<D: DelayNs> Hd44780<'_, D> {
    /// Text stream interpreter behind [LcdDevice::write].
    pub(super) fn interpret(&mut self, c: u8) -> usize {
        if c >= b' ' {
            self.put_char(c);
            return 1;
        }

        match c {
            ALERT => self.text_mode = self.text_mode.inverted(),
            BACKSPACE => {
                self.cursor_set(self.x.wrapping_sub(1), self.y);
                self.put_char(b' ');
                self.cursor_set(self.x.wrapping_sub(1), self.y);
            }
            HORIZONTAL_TAB => self.tab(),
            LINE_FEED => self.line_feed(),
            FORM_FEED => self.display_clear(),
            CARRIAGE_RETURN => self.cursor_set(0, self.y),
            _ => {
                warn!("Unhandled control character: {:#04x}", c);
                return 0;
            }
        }
        1
    }

    /// Writes a character code as is, wrapping to the next line first if the current one is full.
    pub(super) fn put_char(&mut self, c: u8) {
        if self.x == self.geometry.width() {
            self.line_feed();
        }
        self.x += 1;
        trace!("Sending data: {:08b}", c);
        self.io.set_data_mode(true);
        self.io.write_byte(c);
        self.io.set_data_mode(false);
    }

    /// Moves to the start of the next line and blanks it.
    fn line_feed(&mut self) {
        self.cursor_set(0, self.y + 1);
        let width = self.geometry.width() as usize;
        self.io.set_data_mode(true);
        self.io.write_buffer(&BLANK_LINE[..width]);
        self.io.set_data_mode(false);
        self.cursor_set(0, self.y);
    }

    /// Moves to the next tab stop. Past the end of the line, moves to the start of the next one.
    fn tab(&mut self) {
        let step = self.tab_step as u16;
        let x = self.x as u16;
        let next = x + step - x % step;
        if next >= self.geometry.width() as u16 {
            self.cursor_set(0, self.y + 1);
        } else {
            self.cursor_set(next as u8, self.y);
        }
    }
}

/// Writes formatted text through the interpreter. Fails on the first rejected control character.
impl<D: DelayNs> fmt::Write for Hd44780<'_, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.write(encode_char(c)) == 0 {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}

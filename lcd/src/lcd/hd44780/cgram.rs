use super::command::{SET_CGRAM_ADDR, SET_CGRAM_MASK};
use super::Hd44780;
use crate::{LcdError, LcdResult};
use embedded_hal::delay::DelayNs;
use log::trace;

/// Number of custom character slots in CGRAM.
pub const CUSTOM_CHAR_SLOTS: u8 = 8;

/// Rows in a custom character bitmap.
pub const BITMAP_MAX: usize = 8;

/// A 5x8 character bitmap, one byte per row from the top. Only the 5 lowest bits of each row
/// are displayed, the highest one being the leftmost pixel.
pub type Bitmap = [u8; BITMAP_MAX];

impl<D: DelayNs> Hd44780<'_, D> {
    /// Programs custom character `id` (0-7) with the given bitmap.
    ///
    /// Afterwards the character is displayed for character code `id`, which can be written
    /// with [Hd44780::write_custom_char]. Changing a bitmap also changes any copies of the
    /// character already on the display.
    ///
    /// The address counter is pointed back at the cursor position afterwards, so text writes can
    /// continue where they left off.
    ///
    /// # Errors
    /// - [LcdError::InvalidCustomChar] if `id` is 8 or more.
    pub fn set_custom_char(&mut self, id: u8, bitmap: &Bitmap) -> LcdResult<()> {
        if id >= CUSTOM_CHAR_SLOTS {
            return Err(LcdError::InvalidCustomChar(id));
        }
        trace!("Programming custom character {}: {:02X?}", id, bitmap);
        self.write_instruction(SET_CGRAM_ADDR | ((id << 3) & SET_CGRAM_MASK));
        self.io.set_data_mode(true);
        self.io.write_buffer(bitmap);
        self.io.set_data_mode(false);
        self.restore_address();
        Ok(())
    }

    /// Writes custom character `id` at the cursor position.
    ///
    /// Codes 0-7 overlap control characters, so they can't be written through
    /// [LcdDevice::write](crate::lcd::LcdDevice::write).
    ///
    /// # Errors
    /// - [LcdError::InvalidCustomChar] if `id` is 8 or more.
    pub fn write_custom_char(&mut self, id: u8) -> LcdResult<usize> {
        if id >= CUSTOM_CHAR_SLOTS {
            return Err(LcdError::InvalidCustomChar(id));
        }
        self.put_char(id);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcd::{Geometry, LcdDevice};
    use crate::testing::{BusOp, RecordingDelay, RecordingTransport};

    const HEART: Bitmap = [
        0b00000, 0b01010, 0b11111, 0b11111, 0b11111, 0b01110, 0b00100, 0b00000,
    ];

    #[test]
    fn uploads_bitmap_to_slot() {
        let mut io = RecordingTransport::new_4bit();
        let log = io.log();
        let mut lcd = Hd44780::with_delay(&mut io, Geometry::LCD1602, RecordingDelay::default());
        lcd.cursor_set(3, 1);
        log.clear();

        assert_eq!(lcd.set_custom_char(2, &HEART), Ok(()));
        assert_eq!(lcd.cursor(), (3, 1));

        let mut expected = vec![BusOp::Byte(0b01010000), BusOp::DataMode(true)];
        expected.extend(HEART.iter().map(|&row| BusOp::Byte(row)));
        expected.extend([BusOp::DataMode(false), BusOp::Byte(0x80 | 0x43)]);
        assert_eq!(log.ops(), expected);
    }

    #[test]
    fn last_slot_address() {
        let mut io = RecordingTransport::new_4bit();
        let log = io.log();
        let mut lcd = Hd44780::with_delay(&mut io, Geometry::LCD1602, RecordingDelay::default());
        lcd.set_custom_char(7, &HEART).unwrap();
        assert_eq!(log.instructions()[0], 0b01111000);
    }

    #[test]
    fn rejects_slot_out_of_range() {
        let mut io = RecordingTransport::new_4bit();
        let log = io.log();
        let mut lcd = Hd44780::with_delay(&mut io, Geometry::LCD1602, RecordingDelay::default());

        assert_eq!(lcd.set_custom_char(8, &HEART), Err(LcdError::InvalidCustomChar(8)));
        assert_eq!(lcd.write_custom_char(9), Err(LcdError::InvalidCustomChar(9)));
        assert!(log.ops().is_empty());
    }

    #[test]
    fn writes_custom_char_code() {
        let mut io = RecordingTransport::new_4bit();
        let log = io.log();
        let mut lcd = Hd44780::with_delay(&mut io, Geometry::LCD1602, RecordingDelay::default());

        assert_eq!(lcd.write_custom_char(0), Ok(1));
        assert_eq!(lcd.write_custom_char(7), Ok(1));
        assert_eq!(lcd.cursor(), (2, 0));
        assert_eq!(log.data(), vec![0, 7]);
    }
}

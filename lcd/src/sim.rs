//! Simulated HD44780 controller.
//!
//! [SimulatedHd44780] implements [LcdTransport] by decoding the bus traffic the way the controller
//! would, so host programs and tests can see what a real panel shows without any hardware.

use crate::lcd::hd44780::command::*;
use crate::lcd::hd44780::{Bitmap, RowOffsets, BITMAP_MAX};
use crate::lcd::Geometry;
use crate::LcdTransport;
use log::trace;

const DDRAM_SIZE: usize = 0x80;
const CGRAM_SIZE: usize = 0x40;

/// Last address of the first line of DDRAM in two-line mode.
const LINE_0_END: u8 = 0x27;
const LINE_1_START: u8 = 0x40;
const LINE_1_END: u8 = 0x67;
/// Last address of DDRAM in one-line mode.
const ONE_LINE_END: u8 = 0x4F;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Target {
    Ddram,
    Cgram,
}

/// A software model of the HD44780 controller.
///
/// Models the interface width (the controller powers up in 8-bit mode and switches on a function
/// set), nibble pairing in 4-bit mode, the instruction set, and data writes with the address
/// counter moving according to the entry mode. Timing is not checked.
#[derive(Debug, Clone)]
pub struct SimulatedHd44780 {
    eight_bit_bus: bool,
    interface_8bit: bool,
    pending_nibble: Option<u8>,
    data_mode: bool,
    backlight: bool,

    ddram: [u8; DDRAM_SIZE],
    cgram: [u8; CGRAM_SIZE],
    address: u8,
    target: Target,
    display_shift: i16,

    entry_mode: u8,
    control: u8,
    function: u8,
    instruction_count: usize,
}

impl SimulatedHd44780 {
    /// Creates a controller wired with a 4-bit data bus.
    pub fn new_4bit() -> Self {
        Self::new(false)
    }

    /// Creates a controller wired with an 8-bit data bus.
    pub fn new_8bit() -> Self {
        Self::new(true)
    }

    fn new(eight_bit_bus: bool) -> Self {
        SimulatedHd44780 {
            eight_bit_bus,
            interface_8bit: true,
            pending_nibble: None,
            data_mode: false,
            backlight: false,
            ddram: [b' '; DDRAM_SIZE],
            cgram: [0; CGRAM_SIZE],
            address: 0,
            target: Target::Ddram,
            display_shift: 0,
            entry_mode: ENTRY_MODE_SET | INCREMENT,
            control: CONTROL_SET,
            function: FUNCTION_SET | DATA_LENGTH_8BITS,
            instruction_count: 0,
        }
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    pub fn display_on(&self) -> bool {
        self.control & DISPLAY_ON != 0
    }

    pub fn cursor_visible(&self) -> bool {
        self.control & CURSOR_ON != 0
    }

    pub fn blink(&self) -> bool {
        self.control & BLINK_ON != 0
    }

    /// Whether the controller currently expects full bytes rather than nibble pairs.
    pub fn is_8bit_interface(&self) -> bool {
        self.interface_8bit
    }

    pub fn entry_mode(&self) -> u8 {
        self.entry_mode
    }

    pub fn display_control(&self) -> u8 {
        self.control
    }

    pub fn function_set(&self) -> u8 {
        self.function
    }

    /// Gets the address counter. Points into CGRAM after a CGRAM address was set.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Net display shift, positive to the right.
    pub fn display_shift(&self) -> i16 {
        self.display_shift
    }

    /// Number of instructions executed so far.
    pub fn instruction_count(&self) -> usize {
        self.instruction_count
    }

    pub fn ddram(&self) -> &[u8] {
        &self.ddram
    }

    /// Gets the bitmap stored in custom character slot `id` (0-7).
    pub fn custom_char(&self, id: u8) -> Bitmap {
        let start = (id as usize & 0b111) * BITMAP_MAX;
        let mut bitmap = [0; BITMAP_MAX];
        bitmap.copy_from_slice(&self.cgram[start..start + BITMAP_MAX]);
        bitmap
    }

    /// Gets the character codes shown on row `y` of a panel with the given geometry.
    ///
    /// Empty if the panel has no row `y`.
    pub fn row_codes(&self, geometry: Geometry, y: u8) -> Vec<u8> {
        if y >= geometry.height() {
            return Vec::new();
        }
        let base = RowOffsets::for_geometry(geometry).base(y);
        (0..geometry.width())
            .map(|x| self.ddram[((base + x) & SET_DDRAM_MASK) as usize])
            .collect()
    }

    /// Renders the rows of a panel with the given geometry.
    ///
    /// Custom characters are shown as `▒`, other codes outside ASCII as `?`.
    /// Display shift is not applied.
    pub fn render(&self, geometry: Geometry) -> Vec<String> {
        (0..geometry.height())
            .map(|y| {
                self.row_codes(geometry, y)
                    .into_iter()
                    .map(|code| match code {
                        0x00..=0x0F => '▒',
                        0x20..=0x7E => code as char,
                        _ => '?',
                    })
                    .collect()
            })
            .collect()
    }

    fn execute(&mut self, byte: u8) {
        if self.data_mode {
            self.write_data(byte);
        } else {
            self.instruction_count += 1;
            self.instruction(byte);
        }
    }

    fn instruction(&mut self, instruction: u8) {
        trace!("Simulated instruction: {:08b}", instruction);
        if instruction & SET_DDRAM_ADDR != 0 {
            self.target = Target::Ddram;
            self.address = instruction & SET_DDRAM_MASK;
        } else if instruction & SET_CGRAM_ADDR != 0 {
            self.target = Target::Cgram;
            self.address = instruction & SET_CGRAM_MASK;
        } else if instruction & FUNCTION_SET != 0 {
            self.function = instruction;
            let interface_8bit = instruction & DATA_LENGTH_8BITS != 0;
            if interface_8bit != self.interface_8bit {
                self.interface_8bit = interface_8bit;
                self.pending_nibble = None;
            }
        } else if instruction & SHIFT_SET != 0 {
            let right = instruction & MOVE_RIGHT != 0;
            if instruction & DISPLAY_MOVE != 0 {
                self.display_shift += if right { 1 } else { -1 };
            } else {
                self.step_address(right);
            }
        } else if instruction & CONTROL_SET != 0 {
            self.control = instruction;
        } else if instruction & ENTRY_MODE_SET != 0 {
            self.entry_mode = instruction;
        } else if instruction & RETURN_HOME != 0 {
            self.target = Target::Ddram;
            self.address = 0;
            self.display_shift = 0;
        } else if instruction & CLEAR_DISPLAY != 0 {
            self.ddram.fill(b' ');
            self.target = Target::Ddram;
            self.address = 0;
            self.display_shift = 0;
            self.entry_mode |= INCREMENT;
        }
    }

    fn write_data(&mut self, byte: u8) {
        trace!("Simulated data: {:08b} at {:#04x} ({:?})", byte, self.address, self.target);
        match self.target {
            Target::Ddram => self.ddram[self.address as usize] = byte,
            Target::Cgram => self.cgram[self.address as usize] = byte,
        }
        self.step_address(self.entry_mode & INCREMENT != 0);
        if self.target == Target::Ddram && self.entry_mode & DISPLAY_SHIFT != 0 {
            self.display_shift += if self.entry_mode & INCREMENT != 0 { -1 } else { 1 };
        }
    }

    fn step_address(&mut self, forward: bool) {
        let next = match self.target {
            Target::Cgram => {
                let next = if forward { self.address + 1 } else { self.address.wrapping_sub(1) };
                next & SET_CGRAM_MASK
            }
            Target::Ddram if self.function & NR_LINES_2 != 0 => match (forward, self.address) {
                (true, LINE_0_END) => LINE_1_START,
                (true, LINE_1_END) => 0,
                (true, address) => address + 1,
                (false, 0) => LINE_1_END,
                (false, LINE_1_START) => LINE_0_END,
                (false, address) => address - 1,
            },
            Target::Ddram => match (forward, self.address) {
                (true, ONE_LINE_END) => 0,
                (true, address) => address + 1,
                (false, 0) => ONE_LINE_END,
                (false, address) => address - 1,
            },
        };
        self.address = next & SET_DDRAM_MASK;
    }
}

impl Default for SimulatedHd44780 {
    fn default() -> Self {
        Self::new_4bit()
    }
}

impl LcdTransport for SimulatedHd44780 {
    fn setup(&mut self) -> bool {
        self.eight_bit_bus
    }

    /// In 8-bit mode the lower four data lines read as zero, so a lone nibble is executed as the
    /// high half of a byte. In 4-bit mode nibbles are paired, high first.
    fn write_nibble(&mut self, value: u8) {
        let value = value & 0x0F;
        if self.interface_8bit {
            self.execute(value << 4);
        } else {
            match self.pending_nibble.take() {
                None => self.pending_nibble = Some(value),
                Some(high) => self.execute((high << 4) | value),
            }
        }
    }

    fn write_byte(&mut self, value: u8) {
        if self.eight_bit_bus {
            self.execute(value);
        } else {
            self.write_nibble(value >> 4);
            self.write_nibble(value & 0x0F);
        }
    }

    fn set_data_mode(&mut self, data: bool) {
        self.data_mode = data;
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibble_bootstrap_switches_to_4bit() {
        let mut sim = SimulatedHd44780::new_4bit();
        assert!(sim.is_8bit_interface());
        for nibble in [0b0011, 0b0011, 0b0011] {
            sim.write_nibble(nibble);
            assert!(sim.is_8bit_interface());
        }
        sim.write_nibble(0b0010);
        assert!(!sim.is_8bit_interface());

        sim.write_byte(0b00101000);
        assert_eq!(sim.function_set(), 0b00101000);
        assert_eq!(sim.instruction_count(), 5);
    }

    #[test]
    fn two_line_address_counter_skips_gap() {
        let mut sim = SimulatedHd44780::new_8bit();
        sim.write_byte(FUNCTION_SET | DATA_LENGTH_8BITS | NR_LINES_2);
        sim.write_byte(SET_DDRAM_ADDR | LINE_0_END);
        sim.set_data_mode(true);
        sim.write_byte(b'a');
        assert_eq!(sim.address(), LINE_1_START);

        sim.set_data_mode(false);
        sim.write_byte(SET_DDRAM_ADDR | LINE_1_END);
        sim.set_data_mode(true);
        sim.write_byte(b'b');
        assert_eq!(sim.address(), 0);
    }

    #[test]
    fn decrementing_entry_mode_writes_backwards() {
        let mut sim = SimulatedHd44780::new_8bit();
        sim.write_byte(ENTRY_MODE_SET);
        sim.write_byte(SET_DDRAM_ADDR | 5);
        sim.set_data_mode(true);
        sim.write_buffer(b"ab");
        assert_eq!(&sim.ddram()[4..6], b"ba");
        assert_eq!(sim.address(), 3);
    }

    #[test]
    fn clear_blanks_ddram_and_restores_increment() {
        let mut sim = SimulatedHd44780::new_8bit();
        sim.write_byte(ENTRY_MODE_SET);
        sim.set_data_mode(true);
        sim.write_byte(b'x');
        sim.set_data_mode(false);
        sim.write_byte(CLEAR_DISPLAY);
        assert!(sim.ddram().iter().all(|&c| c == b' '));
        assert_eq!(sim.entry_mode(), ENTRY_MODE_SET | INCREMENT);
        assert_eq!(sim.address(), 0);
    }

    #[test]
    fn rows_outside_geometry_are_empty() {
        let mut sim = SimulatedHd44780::new_8bit();
        sim.set_data_mode(true);
        sim.write_byte(b'x');
        assert_eq!(sim.row_codes(Geometry::LCD1602, 0)[0], b'x');
        assert!(sim.row_codes(Geometry::LCD1602, 2).is_empty());
        assert!(sim.row_codes(Geometry::LCD2004, 4).is_empty());
        assert!(sim.row_codes(Geometry::LCD2004, u8::MAX).is_empty());
    }

    #[test]
    fn display_shift_is_tracked() {
        let mut sim = SimulatedHd44780::new_8bit();
        sim.write_byte(SHIFT_SET | DISPLAY_MOVE | MOVE_LEFT);
        sim.write_byte(SHIFT_SET | DISPLAY_MOVE | MOVE_LEFT);
        sim.write_byte(SHIFT_SET | DISPLAY_MOVE | MOVE_RIGHT);
        assert_eq!(sim.display_shift(), -1);
        sim.write_byte(RETURN_HOME);
        assert_eq!(sim.display_shift(), 0);
    }
}

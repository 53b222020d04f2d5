//! HD44780 LCD module.
//!
//! See [Hd44780] for the protocol engine. It keeps mirrors of the controller's write-only
//! registers, so every toggle (display on, cursor blink, entry direction...) sets or clears
//! one bit in a mirror and then flushes the whole mirror byte as a single instruction. The
//! mirror therefore always equals the last value written to the device.
//!
//! # Memory
//!
//! - **DDRAM** (Display Data RAM) stores the character codes shown on the display. Its rows are
//!   not contiguous, see [RowOffsets].
//! - **CGRAM** (Character Generator RAM) stores up to 8 user-defined 5x8 characters, see
//!   [Hd44780::set_custom_char].
//!
//! # Sources
//!
//! - Hitachi, “HD44780U (LCD-II) Dot Matrix Liquid Crystal Display Controller/Driver,”
//!   ADE-207-272(Z), Rev. 0.0, Sep. 1999.

mod cgram;
pub mod command;
mod text;

pub use cgram::*;

use crate::lcd::{Geometry, LcdDevice, TextMode};
use crate::{LcdConfig, LcdError, LcdResult, LcdTransport, StdDelay};
use command::*;
use embedded_hal::delay::DelayNs;
use log::{debug, trace};
use std::fmt::{Debug, Formatter};

/// Maps a logical row to its DDRAM base address.
///
/// The controller multiplexes its 80 bytes of display RAM as two 40-character lines starting at
/// `0x00` and `0x40`. Four-line panels split each of those in half, so row 2 continues row 0 and
/// row 3 continues row 1. On 16-column four-line panels the split happens at column 16 instead of
/// column 20, which is why they need their own table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RowOffsets([u8; 4]);

impl RowOffsets {
    /// Layout of every panel except 16x4.
    pub const STANDARD: RowOffsets = RowOffsets([0x00, 0x40, 0x14, 0x54]);
    /// Layout of 16x4 panels.
    pub const NARROW_FOUR_LINE: RowOffsets = RowOffsets([0x00, 0x40, 0x10, 0x50]);

    /// Selects the table for the given geometry.
    pub fn for_geometry(geometry: Geometry) -> Self {
        if geometry.width() == 16 && geometry.height() == 4 {
            RowOffsets::NARROW_FOUR_LINE
        } else {
            RowOffsets::STANDARD
        }
    }

    /// Gets the DDRAM address of the first character of `row`.
    ///
    /// # Panics
    /// If `row` is 4 or more.
    pub fn base(&self, row: u8) -> u8 {
        self.0[row as usize]
    }

    pub fn as_array(&self) -> [u8; 4] {
        self.0
    }
}

/// Initialization progress of an [Hd44780].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum InitState {
    /// Power was just applied, or [LcdDevice::begin] was never called.
    #[default]
    PowerOn,
    /// Forcing the controller into a known bus width.
    Negotiating,
    /// Function set and display control were written.
    Configured,
    /// The display is cleared, on and ready for text.
    Ready,
    /// [LcdDevice::end] was called. [LcdDevice::begin] may be called again.
    Shutdown,
}

/// Driver for the HD44780 LCD controller.
///
/// The transport is borrowed for the driver's whole lifetime, so it can be shared with other code
/// (or inspected in tests) once the driver is dropped. All waits go through the delay provider `D`.
///
/// A driver is not meant to be shared between threads. Every operation blocks until its bus
/// transactions and mandated waits are complete, and multistep sequences (initialization, custom
/// character upload, line feed) must not be interrupted.
pub struct Hd44780<'a, D: DelayNs = StdDelay> {
    io: &'a mut dyn LcdTransport,
    delay: D,
    geometry: Geometry,
    offsets: RowOffsets,

    entry_mode: u8,
    control: u8,
    function: u8,

    x: u8,
    y: u8,
    tab_step: u8,
    text_mode: TextMode,
    state: InitState,
}

impl<'a> Hd44780<'a> {
    /// Creates a new driver using [StdDelay] for waiting.
    ///
    /// The display is not touched until [LcdDevice::begin] is called.
    pub fn new(io: &'a mut dyn LcdTransport, geometry: Geometry) -> Self {
        Self::with_delay(io, geometry, StdDelay)
    }
}

impl<'a, D: DelayNs> Hd44780<'a, D> {
    pub const DEFAULT_TAB_STEP: u8 = 4;

    /// Creates a new driver with the given delay provider.
    pub fn with_delay(io: &'a mut dyn LcdTransport, geometry: Geometry, delay: D) -> Self {
        let offsets = RowOffsets::for_geometry(geometry);
        debug!("HD44780 {}x{}, row offsets {:02X?}", geometry.width(), geometry.height(), offsets.0);
        Hd44780 {
            io,
            delay,
            geometry,
            offsets,
            entry_mode: ENTRY_MODE_SET | INCREMENT,
            control: CONTROL_SET,
            function: FUNCTION_SET | DATA_LENGTH_4BITS | NR_LINES_2 | FONT_5X8DOTS,
            x: 0,
            y: 0,
            tab_step: Self::DEFAULT_TAB_STEP,
            text_mode: TextMode::Normal,
            state: InitState::PowerOn,
        }
    }

    /// Creates a new driver from a loaded configuration.
    ///
    /// # Errors
    /// - [LcdError::InvalidGeometry] or [LcdError::InvalidTabStep] if the configuration is invalid.
    pub fn from_config(io: &'a mut dyn LcdTransport, config: &LcdConfig, delay: D) -> LcdResult<Self> {
        let mut lcd = Self::with_delay(io, config.geometry()?, delay);
        lcd.tab_step = config.tab_step()?;
        Ok(lcd)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn row_offsets(&self) -> RowOffsets {
        self.offsets
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    /// Gets the entry mode register mirror.
    pub fn entry_mode(&self) -> u8 {
        self.entry_mode
    }

    /// Gets the display control register mirror.
    pub fn display_control(&self) -> u8 {
        self.control
    }

    /// Gets the function set register mirror.
    pub fn function_set(&self) -> u8 {
        self.function
    }

    /// Moves the cursor home and undoes any display shift.
    pub fn cursor_home(&mut self) {
        self.write_instruction(RETURN_HOME);
        self.x = 0;
        self.y = 0;
        self.delay.delay_us(timing::LONG_EXEC_US);
    }

    pub fn cursor_blink_on(&mut self) {
        self.update_control(BLINK_ON, true);
    }

    pub fn cursor_blink_off(&mut self) {
        self.update_control(BLINK_ON, false);
    }

    /// Shows the underline cursor.
    pub fn cursor_underline_on(&mut self) {
        self.update_control(CURSOR_ON, true);
    }

    pub fn cursor_underline_off(&mut self) {
        self.update_control(CURSOR_ON, false);
    }

    /// Shifts the whole display one position to the left, without touching DDRAM.
    pub fn display_scroll_left(&mut self) {
        self.write_instruction(SHIFT_SET | DISPLAY_MOVE | MOVE_LEFT);
    }

    /// Shifts the whole display one position to the right, without touching DDRAM.
    pub fn display_scroll_right(&mut self) {
        self.write_instruction(SHIFT_SET | DISPLAY_MOVE | MOVE_RIGHT);
    }

    /// Makes the controller's address counter move right after each character.
    pub fn text_flow_left_to_right(&mut self) {
        self.update_entry_mode(INCREMENT, true);
    }

    /// Makes the controller's address counter move left after each character.
    ///
    /// The tracked cursor position still assumes left-to-right text.
    pub fn text_flow_right_to_left(&mut self) {
        self.update_entry_mode(INCREMENT, false);
    }

    /// Shifts the display along with each written character, keeping the cursor in place.
    pub fn text_scroll_left_adjust(&mut self) {
        self.update_entry_mode(DISPLAY_SHIFT, true);
    }

    pub fn text_scroll_right_adjust(&mut self) {
        self.update_entry_mode(DISPLAY_SHIFT, false);
    }

    fn transition(&mut self, next: InitState) {
        debug!("HD44780 state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn write_bootstrap_nibble(&mut self, nibble: u8, wait_us: u32) {
        trace!("Sending bootstrap nibble: {:04b}", nibble);
        self.io.write_nibble(nibble);
        self.delay.delay_us(wait_us);
    }

    fn write_instruction(&mut self, instruction: u8) {
        trace!("Sending instruction: {:08b}", instruction);
        self.io.write_byte(instruction);
    }

    fn update_entry_mode(&mut self, flag: u8, on: bool) {
        if on {
            self.entry_mode |= flag;
        } else {
            self.entry_mode &= !flag;
        }
        self.write_instruction(self.entry_mode);
    }

    fn update_control(&mut self, flag: u8, on: bool) {
        if on {
            self.control |= flag;
        } else {
            self.control &= !flag;
        }
        self.write_instruction(self.control);
    }

    /// Points the address counter back at the tracked cursor position, without clamping.
    fn restore_address(&mut self) {
        let address = self.offsets.base(self.y) + self.x;
        self.write_instruction(SET_DDRAM_ADDR | (address & SET_DDRAM_MASK));
    }
}

impl<D: DelayNs> LcdDevice for Hd44780<'_, D> {
    /// Initializes the controller and turns the display on.
    ///
    /// The bus width is unknown at power-up, so unless the transport is wired for 8 bits, the
    /// controller is forced into 8-bit mode by sending the high nibble of an 8-bit function set
    /// three times, and then switched to 4-bit mode with a single nibble. See figure 24 of the
    /// datasheet.
    ///
    /// Then the function set and display control mirrors are written, and the display is
    /// cleared, turned on and backlit. Always returns `true`.
    fn begin(&mut self) -> bool {
        const FS_8BIT: u8 = FUNCTION_SET | DATA_LENGTH_8BITS;
        const FS_4BIT: u8 = FUNCTION_SET | DATA_LENGTH_4BITS;

        self.transition(InitState::PowerOn);
        let eight_bit = self.io.setup();
        self.delay.delay_ms(timing::POWER_ON_MS);

        self.transition(InitState::Negotiating);
        if eight_bit {
            self.function |= DATA_LENGTH_8BITS;
            self.write_instruction(self.function);
        } else {
            self.function &= !DATA_LENGTH_8BITS;
            self.write_bootstrap_nibble(FS_8BIT >> 4, timing::INIT0_US);
            self.write_bootstrap_nibble(FS_8BIT >> 4, timing::INIT1_US);
            self.write_bootstrap_nibble(FS_8BIT >> 4, timing::INIT1_US);
            self.write_bootstrap_nibble(FS_4BIT >> 4, timing::INIT1_US);
        }

        self.write_instruction(self.function);
        self.write_instruction(self.control);
        self.transition(InitState::Configured);

        self.text_normal_mode();
        self.display_clear();
        self.display_on();
        self.backlight_on();
        self.transition(InitState::Ready);
        true
    }

    /// Turns the display and backlight off. Always returns `true`.
    fn end(&mut self) -> bool {
        self.display_off();
        self.backlight_off();
        self.transition(InitState::Shutdown);
        true
    }

    fn backlight_on(&mut self) {
        self.io.set_backlight(true);
    }

    fn backlight_off(&mut self) {
        self.io.set_backlight(false);
    }

    fn display_on(&mut self) {
        self.update_control(DISPLAY_ON, true);
    }

    fn display_off(&mut self) {
        self.update_control(DISPLAY_ON, false);
    }

    /// Clears the display and moves the cursor to `(0, 0)`.
    ///
    /// The controller resets the entry mode to increment as part of the clear, so the mirror
    /// follows without another write.
    fn display_clear(&mut self) {
        self.write_instruction(CLEAR_DISPLAY);
        self.x = 0;
        self.y = 0;
        self.entry_mode |= INCREMENT;
        self.delay.delay_us(timing::LONG_EXEC_US);
    }

    fn cursor(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    fn cursor_set(&mut self, x: u8, y: u8) {
        let (x, y) = if self.geometry.contains(x, y) { (x, y) } else { (0, 0) };
        let address = self.offsets.base(y) + x;
        self.write_instruction(SET_DDRAM_ADDR | (address & SET_DDRAM_MASK));
        self.x = x;
        self.y = y;
    }

    fn tab_step(&self) -> u8 {
        self.tab_step
    }

    fn set_tab_step(&mut self, step: u8) -> LcdResult<()> {
        if step == 0 {
            return Err(LcdError::InvalidTabStep);
        }
        self.tab_step = step;
        Ok(())
    }

    fn text_mode(&self) -> TextMode {
        self.text_mode
    }

    fn set_text_mode(&mut self, mode: TextMode) {
        self.text_mode = mode;
    }

    fn write(&mut self, c: u8) -> usize {
        self.interpret(c)
    }
}

impl<D: DelayNs> Debug for Hd44780<'_, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hd44780")
            .field("io", &self.io)
            .field("geometry", &self.geometry)
            .field("state", &self.state)
            .field("cursor", &(self.x, self.y))
            .field("entry_mode", &format_args!("{:08b}", self.entry_mode))
            .field("control", &format_args!("{:08b}", self.control))
            .field("function", &format_args!("{:08b}", self.function))
            .finish_non_exhaustive()
    }
}

use std::fmt::Debug;

/// The minimal set of operations a physical connection to an HD44780 controller must expose.
///
/// Implementations exist per wiring: a parallel 4-bit or 8-bit GPIO bus, a shift register,
/// an I²C port expander, or the [simulator](crate::sim::SimulatedHd44780). The engine owns
/// the protocol; a transport only moves bits.
///
/// There is no error channel. A transport is assumed to be reliable once timing is honored,
/// which means every write must return only after the controller can accept the next one
/// (the short execution time, about 37 µs, unless the bus itself is slower than that).
pub trait LcdTransport: Debug {
    /// Prepares the bus. Called once at the start of initialization.
    ///
    /// Returns `true` if the bus is wired for 8-bit transfers, in which case the 4-bit
    /// negotiation is skipped. Defaults to `false` (4-bit mode).
    fn setup(&mut self) -> bool {
        false
    }

    /// Writes the low nibble of `value` to the data lines and latches it.
    fn write_nibble(&mut self, value: u8);

    /// Writes a full byte. Defaults to two nibble writes, high nibble first.
    fn write_byte(&mut self, value: u8) {
        self.write_nibble(value >> 4);
        self.write_nibble(value & 0x0F);
    }

    /// Writes a sequence of bytes. Defaults to repeated [LcdTransport::write_byte] calls.
    fn write_buffer(&mut self, buffer: &[u8]) {
        for &byte in buffer {
            self.write_byte(byte);
        }
    }

    /// Selects the register the following writes target: `false` for instructions (RS low),
    /// `true` for data (RS high).
    fn set_data_mode(&mut self, data: bool);

    /// Switches the backlight on or off. Transports without backlight control ignore it.
    fn set_backlight(&mut self, on: bool);
}

//! The `Bank` trait: read/write interface for every memory-mapped buffer.

/// Every memory-mapped buffer on the Vectrex bus implements this trait.
///
/// Addresses are full 16-bit bus addresses; each bank masks them down to
/// its own window.
pub trait Bank {
    /// Write `value` to `address`.  Read-only banks ignore the write.
    fn poke(&mut self, address: u16, value: u8);

    /// Read the byte at `address`.
    fn peek(&self, address: u16) -> u8;
}

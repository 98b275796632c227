//! 1 KiB system RAM ($C800–$CFFF, mirrored through the RAM window).

use super::bank::Bank;

pub const RAM_SIZE: usize = 0x400;
const RAM_MASK: u16 = (RAM_SIZE - 1) as u16;

pub struct SystemRamBank {
    pub ram: [u8; RAM_SIZE],
}

impl SystemRamBank {
    pub fn new() -> Self {
        let mut bank = Self { ram: [0; RAM_SIZE] };
        bank.reset();
        bank
    }

    /// Seed RAM with the low byte of each cell's own offset:
    /// ```text
    /// $C800: 00 01 02 03 ... ff 00 01 ...
    /// ```
    /// Software that forgets to clear its variables then sees a
    /// reproducible pattern instead of zeros.
    pub fn reset(&mut self) {
        for (i, cell) in self.ram.iter_mut().enumerate() {
            *cell = (i & 0xFF) as u8;
        }
    }
}

impl Default for SystemRamBank {
    fn default() -> Self { Self::new() }
}

impl Bank for SystemRamBank {
    fn poke(&mut self, address: u16, value: u8) {
        self.ram[(address & RAM_MASK) as usize] = value;
    }
    fn peek(&self, address: u16) -> u8 {
        self.ram[(address & RAM_MASK) as usize]
    }
}

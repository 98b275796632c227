// CPU seam. The 6809 decoder lives outside this crate; it sees the
// machine only through `Bus` and is driven one instruction at a time.

/// 16-bit address bus as the CPU sees it.
pub trait Bus {
    fn read8(&mut self, address: u16) -> u8;
    fn write8(&mut self, address: u16, data: u8);

    fn read16(&mut self, address: u16) -> u16 {
        let hi = self.read8(address) as u16;
        let lo = self.read8(address.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

/// Instruction-stepped CPU core.
pub trait Cpu {
    /// Load the reset vector and clear internal state.
    fn reset<B: Bus + ?Sized>(&mut self, bus: &mut B);

    /// Execute one instruction (or take one pending interrupt) and return
    /// the number of cycles consumed.
    fn step<B: Bus + ?Sized>(&mut self, bus: &mut B, irq: bool, firq: bool) -> u32;
}

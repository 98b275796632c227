//! VIA interrupt control logic.
//!
//! IFR bit 7 is not stored independently: it is recomputed after every
//! flag or enable change as "any enabled source is pending".

use super::INT_REQUEST;

const SOURCE_MASK: u8 = !INT_REQUEST;

#[derive(Debug, Clone, Default)]
pub struct InterruptSource {
    /// Interrupt Flag Register (pending sources + derived bit 7).
    ifr: u8,
    /// Interrupt Enable Register (bits 0–6 only).
    ier: u8,
}

impl InterruptSource {
    pub fn new() -> Self {
        Self { ifr: 0, ier: 0 }
    }

    pub fn reset(&mut self) {
        self.ifr = 0;
        self.ier = 0;
    }

    /// Raise one or more source flags.
    pub fn trigger(&mut self, flags: u8) {
        self.ifr |= flags & SOURCE_MASK;
        self.update();
    }

    /// Acknowledge one or more source flags.
    pub fn clear(&mut self, flags: u8) {
        self.ifr &= !(flags & SOURCE_MASK);
        self.update();
    }

    /// IER write: bit 7 high sets the given enables, bit 7 low clears them.
    pub fn set_mask(&mut self, data: u8) {
        if data & INT_REQUEST != 0 {
            self.ier |= data & SOURCE_MASK;
        } else {
            self.ier &= !(data & SOURCE_MASK);
        }
        self.update();
    }

    /// IFR as the CPU reads it.
    pub fn flags(&self) -> u8 {
        self.ifr
    }

    /// IER as the CPU reads it; bit 7 always reads back set.
    pub fn enables(&self) -> u8 {
        self.ier | INT_REQUEST
    }

    /// Level of the IRQ output.
    pub fn asserted(&self) -> bool {
        self.ifr & INT_REQUEST != 0
    }

    fn update(&mut self) {
        if self.ifr & self.ier & SOURCE_MASK != 0 {
            self.ifr |= INT_REQUEST;
        } else {
            self.ifr &= SOURCE_MASK;
        }
    }
}

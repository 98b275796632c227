//! Sound-chip (AY-3-8912) port bank.
//!
//! The PSG is not memory-mapped: the CPU talks to it through VIA port A
//! (data) with port B bits 3–4 selecting the bus function.  This bank keeps
//! the 16-register mirror the CPU reads back and forwards latched writes to
//! an external `SoundChip`.

use super::bank::Bank;

pub const PSG_REG_COUNT: usize = 16;

/// Register 14 is the I/O port wired to the four controller buttons.
pub const PSG_BUTTONS: u8 = 14;

// ── Port B bus-control field (bits 3–4) ──────────────────────

pub const BUS_MASK: u8 = 0x18;
pub const BUS_INACTIVE: u8 = 0x00;
pub const BUS_READ: u8 = 0x08;
pub const BUS_WRITE: u8 = 0x10;
pub const BUS_LATCH: u8 = 0x18;

/// Trait that an external sound-chip model must implement.
pub trait SoundChip: Send {
    fn start(&mut self);
    fn stop(&mut self);
    fn write(&mut self, reg: u8, value: u8);
}

/// Null chip, swallows everything.
pub struct NullSoundChip;

impl SoundChip for NullSoundChip {
    fn start(&mut self) {}
    fn stop(&mut self) {}
    fn write(&mut self, _reg: u8, _value: u8) {}
}

pub struct PsgBank {
    chip: Box<dyn SoundChip>,
    regs: [u8; PSG_REG_COUNT],
    select: u8,
}

impl PsgBank {
    pub fn new() -> Self {
        Self {
            chip: Box::new(NullSoundChip),
            regs: [0; PSG_REG_COUNT],
            select: 0,
        }
    }

    pub fn set_chip(&mut self, chip: Option<Box<dyn SoundChip>>) {
        self.chip = chip.unwrap_or_else(|| Box::new(NullSoundChip));
    }

    pub fn start(&mut self) {
        self.chip.start();
    }

    pub fn stop(&mut self) {
        self.chip.stop();
    }

    /// Clear every register (forwarding the zeroes), then release all
    /// buttons on the input port.
    pub fn reset(&mut self) {
        for reg in 0..PSG_REG_COUNT as u8 {
            self.poke(reg as u16, 0);
        }
        self.poke(PSG_BUTTONS as u16, 0xFF);
        self.select = 0;
    }

    /// React to a write on either VIA port.  `orb` carries the bus
    /// function, `ora` the data byte.
    pub fn bus_update(&mut self, orb: u8, ora: u8) {
        match orb & BUS_MASK {
            BUS_WRITE => {
                // the input port is driven by the buttons, not the CPU
                if self.select != PSG_BUTTONS {
                    self.poke(self.select as u16, ora);
                }
            }
            BUS_LATCH => {
                if ora & 0xF0 == 0 {
                    self.select = ora & 0x0F;
                }
            }
            _ => {}
        }
    }

    /// Whether the PSG is currently driving port A.
    pub fn drives_port_a(orb: u8) -> bool {
        orb & BUS_MASK == BUS_READ
    }

    /// Value of the currently latched register.
    pub fn selected_value(&self) -> u8 {
        self.regs[self.select as usize]
    }

    pub fn selected(&self) -> u8 {
        self.select
    }

    /// Update one button line on the input port.  Lines are active-low:
    /// a pressed button clears its bit.
    pub fn set_button(&mut self, bit: u8, pressed: bool) {
        let reg = &mut self.regs[PSG_BUTTONS as usize];
        if pressed {
            *reg &= !bit;
        } else {
            *reg |= bit;
        }
    }

    pub fn registers(&self) -> &[u8; PSG_REG_COUNT] {
        &self.regs
    }
}

impl Default for PsgBank {
    fn default() -> Self { Self::new() }
}

impl Bank for PsgBank {
    fn poke(&mut self, address: u16, value: u8) {
        let reg = (address as usize) & (PSG_REG_COUNT - 1);
        self.regs[reg] = value;
        self.chip.write(reg as u8, value);
    }
    fn peek(&self, address: u16) -> u8 {
        self.regs[(address as usize) & (PSG_REG_COUNT - 1)]
    }
}

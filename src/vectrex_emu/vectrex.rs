//! The complete Vectrex machine minus the CPU.
//!
//! Owns the memory banks, VIA, sound-chip port, analog board and vector
//! buffer, and implements [`Bus`] so an external 6809 core can drive it.

use log::debug;

use super::analog::Analog;
use super::banks::*;
use super::mmu::{decode, Mapping};
use super::vectors::VectorBuffer;
use super::via::{Mos6522, Port, PortInputs};
use crate::cpu::Bus;

/// Bus value for addresses nothing decodes.
const OPEN_BUS: u8 = 0xFF;

/// Joystick pot levels.
const POT_MIN: u8 = 0x00;
const POT_CENTER: u8 = 0x80;
const POT_MAX: u8 = 0xFF;

// ── Controls ──────────────────────────────────────────────────

/// Host controls.  Player one is the four buttons on the sound chip's
/// input port; player two is the first joystick's two pots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Pl1Left,
    Pl1Right,
    Pl1Up,
    Pl1Down,
    Pl2Left,
    Pl2Right,
    Pl2Up,
    Pl2Down,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::Pl1Left,
        Key::Pl1Right,
        Key::Pl1Up,
        Key::Pl1Down,
        Key::Pl2Left,
        Key::Pl2Right,
        Key::Pl2Up,
        Key::Pl2Down,
    ];

    /// Host key codes 0–7 in the order above.
    pub fn from_code(code: u8) -> Option<Key> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

// ── Machine ───────────────────────────────────────────────────

pub struct Vectrex {
    // ── Memory ──
    pub rom: SystemRomBank,
    pub cartridge: CartridgeBank,
    pub ram: SystemRamBank,

    // ── Chips ──
    pub via: Mos6522,
    pub psg: PsgBank,
    pub analog: Analog,

    // ── Display ──
    pub vectors: VectorBuffer,

    pub cycle_count: u64,
}

impl Vectrex {
    pub fn new(max_vectors: usize) -> Self {
        Self {
            rom: SystemRomBank::new(),
            cartridge: CartridgeBank::new(),
            ram: SystemRamBank::new(),
            via: Mos6522::new(),
            psg: PsgBank::new(),
            analog: Analog::new(),
            vectors: VectorBuffer::new(max_vectors),
            cycle_count: 0,
        }
    }

    // ── Image loading ─────────────────────────────────────────

    pub fn set_rom(&mut self, image: Option<&[u8]>) {
        self.rom.set(image);
    }

    pub fn set_cartridge(&mut self, image: Option<&[u8]>) {
        self.cartridge.set(image);
    }

    pub fn set_sound_chip(&mut self, chip: Option<Box<dyn SoundChip>>) {
        self.psg.set_chip(chip);
    }

    // ── Reset ─────────────────────────────────────────────────

    /// Power-on state for everything but the CPU and the loaded images.
    pub fn reset(&mut self) {
        self.ram.reset();
        self.via.reset();
        self.analog.reset();
        self.vectors.reset();
        self.psg.reset();
        self.cycle_count = 0;
        debug!(
            "Vectrex reset (rom {} bytes, cartridge {} bytes)",
            self.rom.loaded(),
            self.cartridge.loaded()
        );
    }

    // ── Per-cycle tick ────────────────────────────────────────

    /// One CPU cycle of peripheral time: VIA first half, beam, VIA second
    /// half.
    pub fn tick(&mut self) {
        self.via.step0();
        let lines = self.via.control_lines();
        self.analog.step(lines, &mut self.vectors);
        self.via.step1();
        self.cycle_count += 1;
    }

    pub fn irq_pending(&self) -> bool {
        self.via.irq_pending()
    }

    pub fn vectors(&self) -> &VectorBuffer {
        &self.vectors
    }

    // ── Controls ──────────────────────────────────────────────

    pub fn press(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Pl1Left => self.psg.set_button(0x01, pressed),
            Key::Pl1Right => self.psg.set_button(0x02, pressed),
            Key::Pl1Up => self.psg.set_button(0x04, pressed),
            Key::Pl1Down => self.psg.set_button(0x08, pressed),
            Key::Pl2Left => self.set_pot(0, pressed, POT_MIN),
            Key::Pl2Right => self.set_pot(0, pressed, POT_MAX),
            Key::Pl2Up => self.set_pot(1, pressed, POT_MAX),
            Key::Pl2Down => self.set_pot(1, pressed, POT_MIN),
        }
    }

    fn set_pot(&mut self, channel: usize, pressed: bool, level: u8) {
        self.analog
            .set_joystick(channel, if pressed { level } else { POT_CENTER });
    }

    // ── Port fan-out ──────────────────────────────────────────

    fn port_written(&mut self, port: Port) {
        let (orb, ora) = (self.via.orb, self.via.ora);
        self.psg.bus_update(orb, ora);
        if port == Port::A {
            self.analog.latch_dac(ora);
        }
        self.analog.mux_update(orb);
    }

    fn io_read(&mut self, address: u16) -> u8 {
        let inputs = PortInputs {
            compare: self.analog.compare,
            psg: PsgBank::drives_port_a(self.via.orb).then(|| self.psg.selected_value()),
        };
        self.via.read(Mapping::io_register(address), inputs)
    }
}

impl Default for Vectrex {
    fn default() -> Self {
        Self::new(super::vectors::DEFAULT_MAX_VECTORS)
    }
}

// ── Bus implementation ────────────────────────────────────────

impl Bus for Vectrex {
    fn read8(&mut self, address: u16) -> u8 {
        match decode(address) {
            Mapping::Rom => self.rom.peek(address),
            Mapping::Cartridge => self.cartridge.peek(address),
            Mapping::RamIo { ram: true, .. } => self.ram.peek(address),
            Mapping::RamIo { io: true, .. } => self.io_read(address),
            Mapping::RamIo { .. } | Mapping::Unmapped => OPEN_BUS,
        }
    }

    fn write8(&mut self, address: u16, data: u8) {
        match decode(address) {
            Mapping::RamIo { ram, io } => {
                if ram {
                    self.ram.poke(address, data);
                }
                if io {
                    if let Some(port) = self.via.write(Mapping::io_register(address), data) {
                        self.port_written(port);
                    }
                }
            }
            // ROM, cartridge and open bus ignore writes
            Mapping::Rom | Mapping::Cartridge | Mapping::Unmapped => {}
        }
    }
}

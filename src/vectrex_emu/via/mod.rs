//! MOS 6522 VIA emulation.
//!
//! The VIA contains:
//! - Two 8-bit I/O ports (A feeds the DAC and the sound chip, B carries
//!   the analog mux select, sound-bus control and RAMP)
//! - Two 16-bit timers (T1 free-running/one-shot with PB7 output, T2 one-shot)
//! - An 8-bit shift register whose CB2 output blanks the beam
//! - CA2/CB2 handshake lines (ZERO and BLANK on the Vectrex)
//! - Interrupt flag / enable logic
//!
//! Port side effects (sound-chip latching, DAC sample-and-hold) belong to
//! the rest of the machine and are handled by the caller.

pub mod interrupt;
pub mod shift;
pub mod timer;

use interrupt::InterruptSource;
use shift::ShiftRegister;
use timer::{Timer1, Timer2};

use super::analog::ControlLines;

// ── Register offsets (low 4 bits of address) ──────────────────

pub const ORB: u8 = 0x0;
pub const ORA: u8 = 0x1;
pub const DDRB: u8 = 0x2;
pub const DDRA: u8 = 0x3;
pub const T1CL: u8 = 0x4;
pub const T1CH: u8 = 0x5;
pub const T1LL: u8 = 0x6;
pub const T1LH: u8 = 0x7;
pub const T2CL: u8 = 0x8;
pub const T2CH: u8 = 0x9;
pub const SR: u8 = 0xA;
pub const ACR: u8 = 0xB;
pub const PCR: u8 = 0xC;
pub const IFR: u8 = 0xD;
pub const IER: u8 = 0xE;
pub const ORA_NH: u8 = 0xF;

// ── Interrupt flag bits ───────────────────────────────────────

pub const INT_CA2: u8 = 1 << 0;
pub const INT_CA1: u8 = 1 << 1;
pub const INT_SR: u8 = 1 << 2;
pub const INT_CB2: u8 = 1 << 3;
pub const INT_CB1: u8 = 1 << 4;
pub const INT_T2: u8 = 1 << 5;
pub const INT_T1: u8 = 1 << 6;
pub const INT_REQUEST: u8 = 1 << 7;

// ── ACR fields ────────────────────────────────────────────────

pub const ACR_PB7_T1: u8 = 0x80;
pub const ACR_T1_CONTINUOUS: u8 = 0x40;
pub const ACR_T2_PULSE: u8 = 0x20;
pub const ACR_SR_MODE: u8 = 0x1C;
/// Set in every shift-out mode; hands CB2 to the shift register.
pub const ACR_SR_OUT: u8 = 0x10;

pub const SR_DISABLED: u8 = 0x00;
pub const SR_IN_T2: u8 = 0x04;
pub const SR_IN_PHI2: u8 = 0x08;
pub const SR_IN_CB1: u8 = 0x0C;
pub const SR_OUT_T2_FREE: u8 = 0x10;
pub const SR_OUT_T2: u8 = 0x14;
pub const SR_OUT_PHI2: u8 = 0x18;
pub const SR_OUT_CB1: u8 = 0x1C;

// ── PCR fields ────────────────────────────────────────────────

pub const PCR_CA2_MASK: u8 = 0x0E;
pub const PCR_CA2_HANDSHAKE: u8 = 0x08;
pub const PCR_CA2_PULSE: u8 = 0x0A;
pub const PCR_CA2_LOW: u8 = 0x0C;

pub const PCR_CB2_MASK: u8 = 0xE0;
pub const PCR_CB2_HANDSHAKE: u8 = 0x80;
pub const PCR_CB2_PULSE: u8 = 0xA0;
pub const PCR_CB2_LOW: u8 = 0xC0;

/// Port B bits the VIA overrides on read.
const PB5_COMPARE: u8 = 0x20;
const PB7: u8 = 0x80;

/// Which output port a register write landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    A,
    B,
}

/// External levels seen by the port input buffers during a read.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortInputs {
    /// Comparator output on PB5, `0x00` or `0x20`.
    pub compare: u8,
    /// The sound chip's data bus when it is driving port A.
    pub psg: Option<u8>,
}

// ── MOS6522 ───────────────────────────────────────────────────

/// Complete VIA chip.
#[derive(Debug, Clone)]
pub struct Mos6522 {
    pub ora: u8,
    pub orb: u8,
    pub ddra: u8,
    pub ddrb: u8,
    pub acr: u8,
    pub pcr: u8,

    pub timer1: Timer1,
    pub timer2: Timer2,
    pub shift: ShiftRegister,
    pub interrupt: InterruptSource,

    /// CA2 output level (ZERO, active low).
    pub ca2: bool,
    /// CB2 output level under PCR control (BLANK when the SR is not
    /// driving CB2).
    pub cb2: bool,
}

impl Mos6522 {
    pub fn new() -> Self {
        Self {
            ora: 0,
            orb: 0,
            ddra: 0,
            ddrb: 0,
            acr: 0,
            pcr: 0,
            timer1: Timer1::new(),
            timer2: Timer2::new(),
            shift: ShiftRegister::new(),
            interrupt: InterruptSource::new(),
            ca2: true,
            cb2: true,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Read a VIA register.  Several reads have side effects (timer and SR
    /// acknowledge, CA2 handshake).
    pub fn read(&mut self, reg: u8, inputs: PortInputs) -> u8 {
        match reg & 0x0F {
            ORB => self.port_b_input(inputs.compare),
            ORA => {
                if self.pcr & PCR_CA2_MASK == PCR_CA2_HANDSHAKE {
                    self.ca2 = false;
                }
                inputs.psg.unwrap_or(self.ora)
            }
            DDRB => self.ddrb,
            DDRA => self.ddra,
            T1CL => {
                let lo = self.timer1.read_counter_lo();
                self.interrupt.clear(INT_T1);
                lo
            }
            T1CH => self.timer1.counter_hi(),
            T1LL => self.timer1.latch_lo,
            T1LH => self.timer1.latch_hi,
            T2CL => {
                let lo = self.timer2.read_counter_lo();
                self.interrupt.clear(INT_T2);
                lo
            }
            T2CH => self.timer2.counter_hi(),
            SR => {
                let value = self.shift.value;
                self.interrupt.clear(INT_SR);
                self.shift.restart();
                value
            }
            ACR => self.acr,
            PCR => self.pcr,
            IFR => self.interrupt.flags(),
            IER => self.interrupt.enables(),
            // ORA_NH: no handshake
            _ => inputs.psg.unwrap_or(self.ora),
        }
    }

    /// Write a VIA register.  Returns the output port that changed, if
    /// any, so the caller can propagate it to the attached hardware.
    pub fn write(&mut self, reg: u8, data: u8) -> Option<Port> {
        match reg & 0x0F {
            ORB => {
                self.orb = data;
                if self.pcr & PCR_CB2_MASK == PCR_CB2_HANDSHAKE {
                    self.cb2 = false;
                }
                return Some(Port::B);
            }
            ORA => {
                if self.pcr & PCR_CA2_MASK == PCR_CA2_HANDSHAKE {
                    self.ca2 = false;
                }
                self.ora = data;
                return Some(Port::A);
            }
            ORA_NH => {
                self.ora = data;
                return Some(Port::A);
            }
            DDRB => self.ddrb = data,
            DDRA => self.ddra = data,
            // the low counter byte is a latch write on the 6522
            T1CL | T1LL => self.timer1.latch_lo = data,
            T1CH => {
                self.timer1.start(data);
                self.interrupt.clear(INT_T1);
            }
            T1LH => self.timer1.latch_hi = data,
            T2CL => self.timer2.latch_lo = data,
            T2CH => {
                self.timer2.start(data);
                self.interrupt.clear(INT_T2);
            }
            SR => {
                self.shift.value = data;
                self.interrupt.clear(INT_SR);
                self.shift.restart();
            }
            ACR => self.acr = data,
            PCR => {
                self.pcr = data;
                self.ca2 = data & PCR_CA2_MASK != PCR_CA2_LOW;
                self.cb2 = data & PCR_CB2_MASK != PCR_CB2_LOW;
            }
            IFR => self.interrupt.clear(data),
            _ => self.interrupt.set_mask(data), // IER
        }
        None
    }

    /// First half of a cycle: timers and shift register.
    pub fn step0(&mut self) {
        if self.timer1.tick(self.acr & ACR_T1_CONTINUOUS != 0) {
            self.interrupt.trigger(INT_T1);
        }

        if self.timer2.tick(self.acr & ACR_T2_PULSE != 0) {
            self.interrupt.trigger(INT_T2);
        }

        if self.shift.tick(self.acr, self.timer2.latch_lo) {
            self.interrupt.trigger(INT_SR);
        }
    }

    /// Second half of a cycle: pulse-mode CA2/CB2 return high.
    pub fn step1(&mut self) {
        if self.pcr & PCR_CA2_MASK == PCR_CA2_PULSE {
            self.ca2 = true;
        }
        if self.pcr & PCR_CB2_MASK == PCR_CB2_PULSE {
            self.cb2 = true;
        }
    }

    /// Level of the IRQ output.
    pub fn irq_pending(&self) -> bool {
        self.interrupt.asserted()
    }

    /// Signals the VIA presents to the analog board this cycle.
    pub fn control_lines(&self) -> ControlLines {
        let beam_on = if self.acr & ACR_SR_OUT != 0 {
            self.shift.cb2() != 0
        } else {
            self.cb2
        };

        let ramp_hold = if self.acr & ACR_PB7_T1 != 0 {
            self.timer1.pb7() != 0
        } else {
            self.orb & PB7 != 0
        };

        ControlLines {
            beam_on,
            zero: !self.ca2,
            ramp_hold,
        }
    }

    fn port_b_input(&self, compare: u8) -> u8 {
        // PB5 is an input wired to the comparator
        if self.acr & ACR_PB7_T1 != 0 {
            (self.orb & !(PB7 | PB5_COMPARE)) | self.timer1.pb7() | compare
        } else {
            (self.orb & !PB5_COMPARE) | compare
        }
    }
}

impl Default for Mos6522 {
    fn default() -> Self {
        Self::new()
    }
}

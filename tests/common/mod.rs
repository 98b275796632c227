#![allow(dead_code)]

use vectrex_core::{Bus, Cpu, Renderer, ScreenLine};

pub const ROM_BASE: u16 = 0xE000;
pub const RESET_VECTOR: u16 = 0xFFFE;

pub const OP_STI: u8 = 0x01;
pub const OP_NOP: u8 = 0x12;
pub const OP_JMP: u8 = 0x7E;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Three-opcode decoder, enough to poke the hardware from a ROM image:
///
/// - `01 hi lo val`  store immediate, 5 cycles
/// - `7E hi lo`      jump, 4 cycles
/// - `12`            no-op, 2 cycles
///
/// Anything else is treated as a no-op and counted.
#[derive(Debug, Default)]
pub struct ToyCpu {
    pub pc: u16,
    pub steps: u64,
    pub resets: u32,
    pub irq_steps: u64,
    pub first_irq_step: Option<u64>,
    pub unknown: u64,
}

impl Cpu for ToyCpu {
    fn reset<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        self.pc = bus.read16(RESET_VECTOR);
        self.resets += 1;
    }

    fn step<B: Bus + ?Sized>(&mut self, bus: &mut B, irq: bool, _firq: bool) -> u32 {
        self.steps += 1;
        if irq {
            self.irq_steps += 1;
            if self.first_irq_step.is_none() {
                self.first_irq_step = Some(self.steps);
            }
        }

        match bus.read8(self.pc) {
            OP_STI => {
                let addr = bus.read16(self.pc.wrapping_add(1));
                let value = bus.read8(self.pc.wrapping_add(3));
                bus.write8(addr, value);
                self.pc = self.pc.wrapping_add(4);
                5
            }
            OP_JMP => {
                self.pc = bus.read16(self.pc.wrapping_add(1));
                4
            }
            op => {
                if op != OP_NOP {
                    self.unknown += 1;
                }
                self.pc = self.pc.wrapping_add(1);
                2
            }
        }
    }
}

/// Assembles a system ROM image with the reset vector at `$E000`.
pub struct RomBuilder {
    code: Vec<u8>,
}

impl RomBuilder {
    pub fn new() -> Self {
        Self { code: Vec::new() }
    }

    /// Address of the next instruction.
    pub fn here(&self) -> u16 {
        ROM_BASE + self.code.len() as u16
    }

    pub fn sti(mut self, addr: u16, value: u8) -> Self {
        self.code.extend_from_slice(&[OP_STI, (addr >> 8) as u8, addr as u8, value]);
        self
    }

    pub fn jmp(mut self, addr: u16) -> Self {
        self.code.extend_from_slice(&[OP_JMP, (addr >> 8) as u8, addr as u8]);
        self
    }

    pub fn nop(mut self) -> Self {
        self.code.push(OP_NOP);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut rom = vec![OP_NOP; 0x2000];
        rom[..self.code.len()].copy_from_slice(&self.code);
        rom[0x1FFE] = (ROM_BASE >> 8) as u8;
        rom[0x1FFF] = ROM_BASE as u8;
        rom
    }
}

/// Program that draws one horizontal line from the screen centre, 50
/// units long at intensity 64, over and over:
///
/// ```text
///   PCR  <- CC    ZERO + BLANK
///   ORB  <- 04    mux: intensity
///   ORA  <- 40    Z = 64
///   ORB  <- 05    mux off
///   ORA  <- 0A    X rate = 10/cycle
/// loop:
///   PCR  <- EE    beam on for one STI (5 cycles)
///   PCR  <- CC
///   JMP  loop
/// ```
pub fn line_program() -> Vec<u8> {
    let setup = RomBuilder::new()
        .sti(0xD00C, 0xCC)
        .sti(0xD000, 0x04)
        .sti(0xD001, 0x40)
        .sti(0xD000, 0x05)
        .sti(0xD001, 0x0A);
    let top = setup.here();
    setup.sti(0xD00C, 0xEE).sti(0xD00C, 0xCC).jmp(top).build()
}

#[derive(Debug, Default)]
pub struct Frames {
    current: Vec<ScreenLine>,
    pub passes: Vec<Vec<ScreenLine>>,
}

impl Renderer for Frames {
    fn draw(&mut self, line: ScreenLine) {
        self.current.push(line);
    }

    fn end_frame(&mut self) {
        self.passes.push(std::mem::take(&mut self.current));
    }
}

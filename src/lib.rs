//! Vectrex emulation core.
//!
//! The crate models the machine around the CPU; a 6809 core plugs in
//! through [`cpu::Cpu`] and sees the hardware through [`cpu::Bus`].  The
//! host drives [`Emulator::frame`] once per display frame and receives
//! line segments through a [`Renderer`].

pub mod config;
pub mod cpu;
pub mod emulator;
pub mod error;
pub mod runner;
pub mod vectrex_emu;

pub use config::MachineConfig;
pub use cpu::{Bus, Cpu};
pub use emulator::Emulator;
pub use error::{Error, Result};
pub use vectrex_emu::banks::{NullSoundChip, SoundChip};
pub use vectrex_emu::display::{LineCollector, Renderer, ScreenLine, Viewport};
pub use vectrex_emu::scheduler::RunState;
pub use vectrex_emu::vectors::Vector;
pub use vectrex_emu::vectrex::{Key, Vectrex};

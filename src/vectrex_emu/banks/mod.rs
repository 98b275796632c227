//! Memory bank abstractions.
//!
//! The Vectrex decodes its 64 KB address space into a handful of fixed
//! windows.  Each buffer behind a window is a "bank" that can be read
//! (`peek`) and written (`poke`).  The sound chip hangs off the VIA rather
//! than the address bus but keeps the same register-bank shape.

pub mod bank;
pub mod psg_bank;
pub mod system_ram;
pub mod system_rom;

pub use bank::Bank;
pub use psg_bank::{NullSoundChip, PsgBank, SoundChip};
pub use system_ram::SystemRamBank;
pub use system_rom::{CartridgeBank, SystemRomBank};

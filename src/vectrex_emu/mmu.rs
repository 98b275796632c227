//! Vectrex address decoder: maps the CPU's 64 KB address space onto the
//! cartridge, system ROM, RAM and VIA.
//!
//! ```text
//! $0000-$7FFF  cartridge
//! $8000-$BFFF  unmapped (reads $FF)
//! $C000-$DFFF  RAM when A11 is set, VIA when A12 is set (both may be!)
//! $E000-$FFFF  system ROM
//! ```

const WINDOW_MASK: u16 = 0xE000;
const ROM_WINDOW: u16 = 0xE000;
const RAM_IO_WINDOW: u16 = 0xC000;
const CARTRIDGE_END: u16 = 0x8000;

const RAM_SELECT: u16 = 0x0800;
const IO_SELECT: u16 = 0x1000;

/// Which bank(s) a bus address selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    Rom,
    Cartridge,
    /// The RAM/VIA window.  The two chip selects are independent address
    /// lines, so a single access can hit both.
    RamIo { ram: bool, io: bool },
    Unmapped,
}

impl Mapping {
    /// VIA register slot addressed by the low nibble.
    pub fn io_register(address: u16) -> u8 {
        (address & 0x0F) as u8
    }
}

/// Decode a bus address.  Total over the 16-bit range.
pub fn decode(address: u16) -> Mapping {
    match address & WINDOW_MASK {
        ROM_WINDOW => Mapping::Rom,
        RAM_IO_WINDOW => {
            let ram = address & RAM_SELECT != 0;
            let io = address & IO_SELECT != 0;
            if ram || io {
                Mapping::RamIo { ram, io }
            } else {
                Mapping::Unmapped
            }
        }
        _ if address < CARTRIDGE_END => Mapping::Cartridge,
        _ => Mapping::Unmapped,
    }
}

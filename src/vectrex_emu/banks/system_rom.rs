//! Read-only image banks: the 8 KiB system ROM and the 32 KiB cartridge.
//!
//! Writes are silently ignored.  Images shorter than their window leave
//! the tail zero-filled; longer images are truncated.

use super::bank::Bank;

pub const ROM_SIZE: usize = 0x2000;
pub const CARTRIDGE_SIZE: usize = 0x8000;

// ── Generic ROM helper ────────────────────────────────────────

fn mask(size: usize, addr: u16) -> usize {
    (addr as usize) & (size - 1)
}

/// Copy `source` into `dest`, zero-filling the remainder.
/// Returns the number of bytes dropped from an oversized image.
fn fill(dest: &mut [u8], source: Option<&[u8]>) -> usize {
    dest.fill(0);
    match source {
        Some(data) => {
            let len = data.len().min(dest.len());
            dest[..len].copy_from_slice(&data[..len]);
            data.len() - len
        }
        None => 0,
    }
}

// ── System ROM ($E000-$FFFF, 8 KB) ────────────────────────────

pub struct SystemRomBank {
    rom: Box<[u8; ROM_SIZE]>,
    loaded: usize,
}

impl SystemRomBank {
    pub fn new() -> Self {
        Self {
            rom: Box::new([0; ROM_SIZE]),
            loaded: 0,
        }
    }

    /// Load the executive ROM image.  `None` or an empty slice leaves the
    /// bank all-zero.
    pub fn set(&mut self, source: Option<&[u8]>) {
        let dropped = fill(&mut self.rom[..], source);
        self.loaded = source.map_or(0, |d| d.len().min(ROM_SIZE));
        if dropped > 0 {
            log::warn!("system ROM image is {} bytes too long, truncated", dropped);
        } else if self.loaded < ROM_SIZE {
            log::warn!(
                "system ROM image is {} bytes (expected {}), tail reads as zero",
                self.loaded,
                ROM_SIZE
            );
        }
    }

    /// Number of image bytes actually installed.
    pub fn loaded(&self) -> usize {
        self.loaded
    }
}

impl Default for SystemRomBank {
    fn default() -> Self { Self::new() }
}

impl Bank for SystemRomBank {
    fn poke(&mut self, _address: u16, _value: u8) { /* read-only */ }
    fn peek(&self, address: u16) -> u8 {
        self.rom[mask(ROM_SIZE, address)]
    }
}

// ── Cartridge ($0000-$7FFF, up to 32 KB) ─────────────────────

pub struct CartridgeBank {
    rom: Box<[u8; CARTRIDGE_SIZE]>,
    loaded: usize,
}

impl CartridgeBank {
    pub fn new() -> Self {
        Self {
            rom: Box::new([0; CARTRIDGE_SIZE]),
            loaded: 0,
        }
    }

    /// Insert a cartridge image.  `None` or an empty slice means no
    /// cartridge; the slot then reads as zero.
    pub fn set(&mut self, source: Option<&[u8]>) {
        let dropped = fill(&mut self.rom[..], source);
        self.loaded = source.map_or(0, |d| d.len().min(CARTRIDGE_SIZE));
        if dropped > 0 {
            log::warn!("cartridge image is {} bytes too long, truncated", dropped);
        }
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }
}

impl Default for CartridgeBank {
    fn default() -> Self { Self::new() }
}

impl Bank for CartridgeBank {
    fn poke(&mut self, _address: u16, _value: u8) { /* read-only */ }
    fn peek(&self, address: u16) -> u8 {
        self.rom[mask(CARTRIDGE_SIZE, address)]
    }
}

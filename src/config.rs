// Machine configuration: clock, phosphor decay rate, host frame period and
// draw-list capacity. Stored as JSON; missing fields get defaults.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CLOCK_HZ: u32 = 1_500_000;
pub const DEFAULT_PHOSPHOR_DECAY_HZ: u32 = 30;
pub const DEFAULT_FRAME_MS: u32 = 25;

/// Lowest clock that still gives a whole number of cycles per millisecond.
const MIN_CLOCK_HZ: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// CPU clock in Hz.
    pub clock_hz: u32,
    /// Render passes per emulated second.
    pub phosphor_decay_hz: u32,
    /// Host frame period; one `frame()` call covers this much machine time.
    pub frame_ms: u32,
    /// Draw-list capacity.  Segments beyond it are dropped for the pass.
    pub max_vectors: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            phosphor_decay_hz: DEFAULT_PHOSPHOR_DECAY_HZ,
            frame_ms: DEFAULT_FRAME_MS,
            max_vectors: (DEFAULT_CLOCK_HZ / DEFAULT_PHOSPHOR_DECAY_HZ) as usize,
        }
    }
}

impl MachineConfig {
    /// Parse and validate a JSON document.  Unknown fields are ignored.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load from disk, or return defaults if missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Cannot load config {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // a struct of plain integers always serializes
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.clock_hz < MIN_CLOCK_HZ {
            return Err(Error::InvalidConfig(format!(
                "clock_hz must be at least {MIN_CLOCK_HZ}, got {}",
                self.clock_hz
            )));
        }
        if self.phosphor_decay_hz == 0 {
            return Err(Error::InvalidConfig("phosphor_decay_hz must be non-zero".into()));
        }
        if self.frame_ms == 0 {
            return Err(Error::InvalidConfig("frame_ms must be non-zero".into()));
        }
        if self.max_vectors == 0 {
            return Err(Error::InvalidConfig("max_vectors must be non-zero".into()));
        }
        Ok(())
    }

    /// Machine cycles emulated per host frame.
    pub fn cycles_per_frame(&self) -> i64 {
        (self.clock_hz / 1000) as i64 * self.frame_ms as i64
    }

    /// Machine cycles between render passes.
    pub fn decay_cycles(&self) -> i64 {
        (self.clock_hz / self.phosphor_decay_hz.max(1)) as i64
    }
}

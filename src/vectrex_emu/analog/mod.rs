//! Vectrex analog board.
//!
//! Port A drives a DAC whose output is held on the X sample-and-hold and,
//! through a 4-way demultiplexer selected by port B, copied onto the Y,
//! zero-reference and intensity (Z) sample-and-holds.  The integrators
//! turn `X - ref` and `ref - Y` into beam velocities; the same mux routes
//! one of four joystick pots to a comparator against the DAC.

pub mod beam;

use beam::{Beam, VectorSink};

/// Logical coordinate bounds of the screen (bus-native units).
pub const ALG_MAX_X: i64 = 33000;
pub const ALG_MAX_Y: i64 = 41000;

/// Port B bit 0: demultiplexer enable, active low.
const MUX_DISABLE: u8 = 0x01;
/// Port B bits 1–2: demultiplexer / joystick mux channel.
const MUX_SELECT: u8 = 0x06;

const MUX_Y: u8 = 0x00;
const MUX_REF: u8 = 0x02;
const MUX_Z: u8 = 0x04;

const SAMPLE_CENTER: u8 = 0x80;
const COMPARE_HIGH: u8 = 0x20;

/// Signals the VIA presents to the analog board on a given cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlLines {
    /// BLANK released: the beam is visible.
    pub beam_on: bool,
    /// ZERO asserted: the integrators discharge toward the screen centre.
    pub zero: bool,
    /// RAMP released: the integrators hold the beam still.
    pub ramp_hold: bool,
}

#[derive(Debug, Clone)]
pub struct Analog {
    /// Zero-reference sample-and-hold.
    pub rsh: u8,
    pub xsh: u8,
    pub ysh: u8,
    /// Intensity sample-and-hold, 0–127.
    pub zsh: u8,
    /// Joystick pot channels.
    pub jch: [u8; 4],
    /// Joystick channel currently routed to the comparator.
    pub jsh: u8,
    /// Comparator output as seen on PB5, `0x00` or `0x20`.
    pub compare: u8,

    pub dx: i64,
    pub dy: i64,

    pub beam: Beam,
}

impl Analog {
    pub fn new() -> Self {
        Self {
            rsh: SAMPLE_CENTER,
            xsh: SAMPLE_CENTER,
            ysh: SAMPLE_CENTER,
            zsh: 0,
            jch: [SAMPLE_CENTER; 4],
            jsh: SAMPLE_CENTER,
            compare: 0,
            dx: 0,
            dy: 0,
            beam: Beam::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Port A feeds the DAC; its output lands on the X sample-and-hold
    /// with the sign bit flipped (two's complement to offset binary).
    pub fn latch_dac(&mut self, ora: u8) {
        self.xsh = ora ^ 0x80;
    }

    /// Re-evaluate the demultiplexer, comparator and integrator inputs
    /// after either VIA port changed.
    pub fn mux_update(&mut self, orb: u8) {
        let demux_on = orb & MUX_DISABLE == 0;

        match orb & MUX_SELECT {
            MUX_Y => {
                self.jsh = self.jch[0];
                if demux_on {
                    self.ysh = self.xsh;
                }
            }
            MUX_REF => {
                self.jsh = self.jch[1];
                if demux_on {
                    self.rsh = self.xsh;
                }
            }
            MUX_Z => {
                self.jsh = self.jch[2];
                if demux_on {
                    self.zsh = self.xsh.saturating_sub(SAMPLE_CENTER);
                }
            }
            // sound output line
            _ => self.jsh = self.jch[3],
        }

        self.compare = if self.jsh > self.xsh { COMPARE_HIGH } else { 0 };

        self.dx = self.xsh as i64 - self.rsh as i64;
        self.dy = self.rsh as i64 - self.ysh as i64;
    }

    /// Snap a joystick pot to a new position.  The comparator picks the
    /// value up on the next mux update.
    pub fn set_joystick(&mut self, channel: usize, value: u8) {
        if let Some(ch) = self.jch.get_mut(channel) {
            *ch = value;
        }
    }

    /// One cycle of beam movement.
    pub fn step<S: VectorSink + ?Sized>(&mut self, lines: ControlLines, sink: &mut S) {
        self.beam.step(lines, self.dx, self.dy, self.zsh, sink);
    }
}

impl Default for Analog {
    fn default() -> Self {
        Self::new()
    }
}

//! Beam integrator and vector capture.
//!
//! The beam advances by the integrator deltas every cycle.  While BLANK is
//! released the generator tracks a candidate segment; any change in the
//! deltas or intensity, or the beam going dark, commits the candidate.

use super::{ControlLines, ALG_MAX_X, ALG_MAX_Y};
use crate::vectrex_emu::vectors::Vector;

pub const CENTER_X: i64 = ALG_MAX_X / 2;
pub const CENTER_Y: i64 = ALG_MAX_Y / 2;

/// Receives committed segments.
pub trait VectorSink {
    fn commit(&mut self, vector: Vector);
}

impl VectorSink for Vec<Vector> {
    fn commit(&mut self, vector: Vector) {
        self.push(vector);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
    dx: i64,
    dy: i64,
    color: u8,
}

impl Candidate {
    fn at(x: i64, y: i64, dx: i64, dy: i64, color: u8) -> Self {
        Self { x0: x, y0: y, x1: x, y1: y, dx, dy, color }
    }

    fn vector(&self) -> Vector {
        Vector {
            x0: self.x0,
            y0: self.y0,
            x1: self.x1,
            y1: self.y1,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Vectoring(Candidate),
}

#[derive(Debug, Clone)]
pub struct Beam {
    x: i64,
    y: i64,
    state: State,
}

impl Beam {
    pub fn new() -> Self {
        Self {
            x: CENTER_X,
            y: CENTER_Y,
            state: State::Idle,
        }
    }

    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    pub fn is_vectoring(&self) -> bool {
        matches!(self.state, State::Vectoring(_))
    }

    pub fn in_range(&self) -> bool {
        (0..ALG_MAX_X).contains(&self.x) && (0..ALG_MAX_Y).contains(&self.y)
    }

    /// Advance one cycle.  `dx`/`dy` are the integrator inputs and
    /// `intensity` the Z sample-and-hold.
    pub fn step<S: VectorSink + ?Sized>(
        &mut self,
        lines: ControlLines,
        dx: i64,
        dy: i64,
        intensity: u8,
        sink: &mut S,
    ) {
        let (sig_dx, sig_dy) = if lines.zero {
            (CENTER_X - self.x, CENTER_Y - self.y)
        } else if lines.ramp_hold {
            (0, 0)
        } else {
            (dx, dy)
        };

        let in_range = self.in_range();

        self.state = match self.state {
            State::Idle if lines.beam_on && in_range => {
                State::Vectoring(Candidate::at(self.x, self.y, sig_dx, sig_dy, intensity))
            }
            State::Idle => State::Idle,
            State::Vectoring(c) if !lines.beam_on || !in_range => {
                sink.commit(c.vector());
                State::Idle
            }
            State::Vectoring(c) if c.dx != sig_dx || c.dy != sig_dy || c.color != intensity => {
                sink.commit(c.vector());
                State::Vectoring(Candidate::at(self.x, self.y, sig_dx, sig_dy, intensity))
            }
            vectoring => vectoring,
        };

        self.x += sig_dx;
        self.y += sig_dy;

        if self.in_range() {
            if let State::Vectoring(ref mut c) = self.state {
                c.x1 = self.x;
                c.y1 = self.y;
            }
        }
    }
}

impl Default for Beam {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LIT: ControlLines = ControlLines {
        beam_on: true,
        zero: false,
        ramp_hold: false,
    };
    const DARK: ControlLines = ControlLines {
        beam_on: false,
        zero: false,
        ramp_hold: false,
    };

    #[test]
    fn test_idle_beam_moves_without_drawing() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        for _ in 0..3 {
            beam.step(DARK, 10, -5, 64, &mut out);
        }
        assert!(out.is_empty());
        assert_eq!(beam.position(), (CENTER_X + 30, CENTER_Y - 15));
    }

    #[test]
    fn test_segment_committed_on_blank() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        for _ in 0..4 {
            beam.step(LIT, 10, 0, 64, &mut out);
        }
        assert!(beam.is_vectoring());
        beam.step(DARK, 10, 0, 64, &mut out);
        assert_eq!(
            out,
            vec![Vector { x0: CENTER_X, y0: CENTER_Y, x1: CENTER_X + 40, y1: CENTER_Y, color: 64 }]
        );
    }

    #[test]
    fn test_delta_change_splits_segment() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        beam.step(LIT, 10, 0, 64, &mut out);
        beam.step(LIT, 10, 0, 64, &mut out);
        beam.step(LIT, 0, 10, 64, &mut out);
        beam.step(DARK, 0, 10, 64, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].x1, out[0].y1), (CENTER_X + 20, CENTER_Y));
        assert_eq!((out[1].x0, out[1].y0), (CENTER_X + 20, CENTER_Y));
        assert_eq!((out[1].x1, out[1].y1), (CENTER_X + 20, CENTER_Y + 10));
    }

    #[test]
    fn test_intensity_change_splits_segment() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        beam.step(LIT, 1, 0, 64, &mut out);
        beam.step(LIT, 1, 0, 100, &mut out);
        beam.step(DARK, 1, 0, 100, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].color, 64);
        assert_eq!(out[1].color, 100);
    }

    #[test]
    fn test_ramp_hold_draws_a_dot() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        let held = ControlLines { ramp_hold: true, ..LIT };
        beam.step(held, 50, 50, 127, &mut out);
        beam.step(DARK, 50, 50, 127, &mut out);
        assert_eq!(
            out,
            vec![Vector { x0: CENTER_X, y0: CENTER_Y, x1: CENTER_X, y1: CENTER_Y, color: 127 }]
        );
    }

    #[test]
    fn test_zero_recentres_in_one_step() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        beam.step(DARK, 100, 200, 0, &mut out);
        let zero = ControlLines { zero: true, ..DARK };
        beam.step(zero, 100, 200, 0, &mut out);
        assert_eq!(beam.position(), (CENTER_X, CENTER_Y));
    }

    #[test]
    fn test_leaving_range_freezes_endpoint() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        // three cycles take the beam from centre past the right edge
        for _ in 0..3 {
            beam.step(LIT, 7000, 0, 32, &mut out);
        }
        assert!(!beam.in_range());
        beam.step(LIT, 7000, 0, 32, &mut out);
        assert!(!beam.is_vectoring());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].x1, CENTER_X + 14000);
    }

    #[test]
    fn test_out_of_range_beam_cannot_start() {
        let mut beam = Beam::new();
        let mut out = Vec::new();
        beam.step(DARK, -20000, 0, 32, &mut out);
        beam.step(LIT, 0, 0, 32, &mut out);
        assert!(!beam.is_vectoring());
        assert!(out.is_empty());
    }

    fn lines() -> impl Strategy<Value = ControlLines> {
        (any::<bool>(), prop::bool::weighted(0.05), any::<bool>()).prop_map(
            |(beam_on, zero, ramp_hold)| ControlLines { beam_on, zero, ramp_hold },
        )
    }

    proptest! {
        #[test]
        fn prop_committed_endpoints_stay_on_screen(
            steps in prop::collection::vec((lines(), -128i64..128, -128i64..128, 0u8..128), 1..400),
            scale in 1i64..200,
        ) {
            let mut beam = Beam::new();
            let mut out = Vec::new();
            for (l, dx, dy, z) in steps {
                let was_in_range = beam.in_range();
                beam.step(l, dx * scale, dy * scale, z, &mut out);
                if !was_in_range {
                    prop_assert!(!beam.is_vectoring());
                }
            }
            for v in &out {
                prop_assert!((0..ALG_MAX_X).contains(&v.x0) && (0..ALG_MAX_X).contains(&v.x1));
                prop_assert!((0..ALG_MAX_Y).contains(&v.y0) && (0..ALG_MAX_Y).contains(&v.y1));
            }
        }
    }
}

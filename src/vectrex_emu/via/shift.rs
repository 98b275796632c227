//! VIA shift register.
//!
//! An 8-bit register clocked either by PHI2 or by a divider that reloads
//! from the low byte of the Timer 2 latch and toggles a clock phase on
//! every underflow.  In the output modes the bit leaving bit 7 is driven
//! onto CB2 and rotated back into bit 0; the Vectrex uses that CB2 output
//! as the beam blanking signal while drawing patterns.

use super::{ACR_SR_MODE, SR_IN_PHI2, SR_IN_T2, SR_OUT_PHI2, SR_OUT_T2, SR_OUT_T2_FREE};

const BITS_PER_SHIFT: u8 = 8;

#[derive(Debug, Clone)]
pub struct ShiftRegister {
    pub value: u8,
    /// Bits shifted since the last SR access; 8 means idle.
    bits: u8,
    divider: u8,
    phase: bool,
    /// Level last shifted out onto CB2, `0` or `1`.
    cb2: u8,
}

impl ShiftRegister {
    pub fn new() -> Self {
        Self {
            value: 0,
            bits: BITS_PER_SHIFT,
            divider: 0,
            phase: false,
            cb2: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Any CPU access to the SR starts a new 8-bit sequence.
    pub fn restart(&mut self) {
        self.bits = 0;
        self.phase = true;
    }

    pub fn cb2(&self) -> u8 {
        self.cb2
    }

    pub fn bits_shifted(&self) -> u8 {
        self.bits
    }

    /// Advance one PHI2 cycle.  Returns `true` when the eighth bit has
    /// just been shifted.
    pub fn tick(&mut self, acr: u8, t2_latch_lo: u8) -> bool {
        self.divider = self.divider.wrapping_sub(1);
        let t2_edge = if self.divider == 0xFF {
            self.divider = t2_latch_lo;
            let edge = self.phase;
            self.phase = !self.phase;
            edge
        } else {
            false
        };

        if self.bits >= BITS_PER_SHIFT {
            return false;
        }

        match acr & ACR_SR_MODE {
            SR_IN_T2 if t2_edge => self.shift_in(),
            SR_IN_PHI2 => self.shift_in(),
            // free-running output never completes
            SR_OUT_T2_FREE if t2_edge => self.rotate_out(),
            SR_OUT_T2 if t2_edge => {
                self.rotate_out();
                self.bits += 1;
            }
            SR_OUT_PHI2 => {
                self.rotate_out();
                self.bits += 1;
            }
            // disabled, or clocked by CB1 which nothing drives
            _ => {}
        }

        self.bits == BITS_PER_SHIFT
    }

    /// CB2 is an output on the Vectrex, so input modes shift in zeroes.
    fn shift_in(&mut self) {
        self.value <<= 1;
        self.bits += 1;
    }

    fn rotate_out(&mut self) {
        self.cb2 = self.value >> 7;
        self.value = (self.value << 1) | self.cb2;
    }
}

impl Default for ShiftRegister {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_after_reset() {
        let mut sr = ShiftRegister::new();
        for _ in 0..100 {
            assert!(!sr.tick(SR_OUT_PHI2, 0));
        }
        assert_eq!(sr.value, 0);
    }

    #[test]
    fn test_phi2_output_pattern() {
        let mut sr = ShiftRegister::new();
        sr.value = 0xA5;
        sr.restart();

        let mut levels = Vec::new();
        let mut done_at = None;
        for cycle in 1..=8 {
            if sr.tick(SR_OUT_PHI2, 0) {
                done_at = Some(cycle);
            }
            levels.push(sr.cb2());
        }

        assert_eq!(levels, vec![1, 0, 1, 0, 0, 1, 0, 1]);
        assert_eq!(done_at, Some(8));
        assert_eq!(sr.value, 0xA5);
        assert!(!sr.tick(SR_OUT_PHI2, 0));
    }

    #[test]
    fn test_t2_clocked_output_runs_at_divided_rate() {
        let mut sr = ShiftRegister::new();
        sr.value = 0xFF;
        sr.restart();

        // latch 1: the divider underflows every 2 cycles, and only every
        // other underflow is a shifting edge
        let done = (1..=64).find(|_| sr.tick(SR_OUT_T2, 1));
        assert_eq!(done, Some(29));
    }

    #[test]
    fn test_phi2_input_shifts_zeroes() {
        let mut sr = ShiftRegister::new();
        sr.value = 0xFF;
        sr.restart();
        for _ in 0..3 {
            sr.tick(SR_IN_PHI2, 0);
        }
        assert_eq!(sr.value, 0xF8);
        assert_eq!(sr.bits_shifted(), 3);
    }

    #[test]
    fn test_free_run_never_completes() {
        let mut sr = ShiftRegister::new();
        sr.value = 0x80;
        sr.restart();
        for _ in 0..1000 {
            assert!(!sr.tick(SR_OUT_T2_FREE, 0));
        }
        assert_eq!(sr.bits_shifted(), 0);
    }
}

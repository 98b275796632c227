//! VIA interval timers.
//!
//! Timer 1 counts PHI2 cycles in one-shot or free-running mode and can
//! drive PB7 (the Vectrex RAMP line).  Timer 2 is one-shot only and can be
//! parked by the pulse-counting mode, which the Vectrex never clocks.
//!
//! Both counters underflow from $0000 to $FFFF, so a latch value of `L`
//! fires every `L + 1` cycles.

const PB7_HIGH: u8 = 0x80;

#[derive(Debug, Clone)]
pub struct Timer1 {
    pub counter: u16,
    pub latch_lo: u8,
    pub latch_hi: u8,
    running: bool,
    /// One-shot interrupt not yet delivered.
    armed: bool,
    /// Timer-controlled PB7 level, `0x00` or `0x80`.
    pb7: u8,
}

impl Timer1 {
    pub fn new() -> Self {
        Self {
            counter: 0,
            latch_lo: 0,
            latch_hi: 0,
            running: false,
            armed: false,
            pb7: PB7_HIGH,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn latch(&self) -> u16 {
        u16::from_le_bytes([self.latch_lo, self.latch_hi])
    }

    /// T1C-H write: load the counter from the latches and start counting.
    pub fn start(&mut self, hi: u8) {
        self.latch_hi = hi;
        self.counter = self.latch();
        self.running = true;
        self.armed = true;
        self.pb7 = 0;
    }

    /// T1C-L read: stops the timer and releases PB7.
    pub fn read_counter_lo(&mut self) -> u8 {
        let lo = self.counter as u8;
        self.running = false;
        self.armed = false;
        self.pb7 = PB7_HIGH;
        lo
    }

    pub fn counter_hi(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    pub fn pb7(&self) -> u8 {
        self.pb7
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Advance one PHI2 cycle.  Returns `true` when the T1 flag must be raised.
    pub fn tick(&mut self, continuous: bool) -> bool {
        if !self.running {
            return false;
        }

        self.counter = self.counter.wrapping_sub(1);
        if self.counter != 0xFFFF {
            return false;
        }

        if continuous {
            self.pb7 ^= PB7_HIGH;
            self.counter = self.latch();
            true
        } else if self.armed {
            self.pb7 = PB7_HIGH;
            self.armed = false;
            true
        } else {
            false
        }
    }
}

impl Default for Timer1 {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timer2 {
    pub counter: u16,
    pub latch_lo: u8,
    running: bool,
    armed: bool,
}

impl Timer2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// T2C-H write: load the counter and start counting.
    pub fn start(&mut self, hi: u8) {
        self.counter = u16::from_le_bytes([self.latch_lo, hi]);
        self.running = true;
        self.armed = true;
    }

    /// T2C-L read: stops the timer.
    pub fn read_counter_lo(&mut self) -> u8 {
        self.running = false;
        self.armed = false;
        self.counter as u8
    }

    pub fn counter_hi(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Advance one PHI2 cycle.  Returns `true` when the T2 flag must be raised.
    pub fn tick(&mut self, pulse_counting: bool) -> bool {
        if !self.running || pulse_counting {
            return false;
        }

        self.counter = self.counter.wrapping_sub(1);
        if self.counter == 0xFFFF && self.armed {
            self.armed = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks_until_underflow(t: &mut Timer1, continuous: bool, limit: usize) -> Option<usize> {
        (1..=limit).find(|_| t.tick(continuous))
    }

    #[test]
    fn test_t1_free_run_period_is_latch_plus_one() {
        let mut t = Timer1::new();
        t.latch_lo = 9;
        t.start(0);
        assert_eq!(t.pb7(), 0);

        for round in 0..4 {
            assert_eq!(ticks_until_underflow(&mut t, true, 100), Some(10));
            let expected = if round % 2 == 0 { 0x80 } else { 0x00 };
            assert_eq!(t.pb7(), expected);
        }
    }

    #[test]
    fn test_t1_one_shot_fires_once() {
        let mut t = Timer1::new();
        t.latch_lo = 2;
        t.start(0);
        assert_eq!(ticks_until_underflow(&mut t, false, 10), Some(3));
        assert_eq!(t.pb7(), 0x80);
        assert_eq!(ticks_until_underflow(&mut t, false, 0x20000), None);
        assert!(t.running());
    }

    #[test]
    fn test_t1_low_read_stops_and_releases_pb7() {
        let mut t = Timer1::new();
        t.latch_lo = 0x34;
        t.start(0x12);
        t.tick(true);
        assert_eq!(t.read_counter_lo(), 0x33);
        assert_eq!(t.counter_hi(), 0x12);
        assert_eq!(t.pb7(), 0x80);
        assert!(!t.running());
        assert_eq!(ticks_until_underflow(&mut t, true, 0x20000), None);
    }

    #[test]
    fn test_t2_one_shot() {
        let mut t = Timer2::new();
        t.latch_lo = 4;
        t.start(0);
        assert_eq!((1..=10).find(|_| t.tick(false)), Some(5));
        assert_eq!((1..=0x20000).find(|_| t.tick(false)), None);
    }

    #[test]
    fn test_t2_pulse_counting_parks_counter() {
        let mut t = Timer2::new();
        t.latch_lo = 1;
        t.start(0);
        for _ in 0..10 {
            assert!(!t.tick(true));
        }
        assert_eq!(t.counter, 1);
    }
}

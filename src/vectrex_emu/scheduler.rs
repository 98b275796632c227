//! Run state and cycle budgets.
//!
//! Two clocks run off the same cycle count: the host frame budget (how much
//! machine time one `frame()` covers) and the phosphor-decay budget (how
//! often a render pass fires).  They are deliberately not aligned.

use crate::config::MachineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Uninitialized,
    Running,
    Paused,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: RunState,
    cycles_per_frame: i64,
    decay_cycles: i64,
    /// Cycles left before the next render pass.
    fcycles: i64,
    passes: u64,
}

impl FrameScheduler {
    pub fn new(config: &MachineConfig) -> Self {
        let decay_cycles = config.decay_cycles().max(1);
        Self {
            state: RunState::Uninitialized,
            cycles_per_frame: config.cycles_per_frame(),
            decay_cycles,
            fcycles: decay_cycles,
            passes: 0,
        }
    }

    pub fn reset(&mut self) {
        self.fcycles = self.decay_cycles;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn start(&mut self) {
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        self.state = RunState::Stopped;
    }

    /// Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
            true
        } else {
            false
        }
    }

    /// Returns whether the state changed.
    pub fn resume(&mut self) -> bool {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
            true
        } else {
            false
        }
    }

    pub fn cycles_per_frame(&self) -> i64 {
        self.cycles_per_frame
    }

    pub fn decay_cycles(&self) -> i64 {
        self.decay_cycles
    }

    /// Cycles left until the next render pass.
    pub fn remaining(&self) -> i64 {
        self.fcycles
    }

    /// Render passes fired since construction.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Charge `cycles` against the decay budget.  Returns true when a
    /// render pass is due; the budget is replenished by one period.
    pub fn consume(&mut self, cycles: u32) -> bool {
        self.fcycles -= cycles as i64;
        if self.fcycles < 0 {
            self.fcycles += self.decay_cycles;
            self.passes += 1;
            true
        } else {
            false
        }
    }
}

//! Vectrex hardware core.
//!
//! Everything except the 6809 CPU: memory banks and address decoding, the
//! VIA 6522 timing engine, the sound-chip port, the analog beam generator,
//! the phosphor persistence buffer and the frame scheduler.

pub mod analog;
pub mod banks;
pub mod display;
pub mod mmu;
pub mod scheduler;
pub mod vectors;
pub mod vectrex;
pub mod via;

//! Host-facing emulator: the machine, an external CPU core, the scheduler
//! and the display mapping, behind a small lifecycle API.

use log::{debug, info};

use crate::config::MachineConfig;
use crate::cpu::Cpu;
use crate::vectrex_emu::banks::SoundChip;
use crate::vectrex_emu::display::{Renderer, Viewport};
use crate::vectrex_emu::scheduler::{FrameScheduler, RunState};
use crate::vectrex_emu::vectrex::{Key, Vectrex};

pub struct Emulator<C: Cpu> {
    cpu: C,
    machine: Vectrex,
    scheduler: FrameScheduler,
    viewport: Viewport,
    config: MachineConfig,
}

impl<C: Cpu> Emulator<C> {
    pub fn new(cpu: C) -> Self {
        Self::with_config(cpu, MachineConfig::default())
    }

    pub fn with_config(cpu: C, config: MachineConfig) -> Self {
        Self {
            cpu,
            machine: Vectrex::new(config.max_vectors),
            scheduler: FrameScheduler::new(&config),
            viewport: Viewport::default(),
            config,
        }
    }

    /// Fit the display to a `width` × `height` host window.
    pub fn init(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        debug!(
            "Viewport {}x{}, scale 1/{}",
            self.viewport.width,
            self.viewport.height,
            self.viewport.scaling()
        );
    }

    pub fn set_sound_chip(&mut self, chip: Box<dyn SoundChip>) {
        self.machine.set_sound_chip(Some(chip));
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Install the images, power-cycle the machine and start running.
    pub fn start(&mut self, rom: &[u8], cartridge: &[u8]) {
        self.machine.set_rom(Some(rom));
        self.machine.set_cartridge(Some(cartridge));
        self.machine.psg.start();
        self.reset();
        self.scheduler.start();
        info!("Started (rom {} bytes, cartridge {} bytes)", rom.len(), cartridge.len());
    }

    /// Power-cycle without touching the run state.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.scheduler.reset();
        self.cpu.reset(&mut self.machine);
    }

    pub fn stop(&mut self) {
        self.machine.psg.stop();
        self.scheduler.stop();
        info!("Stopped after {} cycles", self.machine.cycle_count);
    }

    pub fn pause(&mut self) {
        if self.scheduler.pause() {
            info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.scheduler.resume() {
            info!("Resumed");
        }
    }

    pub fn state(&self) -> RunState {
        self.scheduler.state()
    }

    // ── Emulation ─────────────────────────────────────────────

    /// Run one host frame of machine time.  Returns the number of render
    /// passes delivered to `renderer`; does nothing unless running.
    pub fn frame<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> u32 {
        let cycles = self.scheduler.cycles_per_frame();
        self.run_cycles(cycles, renderer)
    }

    /// Run at least `cycles` machine cycles (the last instruction may
    /// overshoot).  Returns the number of render passes fired.
    pub fn run_cycles<R: Renderer + ?Sized>(&mut self, cycles: i64, renderer: &mut R) -> u32 {
        if !self.scheduler.is_running() {
            return 0;
        }

        let mut remaining = cycles;
        let mut passes = 0;

        while remaining > 0 {
            let irq = self.machine.irq_pending();
            let used = self.cpu.step(&mut self.machine, irq, false).max(1);

            for _ in 0..used {
                self.machine.tick();
            }

            remaining -= used as i64;

            if self.scheduler.consume(used) {
                self.render(renderer);
                passes += 1;
            }
        }

        passes
    }

    fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let vectors = &mut self.machine.vectors;
        for v in vectors.draw_list() {
            renderer.draw(self.viewport.project(v));
        }
        renderer.end_frame();

        debug!(
            "Render pass {}: {} drawn, {} fading, {} dropped",
            self.scheduler.passes(),
            vectors.draw_count(),
            vectors.erase_count(),
            vectors.dropped()
        );

        vectors.rotate();
    }

    // ── Input ─────────────────────────────────────────────────

    /// Host key event by numeric code (0–7); unknown codes are ignored.
    pub fn key(&mut self, code: u8, pressed: bool) {
        if let Some(key) = Key::from_code(code) {
            self.press(key, pressed);
        }
    }

    pub fn press(&mut self, key: Key, pressed: bool) {
        self.machine.press(key, pressed);
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn machine(&self) -> &Vectrex {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Vectrex {
        &mut self.machine
    }

    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

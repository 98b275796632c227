// Background frame runner. Owns an emulator on its own thread, takes
// commands from the host over a crossbeam channel and hands finished
// render passes back over a bounded one.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TryRecvError, TrySendError};
use log::{info, trace};

use crate::cpu::Cpu;
use crate::emulator::Emulator;
use crate::error::{Error, Result};
use crate::vectrex_emu::display::{LineCollector, ScreenLine};
use crate::vectrex_emu::scheduler::RunState;

// ─────────────────────────────────────────────────────────────────────────────
//  Public message types
// ─────────────────────────────────────────────────────────────────────────────

/// Commands sent from host → runner thread.
#[derive(Debug, Clone)]
pub enum RunnerCmd {
    Start { rom: Vec<u8>, cartridge: Vec<u8> },
    Key { code: u8, pressed: bool },
    Pause,
    Resume,
    Stop,
    Quit,
}

/// One render pass, in host coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub lines: Vec<ScreenLine>,
    /// Render pass number since the runner started, from 1.
    pub pass: u64,
}

pub struct RunnerHandle {
    pub commands: Sender<RunnerCmd>,
    pub frames: Receiver<RenderedFrame>,
    thread: JoinHandle<()>,
}

impl RunnerHandle {
    /// Returns false once the runner thread has exited.
    pub fn send(&self, cmd: RunnerCmd) -> bool {
        self.commands.send(cmd).is_ok()
    }

    /// Ask the runner to quit and wait for it.
    pub fn shutdown(self) {
        let _ = self.commands.send(RunnerCmd::Quit);
        let _ = self.thread.join();
    }
}

const COMMAND_QUEUE: usize = 64;
const FRAME_QUEUE: usize = 4;
const IDLE_TICK: Duration = Duration::from_millis(100);

// ─────────────────────────────────────────────────────────────────────────────
//  Runner thread
// ─────────────────────────────────────────────────────────────────────────────

pub fn spawn_runner<C>(emulator: Emulator<C>) -> Result<RunnerHandle>
where
    C: Cpu + Send + 'static,
{
    let (cmd_tx, cmd_rx) = bounded::<RunnerCmd>(COMMAND_QUEUE);
    let (frame_tx, frame_rx) = bounded::<RenderedFrame>(FRAME_QUEUE);

    let thread = thread::Builder::new()
        .name("vectrex-runner".into())
        .spawn(move || runner_loop(emulator, cmd_rx, frame_tx))
        .map_err(Error::Spawn)?;

    Ok(RunnerHandle {
        commands: cmd_tx,
        frames: frame_rx,
        thread,
    })
}

/// Wait until `deadline`: sleep for the bulk, spin the last millisecond.
fn wait_until(deadline: Instant) {
    let now = Instant::now();
    if now >= deadline {
        return;
    }
    let remaining = deadline - now;
    if remaining > Duration::from_micros(1500) {
        thread::sleep(remaining - Duration::from_micros(1000));
    }
    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}

struct Pacer {
    frame_dur: Duration,
    next_frame: Instant,
}

impl Pacer {
    fn new(frame_ms: u32) -> Self {
        Self {
            frame_dur: Duration::from_millis(frame_ms as u64),
            next_frame: Instant::now(),
        }
    }

    fn restart(&mut self) {
        self.next_frame = Instant::now();
    }

    /// Advance the absolute deadline by one period and wait for it.  A
    /// runner that fell behind snaps to now instead of catching up.
    fn wait(&mut self) {
        self.next_frame += self.frame_dur;
        let now = Instant::now();
        if self.next_frame < now {
            self.next_frame = now;
        }
        wait_until(self.next_frame);
    }
}

enum Flow {
    Continue,
    Quit,
}

fn runner_loop<C: Cpu>(
    mut emu: Emulator<C>,
    cmd_rx: Receiver<RunnerCmd>,
    frame_tx: Sender<RenderedFrame>,
) {
    let mut pacer = Pacer::new(emu.config().frame_ms);
    let mut collector = LineCollector::new();
    let mut pass = 0u64;
    let idle_tick = tick(IDLE_TICK);

    loop {
        if emu.state() == RunState::Running {
            // Drain commands (also detect host shutdown)
            loop {
                match cmd_rx.try_recv() {
                    Ok(cmd) => {
                        if let Flow::Quit = handle_cmd(&mut emu, cmd, &mut pacer) {
                            return shutdown(emu);
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return shutdown(emu),
                }
            }

            if emu.state() != RunState::Running {
                continue;
            }

            emu.frame(&mut collector);

            for lines in collector.take_frames() {
                pass += 1;
                match frame_tx.try_send(RenderedFrame { lines, pass }) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => trace!("Host behind, dropped pass {pass}"),
                    Err(TrySendError::Disconnected(_)) => return shutdown(emu),
                }
            }

            pacer.wait();
        } else {
            select! {
                recv(cmd_rx) -> msg => {
                    let flow = match msg {
                        Ok(cmd) => handle_cmd(&mut emu, cmd, &mut pacer),
                        Err(_) => Flow::Quit,
                    };
                    if let Flow::Quit = flow {
                        return shutdown(emu);
                    }
                }
                recv(idle_tick) -> _ => {}
            }
        }
    }
}

fn handle_cmd<C: Cpu>(emu: &mut Emulator<C>, cmd: RunnerCmd, pacer: &mut Pacer) -> Flow {
    match cmd {
        RunnerCmd::Start { rom, cartridge } => {
            emu.start(&rom, &cartridge);
            pacer.restart();
        }
        RunnerCmd::Key { code, pressed } => emu.key(code, pressed),
        RunnerCmd::Pause => emu.pause(),
        RunnerCmd::Resume => {
            emu.resume();
            pacer.restart();
        }
        RunnerCmd::Stop => emu.stop(),
        RunnerCmd::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn shutdown<C: Cpu>(mut emu: Emulator<C>) {
    if emu.state() != RunState::Stopped {
        emu.stop();
    }
    info!("Runner finished after {} cycles", emu.machine().cycle_count);
}

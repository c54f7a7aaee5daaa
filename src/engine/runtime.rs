// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::engine::core::{Choreographer, CoreStep};
use crate::engine::{
    CallTemporality, CoreEffect, EngineCommand, EngineNotice, StackFrameView,
};
use crate::model::{DanceSession, ModuleId};

/// Drives the pure [`Choreographer`] core: consumes [`EngineCommand`]s,
/// runs paced `step` ticks, and publishes the core's effects on the
/// outbound channels.
///
/// Pacing uses an accumulated absolute deadline, never "now + delay": each
/// tick advances the target instant by `beat period × wait beats`, so
/// delivery jitter cannot drift the dance off the music. No two ticks are
/// ever in flight; cancelling is simply not scheduling (the timer arm is
/// disabled whenever the core reported no wait).
pub struct EngineRuntime {
    core: Choreographer,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    calls_tx: watch::Sender<CallTemporality>,
    stack_tx: watch::Sender<Vec<StackFrameView>>,
    running_tx: watch::Sender<bool>,
    notice_tx: mpsc::Sender<EngineNotice>,

    /// Absolute time of the next scheduled tick, when pacing is active.
    next_call_at: Option<Instant>,
}

impl fmt::Debug for EngineRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRuntime")
            .field("core", &self.core)
            .field("next_call_at", &self.next_call_at)
            .finish_non_exhaustive()
    }
}

/// Clonable host-side handle: async command senders plus the latest-state
/// event streams.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    calls_rx: watch::Receiver<CallTemporality>,
    stack_rx: watch::Receiver<Vec<StackFrameView>>,
    running_rx: watch::Receiver<bool>,
}

impl EngineHandle {
    pub async fn begin_tip(&self) {
        self.send(EngineCommand::BeginTip).await;
    }

    pub async fn end_tip(&self) {
        self.send(EngineCommand::EndTip).await;
    }

    pub async fn play_module(&self, id: ModuleId) {
        self.send(EngineCommand::PlayModule(id)).await;
    }

    pub async fn pause(&self) {
        self.send(EngineCommand::Pause).await;
    }

    pub async fn resume(&self) {
        self.send(EngineCommand::Resume).await;
    }

    /// Advance a single call without starting the pacer.
    pub async fn step(&self) {
        self.send(EngineCommand::Step).await;
    }

    pub async fn activate_criteria(&self) {
        self.send(EngineCommand::ActivateCriteria).await;
    }

    pub async fn use_dance_session(&self, session: DanceSession) {
        self.send(EngineCommand::UseDanceSession(session)).await;
    }

    /// Stream of the current past/now/future call triple.
    pub fn calls(&self) -> watch::Receiver<CallTemporality> {
        self.calls_rx.clone()
    }

    /// Stream of the current module stack.
    pub fn stack(&self) -> watch::Receiver<Vec<StackFrameView>> {
        self.stack_rx.clone()
    }

    /// Stream of the run/pause state.
    pub fn running(&self) -> watch::Receiver<bool> {
        self.running_rx.clone()
    }

    async fn send(&self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).await.is_err() {
            warn!("engine runtime is gone; command dropped");
        }
    }
}

impl EngineRuntime {
    /// Create a runtime around a core.
    ///
    /// Returns the runtime (spawn its [`run`](EngineRuntime::run)), the
    /// host handle, and the advisory notice stream.
    pub fn new(core: Choreographer) -> (Self, EngineHandle, mpsc::Receiver<EngineNotice>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>(16);
        let (calls_tx, calls_rx) = watch::channel(CallTemporality::default());
        let (stack_tx, stack_rx) = watch::channel(Vec::new());
        let (running_tx, running_rx) = watch::channel(false);
        let (notice_tx, notice_rx) = mpsc::channel::<EngineNotice>(16);

        let runtime = Self {
            core,
            cmd_rx,
            calls_tx,
            stack_tx,
            running_tx,
            notice_tx,
            next_call_at: None,
        };
        let handle = EngineHandle {
            cmd_tx,
            calls_rx,
            stack_rx,
            running_rx,
        };

        (runtime, handle, notice_rx)
    }

    /// Main event loop: commands in, paced ticks while running.
    ///
    /// Exits when every command sender is dropped.
    pub async fn run(mut self) {
        info!("choreography engine started");

        loop {
            let deadline = self.next_call_at;
            tokio::select! {
                maybe_cmd = self.cmd_rx.recv() => {
                    match maybe_cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => {
                            info!("engine command channel closed; exiting");
                            break;
                        }
                    }
                }
                _ = Self::tick_timer(deadline), if deadline.is_some() => {
                    self.tick();
                }
            }
        }

        info!("choreography engine exiting");
    }

    async fn tick_timer(deadline: Option<Instant>) {
        if let Some(at) = deadline {
            sleep_until(at).await;
        }
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        debug!(?cmd, "engine received command");

        let step = match cmd {
            EngineCommand::BeginTip => self.core.begin_tip(),
            EngineCommand::EndTip => {
                self.next_call_at = None;
                self.core.end_tip()
            }
            EngineCommand::PlayModule(id) => {
                self.next_call_at = None;
                self.core.play_module_id(&id)
            }
            EngineCommand::Pause => {
                self.next_call_at = None;
                self.core.pause()
            }
            EngineCommand::Resume => {
                let step = self.core.resume();
                self.publish(step);

                // One beat of lead-in before the first call, then the
                // immediate first step.
                self.next_call_at = Some(Instant::now() + self.beat_period());
                self.tick();
                return;
            }
            EngineCommand::Step => {
                self.tick();
                return;
            }
            EngineCommand::ActivateCriteria => {
                self.core.activate_criteria();
                return;
            }
            EngineCommand::UseDanceSession(session) => {
                self.core.use_dance_session(session);
                return;
            }
        };

        self.publish(step);
    }

    /// Run one core tick and reschedule against the absolute deadline.
    fn tick(&mut self) {
        let step = self.core.step();
        let wait_beats = step.wait_beats;
        self.publish(step);

        match wait_beats {
            Some(beats) => {
                let base = self.next_call_at.unwrap_or_else(Instant::now);
                self.next_call_at = Some(base + self.beat_period() * beats);
            }
            None => {
                self.next_call_at = None;
            }
        }
    }

    fn beat_period(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.core.bpm())
    }

    fn publish(&mut self, step: CoreStep) {
        for effect in step.effects {
            match effect {
                CoreEffect::Calls(snapshot) => {
                    self.calls_tx.send_replace(snapshot);
                }
                CoreEffect::Stack(snapshot) => {
                    self.stack_tx.send_replace(snapshot);
                }
                CoreEffect::Running(flag) => {
                    self.running_tx.send_replace(flag);
                }
                CoreEffect::Notice(notice) => {
                    if let Err(err) = self.notice_tx.try_send(notice) {
                        warn!(error = %err, "notice stream full or closed; dropping notice");
                    }
                }
            }
        }
    }
}

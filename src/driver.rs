//! Periodic tick driver for a hosted session.
//!
//! The session lives inside one task. Timer ticks and relayed intents are
//! handled by the same `select!` loop, so they apply one at a time in the
//! order they arrive. The host toggles ticking with `start`/`stop` as its view
//! becomes visible or hidden.

use std::time::Duration;

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{error, info, warn};

use crate::{
    session::{Intent, Session},
    snapshot::SessionSnapshot,
};

const COMMAND_BUFFER: usize = 64;

/// How many multiples of `every` lie in `(from, to]`. The tick watch only
/// keeps the latest value, so a host reading it late uses this to catch up
/// on every boundary it skipped.
pub fn days_crossed(from: u64, to: u64, every: u64) -> u64 {
    if every == 0 || to <= from {
        return 0;
    }
    to / every - from / every
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("tick driver has shut down")]
    Closed,
    #[error("tick driver task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

enum Command {
    Apply {
        intent: Intent,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

pub struct TickDriver;

impl TickDriver {
    /// Spawns the driver with the session's configured tick interval. The
    /// driver starts stopped.
    pub fn spawn(session: Session) -> DriverHandle {
        let period = session.config().tick_interval();
        Self::spawn_with_interval(session, period)
    }

    pub fn spawn_with_interval(session: Session, period: Duration) -> DriverHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (active_tx, active_rx) = watch::channel(false);
        let (tick_tx, tick_rx) = watch::channel(session.current_tick());
        let task = tokio::spawn(run_loop(session, period, command_rx, active_rx, tick_tx));
        DriverHandle {
            commands: command_tx,
            active: active_tx,
            ticks: tick_rx,
            task,
        }
    }
}

pub struct DriverHandle {
    commands: mpsc::Sender<Command>,
    active: watch::Sender<bool>,
    ticks: watch::Receiver<u64>,
    task: JoinHandle<Session>,
}

impl DriverHandle {
    /// Begins ticking; the first tick fires one full period from now.
    pub fn start(&self) {
        self.active.send_replace(true);
    }

    /// Pauses ticking. Intents are still accepted while stopped.
    pub fn stop(&self) {
        self.active.send_replace(false);
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Observes the session's tick counter.
    pub fn ticks(&self) -> watch::Receiver<u64> {
        self.ticks.clone()
    }

    pub async fn send(&self, intent: Intent) -> Result<bool, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Apply { intent, reply })
            .await
            .map_err(|_| DriverError::Closed)?;
        rx.await.map_err(|_| DriverError::Closed)
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| DriverError::Closed)?;
        rx.await.map_err(|_| DriverError::Closed)
    }

    /// Stops the loop after queued intents drain and hands the session back.
    pub async fn shutdown(self) -> Result<Session, DriverError> {
        let DriverHandle {
            commands,
            active,
            task,
            ..
        } = self;
        drop(commands);
        drop(active);
        Ok(task.await?)
    }
}

async fn run_loop(
    mut session: Session,
    period: Duration,
    mut commands: mpsc::Receiver<Command>,
    mut active_rx: watch::Receiver<bool>,
    tick_tx: watch::Sender<u64>,
) -> Session {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut active = *active_rx.borrow_and_update();
    let mut announced_game_over = false;

    loop {
        tokio::select! {
            _ = interval.tick(), if active => {
                match session.tick() {
                    Ok(summary) => {
                        tick_tx.send_replace(summary.tick);
                        if summary.game_over && !announced_game_over {
                            warn!(tick = summary.tick, "session over, ticks suspended until reset");
                            announced_game_over = true;
                        }
                    }
                    Err(err) => error!("tick failed: {err:#}"),
                }
            }
            command = commands.recv() => match command {
                Some(Command::Apply { intent, reply }) => {
                    let applied = session.apply(intent);
                    if matches!(intent, Intent::Reset) {
                        announced_game_over = false;
                        tick_tx.send_replace(session.current_tick());
                    }
                    let _ = reply.send(applied);
                }
                Some(Command::Snapshot { reply }) => {
                    let _ = reply.send(session.snapshot());
                }
                None => break,
            },
            changed = active_rx.changed() => {
                if changed.is_err() {
                    // Host dropped its handle; finish queued intents first.
                    while let Ok(command) = commands.try_recv() {
                        if let Command::Apply { intent, reply } = command {
                            let _ = reply.send(session.apply(intent));
                        }
                    }
                    break;
                }
                let now_active = *active_rx.borrow_and_update();
                if now_active && !active {
                    interval.reset();
                    info!(period_ms = period.as_millis() as u64, "tick driver started");
                } else if !now_active && active {
                    info!(tick = session.current_tick(), "tick driver stopped");
                }
                active = now_active;
            }
        }
    }
    session
}

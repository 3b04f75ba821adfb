//! Worker task that owns one [`BattleSession`].
//!
//! Receives commands from [`BattleHandle`](crate::BattleHandle), advances the
//! battle on a wall-clock ticker (or on demand) and publishes snapshots and
//! lifecycle notices. A finished battle stays queryable for the retention
//! period; afterwards the worker removes itself from the registry table.

use std::future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use arena_core::{BattleReport, BattleSession, BattleSnapshot, SessionRng};

use crate::api::Result;
use crate::events::{Event, EventBus, LifecycleEvent};
use crate::registry::BattleTable;

/// Commands that can be sent to a battle worker
pub enum Command {
    /// Current snapshot (read-only).
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    /// Advance by one tick.
    Step {
        reply: oneshot::Sender<Result<BattleSnapshot>>,
    },
    /// Stop with no winner.
    Terminate {
        reply: oneshot::Sender<Result<BattleSnapshot>>,
    },
    Report {
        reply: oneshot::Sender<Option<BattleReport>>,
    },
    /// Stop serving and exit. A running battle is terminated first.
    Retire,
}

pub struct BattleWorker {
    session: BattleSession<SessionRng>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    lobby: EventBus,
    battles: BattleTable,
    tick_interval: Option<Duration>,
    retention: Duration,
}

impl BattleWorker {
    pub fn new(
        session: BattleSession<SessionRng>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        lobby: EventBus,
        battles: BattleTable,
        tick_interval: Option<Duration>,
        retention: Duration,
    ) -> Self {
        Self {
            session,
            command_rx,
            event_bus,
            lobby,
            battles,
            tick_interval,
            retention,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let id = self.session.id();
        info!(battle = %id, "battle worker started");

        let retired_early = self.fight().await;
        if !retired_early {
            self.linger().await;
        }
        self.retire().await;

        info!(battle = %id, "battle worker stopped");
    }

    /// Serves commands and ticks until the battle finishes. Returns `true`
    /// when the worker was asked to retire before that.
    async fn fight(&mut self) -> bool {
        let mut ticker = self.tick_interval.map(|period| {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        while !self.session.is_finished() {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Retire) | None => {
                        self.stop();
                        return true;
                    }
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = next_tick(&mut ticker) => {
                    // failures are logged and published by `tick`
                    let _ = self.tick();
                }
            }
        }
        false
    }

    /// Keeps answering queries on a finished battle until the retention
    /// period runs out.
    async fn linger(&mut self) {
        let deadline = time::sleep(self.retention);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Retire) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Snapshot { reply } => {
                if reply.send(self.session.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Step { reply } => {
                let result = self.tick();
                if reply.send(result).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::Terminate { reply } => {
                let result = self.terminate();
                if reply.send(result).is_err() {
                    debug!("Terminate reply channel closed (caller dropped)");
                }
            }
            Command::Report { reply } => {
                if reply.send(self.session.report()).is_err() {
                    debug!("Report reply channel closed (caller dropped)");
                }
            }
            Command::Retire => {}
        }
    }

    fn tick(&mut self) -> Result<BattleSnapshot> {
        match self.session.advance_tick() {
            Ok(snapshot) => {
                trace!(
                    target: "arena::worker",
                    battle = %snapshot.session_id,
                    tick = snapshot.elapsed_ticks,
                    alive = snapshot.alive_count(),
                    events = snapshot.events.len(),
                    "tick committed"
                );
                self.publish_snapshot(&snapshot);
                if snapshot.is_finished() {
                    self.publish_finished();
                }
                Ok(snapshot)
            }
            Err(err) => {
                if self.session.is_finished() {
                    error!(battle = %self.session.id(), error = %err, "tick aborted the battle");
                    self.publish_snapshot(&self.session.snapshot());
                    self.publish_finished();
                } else {
                    warn!(battle = %self.session.id(), error = %err, "tick rejected");
                }
                Err(err.into())
            }
        }
    }

    fn terminate(&mut self) -> Result<BattleSnapshot> {
        let snapshot = self.session.terminate()?;
        self.publish_snapshot(&snapshot);
        self.publish_finished();
        Ok(snapshot)
    }

    /// Terminates a battle that is still running; no-op otherwise.
    fn stop(&mut self) {
        if !self.session.is_finished() && self.terminate().is_ok() {
            info!(battle = %self.session.id(), "battle terminated on retire");
        }
    }

    fn publish_snapshot(&self, snapshot: &BattleSnapshot) {
        self.event_bus
            .publish(Event::Snapshot(Box::new(snapshot.clone())));
    }

    fn publish_finished(&self) {
        let (Some(report), Some(conclusion)) = (self.session.report(), self.session.conclusion())
        else {
            return;
        };

        info!(
            battle = %report.battle_id,
            winner = ?report.winner,
            reason = %conclusion.reason,
            ticks = report.ticks,
            "battle finished"
        );

        let event = Event::Lifecycle(LifecycleEvent::BattleFinished {
            battle: report.battle_id,
            winner: report.winner,
            reason: conclusion.reason,
            ticks: report.ticks,
            report: Box::new(report),
        });
        self.event_bus.publish(event.clone());
        self.lobby.publish(event);
    }

    async fn retire(&mut self) {
        let id = self.session.id();
        self.battles.write().await.remove(&id);

        let event = Event::Lifecycle(LifecycleEvent::BattleRetired { battle: id });
        self.event_bus.publish(event.clone());
        self.lobby.publish(event);
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

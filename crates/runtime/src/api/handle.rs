//! Cloneable façade for issuing commands to one battle.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for
//! stepping, stopping and observing a battle hosted by its worker.
use tokio::sync::{broadcast, mpsc, oneshot};

use arena_core::{BattleId, BattleReport, BattleSnapshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to a hosted battle.
#[derive(Clone)]
pub struct BattleHandle {
    id: BattleId,
    seed: u64,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(
        id: BattleId,
        seed: u64,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            id,
            seed,
            command_tx,
            event_bus,
        }
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    /// Seed of the battle's random stream. Replaying with it reproduces the
    /// battle tick for tick.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current snapshot. Works while running and during retention.
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advances the battle by one tick.
    pub async fn step(&self) -> Result<BattleSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Step { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Stops the battle with no winner.
    pub async fn terminate(&self) -> Result<BattleSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Terminate { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Final report, once the battle has finished.
    pub async fn report(&self) -> Result<Option<BattleReport>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Report { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Asks the worker to stop serving the battle and exit.
    pub(crate) async fn retire(&self) -> Result<()> {
        self.command_tx
            .send(Command::Retire)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Snapshot` - one snapshot per committed tick
    /// - `Topic::Lifecycle` - started, finished and retired notices
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use arena_runtime::{Event, Topic};
    ///
    /// let mut rx = handle.subscribe(Topic::Snapshot);
    /// while let Ok(Event::Snapshot(snapshot)) = rx.recv().await {
    ///     render(&snapshot);
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Number of live snapshot subscribers.
    pub fn spectator_count(&self) -> usize {
        self.event_bus.receiver_count(Topic::Snapshot)
    }
}

impl std::fmt::Debug for BattleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleHandle")
            .field("id", &self.id)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

//! Table of live battles.
//!
//! [`SessionRegistry`] validates and starts battles, spawns one worker per
//! battle and keeps a handle to each until its worker retires. Lifecycle
//! notices for every battle are mirrored on the lobby bus.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock, broadcast, mpsc};
use tokio::task::JoinSet;
use tracing::{info, warn};

use arena_core::{
    BattleId, BattleSession, BattleSnapshot, BattleStatus, CombatantId, CombatantSpec, SessionRng,
};

use crate::api::{BattleHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, LifecycleEvent, Topic};
use crate::workers::BattleWorker;

pub(crate) type BattleTable = Arc<RwLock<HashMap<BattleId, BattleHandle>>>;

/// One line of [`SessionRegistry::active`].
#[derive(Clone, Debug, PartialEq)]
pub struct BattleSummary {
    pub id: BattleId,
    pub seed: u64,
    pub status: BattleStatus,
    pub elapsed_ticks: u64,
    pub alive: usize,
    pub winner: Option<CombatantId>,
}

impl BattleSummary {
    fn new(seed: u64, snapshot: &BattleSnapshot) -> Self {
        Self {
            id: snapshot.session_id,
            seed,
            status: snapshot.status,
            elapsed_ticks: snapshot.elapsed_ticks,
            alive: snapshot.alive_count(),
            winner: snapshot.winner,
        }
    }
}

/// Cloneable entry point for hosting battles.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    config: RuntimeConfig,
    battles: BattleTable,
    lobby: EventBus,
    next_id: AtomicU64,
    /// Worker tasks not yet reaped. Finished ones are collected whenever a
    /// battle starts.
    workers: Mutex<JoinSet<()>>,
}

impl SessionRegistry {
    pub fn new(config: RuntimeConfig) -> Self {
        let lobby = EventBus::with_capacity(config.event_buffer_size);
        Self {
            inner: Arc::new(Inner {
                config,
                battles: Arc::new(RwLock::new(HashMap::new())),
                lobby,
                next_id: AtomicU64::new(1),
                workers: Mutex::new(JoinSet::new()),
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Validates `specs`, starts the battle and spawns its worker.
    ///
    /// Without a `seed` one is drawn from OS entropy; it is logged and
    /// exposed through [`BattleHandle::seed`] so the battle can be replayed.
    pub async fn start_battle(
        &self,
        specs: impl IntoIterator<Item = CombatantSpec>,
        seed: Option<u64>,
    ) -> Result<BattleHandle> {
        let config = &self.inner.config;
        let id = BattleId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let rng = match seed {
            Some(seed) => SessionRng::seeded(seed),
            None => SessionRng::from_entropy(),
        };
        let seed = rng.seed();

        let session = BattleSession::create(id, specs, config.arena.clone(), rng)?;
        let combatants = session.state().combatants.len();

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let handle = BattleHandle::new(id, seed, command_tx, event_bus.clone());

        self.inner
            .battles
            .write()
            .await
            .insert(id, handle.clone());

        let worker = BattleWorker::new(
            session,
            command_rx,
            event_bus.clone(),
            self.inner.lobby.clone(),
            Arc::clone(&self.inner.battles),
            config.tick_interval,
            config.retention,
        );
        {
            let mut workers = self.inner.workers.lock().await;
            reap(&mut workers);
            workers.spawn(worker.run());
        }

        info!(battle = %id, seed, combatants, "battle started");
        let started = Event::Lifecycle(LifecycleEvent::BattleStarted {
            battle: id,
            seed,
            combatants,
        });
        event_bus.publish(started.clone());
        self.inner.lobby.publish(started);

        Ok(handle)
    }

    /// Handle to a battle that has not been retired yet.
    pub async fn get(&self, id: BattleId) -> Option<BattleHandle> {
        self.inner.battles.read().await.get(&id).cloned()
    }

    /// Summaries of every hosted battle, ordered by id. Battles whose worker
    /// exits while being queried are skipped.
    pub async fn active(&self) -> Vec<BattleSummary> {
        let mut handles: Vec<BattleHandle> =
            self.inner.battles.read().await.values().cloned().collect();
        handles.sort_by_key(BattleHandle::id);

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(snapshot) = handle.snapshot().await {
                summaries.push(BattleSummary::new(handle.seed(), &snapshot));
            }
        }
        summaries
    }

    pub async fn terminate(&self, id: BattleId) -> Result<BattleSnapshot> {
        let handle = self
            .get(id)
            .await
            .ok_or(RuntimeError::BattleNotFound(id))?;
        handle.terminate().await
    }

    /// Lifecycle notices for every battle started by this registry.
    pub fn subscribe_lobby(&self) -> broadcast::Receiver<Event> {
        self.inner.lobby.subscribe(Topic::Lifecycle)
    }

    /// Retires every battle and waits for the workers to exit.
    pub async fn shutdown(&self) -> Result<()> {
        let handles: Vec<BattleHandle> =
            self.inner.battles.read().await.values().cloned().collect();
        for handle in handles {
            // a worker that already exited has nothing left to retire
            let _ = handle.retire().await;
        }

        let mut workers = self.inner.workers.lock().await;
        while let Some(joined) = workers.join_next().await {
            joined.map_err(RuntimeError::WorkerJoin)?;
        }
        info!("session registry shut down");
        Ok(())
    }
}

/// Drops the join results of workers that have already exited.
fn reap(workers: &mut JoinSet<()>) {
    while let Some(joined) = workers.try_join_next() {
        if let Err(err) = joined {
            warn!(error = %err, "battle worker ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use arena_core::TraitInput;

    fn pair() -> Vec<CombatantSpec> {
        vec![
            CombatantSpec::new(0, "Mantis", TraitInput::new(90, 70, 40, 60)),
            CombatantSpec::new(1, "Beetle", TraitInput::new(30, 50, 95, 70)),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn retired_workers_are_reaped() {
        let config = RuntimeConfig {
            retention: Duration::from_secs(1),
            ..RuntimeConfig::default().manual()
        };
        let registry = SessionRegistry::new(config);
        let mut lobby = registry.subscribe_lobby();

        for seed in 0..3 {
            let handle = registry.start_battle(pair(), Some(seed)).await.unwrap();
            handle.terminate().await.unwrap();
            loop {
                match lobby.recv().await {
                    Ok(Event::Lifecycle(LifecycleEvent::BattleRetired { battle })) => {
                        assert_eq!(battle, handle.id());
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => panic!("lobby closed: {err}"),
                }
            }
            tokio::task::yield_now().await;
        }

        let last = registry.start_battle(pair(), Some(9)).await.unwrap();
        assert_eq!(registry.inner.workers.lock().await.len(), 1);

        last.terminate().await.unwrap();
        registry.shutdown().await.unwrap();
        assert!(registry.inner.workers.lock().await.is_empty());
    }
}

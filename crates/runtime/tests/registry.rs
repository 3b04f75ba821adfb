use std::time::Duration;

use arena_core::{
    BattleId, BattleSession, BattleStatus, CombatantSpec, EndReason, SessionError, SessionRng,
    TraitInput,
};
use arena_runtime::{Event, LifecycleEvent, RuntimeConfig, RuntimeError, SessionRegistry, Topic};
use tokio::sync::broadcast;

const STEP_CAP: usize = 20_000;

fn four_bugs() -> Vec<CombatantSpec> {
    vec![
        CombatantSpec::new(0, "Mantis", TraitInput::new(90, 70, 40, 60)),
        CombatantSpec::new(1, "Beetle", TraitInput::new(30, 50, 95, 70)),
        CombatantSpec::new(2, "Wasp", TraitInput::new(80, 60, 20, 30)),
        CombatantSpec::new(3, "Ant", TraitInput::new(50, 50, 50, 100)),
    ]
}

fn manual() -> RuntimeConfig {
    RuntimeConfig {
        retention: Duration::from_secs(5),
        ..RuntimeConfig::default().manual()
    }
}

async fn next_lifecycle(rx: &mut broadcast::Receiver<Event>) -> LifecycleEvent {
    match rx.recv().await {
        Ok(Event::Lifecycle(event)) => event,
        other => panic!("expected a lifecycle event, got {other:?}"),
    }
}

/// Stepping a hosted battle replays exactly what a local session produces
/// from the same seed.
#[tokio::test(start_paused = true)]
async fn manual_stepping_matches_local_session() {
    let registry = SessionRegistry::new(manual());
    let handle = registry
        .start_battle(four_bugs(), Some(42))
        .await
        .expect("valid roster");
    assert_eq!(handle.id(), BattleId(1));
    assert_eq!(handle.seed(), 42);

    let mut local = BattleSession::create(
        BattleId(1),
        four_bugs(),
        RuntimeConfig::default().arena,
        SessionRng::seeded(42),
    )
    .expect("valid roster");

    assert_eq!(handle.snapshot().await.expect("snapshot"), local.snapshot());

    let mut steps = 0;
    while local.status() == BattleStatus::Running {
        let expected = local.advance_tick().expect("local tick");
        let hosted = handle.step().await.expect("hosted tick");
        assert_eq!(hosted, expected);
        steps += 1;
        assert!(steps < STEP_CAP, "battle did not finish");
    }

    let err = handle.step().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::InvalidStateTransition {
            status: BattleStatus::Finished,
            ..
        })
    ));

    let report = handle.report().await.expect("report").expect("finished");
    assert_eq!(Some(report), local.report());
}

/// With a ticker configured the battle advances on its own.
#[tokio::test(start_paused = true)]
async fn timed_battles_tick_by_themselves() {
    let config = RuntimeConfig {
        tick_interval: Some(Duration::from_millis(100)),
        ..RuntimeConfig::default()
    };
    let registry = SessionRegistry::new(config);
    let handle = registry
        .start_battle(four_bugs(), Some(7))
        .await
        .expect("valid roster");
    let mut snapshots = handle.subscribe(Topic::Snapshot);

    for expected_tick in [1, 2, 3] {
        match snapshots.recv().await {
            Ok(Event::Snapshot(snapshot)) => {
                assert_eq!(snapshot.elapsed_ticks, expected_tick);
                assert_eq!(snapshot.session_id, handle.id());
            }
            other => panic!("expected a snapshot, got {other:?}"),
        }
    }

    registry.shutdown().await.expect("clean shutdown");
}

/// Terminating publishes the outcome on the lobby; the battle is retired
/// once the retention period is over.
#[tokio::test(start_paused = true)]
async fn terminated_battle_is_retired_after_retention() {
    let registry = SessionRegistry::new(manual());
    let mut lobby = registry.subscribe_lobby();

    let handle = registry
        .start_battle(four_bugs(), Some(3))
        .await
        .expect("valid roster");
    let id = handle.id();

    match next_lifecycle(&mut lobby).await {
        LifecycleEvent::BattleStarted {
            battle,
            seed,
            combatants,
        } => {
            assert_eq!(battle, id);
            assert_eq!(seed, 3);
            assert_eq!(combatants, 4);
        }
        other => panic!("unexpected {other:?}"),
    }

    handle.step().await.expect("tick");
    let snapshot = registry.terminate(id).await.expect("running battle");
    assert_eq!(snapshot.status, BattleStatus::Finished);
    assert_eq!(snapshot.winner, None);

    match next_lifecycle(&mut lobby).await {
        LifecycleEvent::BattleFinished {
            battle,
            winner,
            reason,
            ticks,
            report,
        } => {
            assert_eq!(battle, id);
            assert_eq!(winner, None);
            assert_eq!(reason, EndReason::Terminated);
            assert_eq!(ticks, 1);
            assert_eq!(report.entries.len(), 4);
        }
        other => panic!("unexpected {other:?}"),
    }

    // still queryable during retention
    let summaries = registry.active().await;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].status, BattleStatus::Finished);

    assert_eq!(
        next_lifecycle(&mut lobby).await,
        LifecycleEvent::BattleRetired { battle: id }
    );
    assert!(registry.get(id).await.is_none());
    assert!(registry.active().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn invalid_roster_is_rejected() {
    let registry = SessionRegistry::new(manual());
    let lonely = vec![CombatantSpec::new(0, "Solo", TraitInput::new(50, 50, 50, 50))];

    let err = registry.start_battle(lonely, Some(1)).await.unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::Validation(_))
    ));
    assert!(registry.active().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn spectators_are_counted() {
    let registry = SessionRegistry::new(manual());
    let handle = registry
        .start_battle(four_bugs(), Some(11))
        .await
        .expect("valid roster");
    assert_eq!(handle.spectator_count(), 0);

    let first = handle.subscribe(Topic::Snapshot);
    let second = handle.subscribe(Topic::Snapshot);
    assert_eq!(handle.spectator_count(), 2);

    drop(first);
    drop(second);
    assert_eq!(handle.spectator_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_battle_is_reported() {
    let registry = SessionRegistry::new(manual());

    let err = registry.terminate(BattleId(99)).await.unwrap_err();

    assert!(matches!(err, RuntimeError::BattleNotFound(BattleId(99))));
}

/// Shutdown terminates running battles and waits for every worker.
#[tokio::test(start_paused = true)]
async fn shutdown_retires_everything() {
    let registry = SessionRegistry::new(manual());
    let mut lobby = registry.subscribe_lobby();
    for seed in [1, 2] {
        registry
            .start_battle(four_bugs(), Some(seed))
            .await
            .expect("valid roster");
    }
    assert_eq!(registry.active().await.len(), 2);

    registry.shutdown().await.expect("clean shutdown");

    assert!(registry.active().await.is_empty());
    let mut finished = 0;
    let mut retired = 0;
    while let Ok(Event::Lifecycle(event)) = lobby.try_recv() {
        match event {
            LifecycleEvent::BattleFinished { reason, .. } => {
                assert_eq!(reason, EndReason::Terminated);
                finished += 1;
            }
            LifecycleEvent::BattleRetired { .. } => retired += 1,
            LifecycleEvent::BattleStarted { .. } => {}
        }
    }
    assert_eq!((finished, retired), (2, 2));
}

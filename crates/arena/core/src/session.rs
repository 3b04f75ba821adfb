//! Battle session state machine.
//!
//! A [`BattleSession`] owns one battle from setup to its final snapshot:
//!
//! ```text
//! setup ──start──▶ running ──advance_tick──▶ running
//!   │                 │
//!   └──terminate──────┴──(last standing / terminate / tick limit / fault)──▶ finished
//! ```
//!
//! Finished is terminal. Every operation that is not allowed in the current
//! status returns [`SessionError::InvalidStateTransition`] and leaves the
//! session untouched.

use arrayvec::ArrayVec;

use crate::config::ArenaConfig;
use crate::engine::{self, Conclusion, EndReason};
use crate::error::{SessionError, SessionOp, ValidationError};
use crate::event::{BattleEvent, EventKind};
use crate::report::BattleReport;
use crate::rng::{RandomSource, SessionRng};
use crate::snapshot::{BattleSnapshot, CombatantSnapshot};
use crate::state::{
    BattleId, BattleState, BattleStatus, Combatant, CombatantId, CombatantSpec, Roster, Vec2,
};
use crate::stats::TraitSet;

/// One battle and everything needed to advance it.
#[derive(Clone, Debug)]
pub struct BattleSession<R = SessionRng> {
    id: BattleId,
    config: ArenaConfig,
    rng: R,
    status: BattleStatus,
    pending: Vec<CombatantSpec>,
    state: BattleState,
    last_events: Vec<BattleEvent>,
    conclusion: Option<Conclusion>,
}

impl<R: RandomSource> BattleSession<R> {
    /// Empty session in setup.
    pub fn new(id: BattleId, config: ArenaConfig, rng: R) -> Self {
        Self {
            id,
            config,
            rng,
            status: BattleStatus::Setup,
            pending: Vec::new(),
            state: BattleState::default(),
            last_events: Vec::new(),
            conclusion: None,
        }
    }

    /// Builds a session from `specs` and starts it.
    pub fn create(
        id: BattleId,
        specs: impl IntoIterator<Item = CombatantSpec>,
        config: ArenaConfig,
        rng: R,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(id, config, rng);
        session.pending.extend(specs);
        session.start()?;
        Ok(session)
    }

    /// Rebuilds a running session from a captured state.
    ///
    /// The roster shape (count, unique ids, trait ranges) is checked here,
    /// along with the cached stats, which must match the traits exactly.
    /// Health, stamina and position are checked by the next tick.
    pub fn resume(
        id: BattleId,
        state: BattleState,
        config: ArenaConfig,
        rng: R,
    ) -> Result<Self, SessionError> {
        check_count(state.combatants.len())?;
        for (index, combatant) in state.combatants.iter().enumerate() {
            let earlier = &state.combatants[..index];
            if earlier.iter().any(|c| c.id == combatant.id) {
                return Err(ValidationError::DuplicateId(combatant.id).into());
            }
            combatant
                .traits()
                .check()
                .map_err(|source| ValidationError::Trait {
                    combatant: combatant.id,
                    source,
                })?;
            if !combatant.stats_consistent() {
                return Err(ValidationError::StatsMismatch(combatant.id).into());
            }
        }

        let mut session = Self::new(id, config, rng);
        session.state = state;
        session.status = BattleStatus::Running;
        Ok(session)
    }

    /// Adds a combatant definition. Only allowed during setup.
    pub fn enlist(&mut self, spec: CombatantSpec) -> Result<(), SessionError> {
        self.require(BattleStatus::Setup, SessionOp::Enlist)?;
        if self.pending.len() >= ArenaConfig::MAX_COMBATANTS {
            return Err(ValidationError::combatant_count(self.pending.len() + 1).into());
        }
        if self.pending.iter().any(|p| p.id == spec.id) {
            return Err(ValidationError::DuplicateId(spec.id).into());
        }
        self.pending.push(spec);
        Ok(())
    }

    /// Validates the enlisted roster, places everyone and moves to running.
    ///
    /// On error nothing changes: the session stays in setup with its roster
    /// intact and no random draws consumed.
    pub fn start(&mut self) -> Result<BattleSnapshot, SessionError> {
        self.require(BattleStatus::Setup, SessionOp::Start)?;

        let validated = validate_roster(&self.pending, &self.config)?;

        let layout = self.config.spawn;
        let (min, max) = (self.config.min_corner(), self.config.max_corner());
        let mut roster = Roster::new();
        for (index, (spec, traits)) in self.pending.iter().zip(validated).enumerate() {
            let position = match spec.spawn {
                Some(point) => point,
                None => {
                    let x = layout.origin_x + index as f64 * layout.spacing;
                    let y = layout.origin_y + self.rng.next_unit() * layout.jitter;
                    Vec2::new(x.clamp(min.x, max.x), y.clamp(min.y, max.y))
                }
            };
            roster.push(
                Combatant::new(spec.id, spec.name.clone(), traits, position, &self.config)
                    .with_color(spec.color.clone()),
            );
        }

        self.state = BattleState::new(roster);
        self.pending.clear();
        self.status = BattleStatus::Running;
        self.last_events = vec![BattleEvent::new(
            0,
            EventKind::Started {
                combatants: self.state.combatants.len(),
            },
        )];
        Ok(self.snapshot())
    }

    /// Runs one tick.
    ///
    /// An invariant violation discards the tick, finishes the battle with no
    /// winner and is returned as the error.
    pub fn advance_tick(&mut self) -> Result<BattleSnapshot, SessionError> {
        self.require(BattleStatus::Running, SessionOp::AdvanceTick)?;

        match engine::advance(&self.state, &self.config, &mut self.rng) {
            Ok(outcome) => {
                self.state = outcome.state;
                self.last_events = outcome.events;
                if let Some(conclusion) = outcome.conclusion {
                    self.status = BattleStatus::Finished;
                    self.conclusion = Some(conclusion);
                }
                Ok(self.snapshot())
            }
            Err(violation) => {
                self.finish(Conclusion::without_winner(EndReason::Fault));
                Err(violation.into())
            }
        }
    }

    /// Stops the battle with no winner.
    pub fn terminate(&mut self) -> Result<BattleSnapshot, SessionError> {
        if self.status == BattleStatus::Finished {
            return Err(SessionError::transition(self.status, SessionOp::Terminate));
        }
        self.pending.clear();
        self.finish(Conclusion::without_winner(EndReason::Terminated));
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            session_id: self.id,
            status: self.status,
            elapsed_ticks: self.state.tick,
            combatants: self
                .state
                .combatants
                .iter()
                .map(CombatantSnapshot::from)
                .collect(),
            events: self.last_events.clone(),
            winner: self.winner(),
        }
    }

    /// Summary of a finished battle; `None` until then.
    pub fn report(&self) -> Option<BattleReport> {
        let conclusion = self.conclusion?;
        Some(BattleReport::new(
            self.id,
            &self.state,
            conclusion.winner,
            conclusion.reason,
        ))
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == BattleStatus::Finished
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn conclusion(&self) -> Option<Conclusion> {
        self.conclusion
    }

    pub fn winner(&self) -> Option<CombatantId> {
        self.conclusion.and_then(|c| c.winner)
    }

    fn require(&self, status: BattleStatus, operation: SessionOp) -> Result<(), SessionError> {
        if self.status == status {
            Ok(())
        } else {
            Err(SessionError::transition(self.status, operation))
        }
    }

    fn finish(&mut self, conclusion: Conclusion) {
        self.status = BattleStatus::Finished;
        self.conclusion = Some(conclusion);
        self.last_events = vec![BattleEvent::new(
            self.state.tick,
            EventKind::BattleEnded {
                winner: conclusion.winner,
                reason: conclusion.reason,
            },
        )];
    }
}

fn check_count(count: usize) -> Result<(), ValidationError> {
    if (ArenaConfig::MIN_COMBATANTS..=ArenaConfig::MAX_COMBATANTS).contains(&count) {
        Ok(())
    } else {
        Err(ValidationError::combatant_count(count))
    }
}

/// Checks count, ids, traits and explicit spawn points. Returns the resolved
/// trait sets in roster order.
fn validate_roster(
    specs: &[CombatantSpec],
    config: &ArenaConfig,
) -> Result<ArrayVec<TraitSet, { ArenaConfig::MAX_COMBATANTS }>, ValidationError> {
    check_count(specs.len())?;

    let mut resolved = ArrayVec::new();
    for (index, spec) in specs.iter().enumerate() {
        if specs[..index].iter().any(|earlier| earlier.id == spec.id) {
            return Err(ValidationError::DuplicateId(spec.id));
        }

        let traits = spec
            .traits
            .resolve()
            .map_err(|source| ValidationError::Trait {
                combatant: spec.id,
                source,
            })?;

        if let Some(point) = spec.spawn {
            if !config.contains(point) {
                return Err(ValidationError::SpawnOutOfBounds {
                    combatant: spec.id,
                    x: point.x,
                    y: point.y,
                });
            }
        }

        resolved.push(traits);
    }
    Ok(resolved)
}

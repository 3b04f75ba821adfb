//! Trait point budget.
//!
//! Designers share a fixed pool of trait points per bug. The simulation never
//! enforces it; collaborators opt in before starting a battle.

use arena_core::{CombatantSpec, TraitKind};

/// Points a bug may spread across its four traits.
pub const DEFAULT_BUDGET: u32 = 300;

/// Running tally of a spec against a budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraitBudget {
    pub limit: u32,
}

impl TraitBudget {
    pub const fn new(limit: u32) -> Self {
        Self { limit }
    }

    /// Points spent by `spec`. Missing or negative traits count as zero;
    /// range checks belong to session validation.
    pub fn spent(spec: &CombatantSpec) -> u32 {
        [
            TraitKind::Speed,
            TraitKind::Strength,
            TraitKind::Defense,
            TraitKind::Intelligence,
        ]
        .into_iter()
        .filter_map(|kind| spec.traits.get(kind))
        .map(|value| u32::try_from(value.max(0)).unwrap_or(u32::MAX))
        .fold(0u32, u32::saturating_add)
    }

    /// Points left for `spec`, negative when over budget.
    pub fn remaining(&self, spec: &CombatantSpec) -> i64 {
        i64::from(self.limit) - i64::from(Self::spent(spec))
    }

    pub fn allows(&self, spec: &CombatantSpec) -> bool {
        Self::spent(spec) <= self.limit
    }
}

impl Default for TraitBudget {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::TraitInput;

    #[test]
    fn spends_sum_of_present_traits() {
        let spec = CombatantSpec::new(0, "Mantis", TraitInput::new(90, 70, 40, 60));
        assert_eq!(TraitBudget::spent(&spec), 260);
        assert_eq!(TraitBudget::default().remaining(&spec), 40);
        assert!(TraitBudget::default().allows(&spec));
    }

    #[test]
    fn over_budget_is_refused() {
        let spec = CombatantSpec::new(1, "Titan", TraitInput::new(100, 100, 100, 50));
        assert!(!TraitBudget::default().allows(&spec));
        assert_eq!(TraitBudget::default().remaining(&spec), -50);
    }

    #[test]
    fn missing_traits_count_as_zero() {
        let mut spec = CombatantSpec::new(2, "Larva", TraitInput::new(10, 10, 10, 10));
        spec.traits.speed = None;
        assert_eq!(TraitBudget::spent(&spec), 30);
    }
}

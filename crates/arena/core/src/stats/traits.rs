//! Raw trait inputs and the validated [`TraitSet`].

/// The four numeric traits a combatant is designed with.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TraitKind {
    Speed,
    Strength,
    Defense,
    Intelligence,
}

/// Reasons a trait value is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TraitError {
    #[error("trait `{kind}` is missing")]
    Missing { kind: TraitKind },

    #[error("trait `{kind}` = {value} is outside [0, {max}]", max = TraitSet::MAX)]
    OutOfRange { kind: TraitKind, value: i64 },
}

/// Unvalidated traits as supplied by a collaborator (designer UI, roster file).
///
/// Every field is optional so that a missing trait can be reported instead of
/// silently defaulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraitInput {
    pub speed: Option<i64>,
    pub strength: Option<i64>,
    pub defense: Option<i64>,
    pub intelligence: Option<i64>,
}

impl TraitInput {
    /// Input with every trait present.
    pub const fn new(speed: i64, strength: i64, defense: i64, intelligence: i64) -> Self {
        Self {
            speed: Some(speed),
            strength: Some(strength),
            defense: Some(defense),
            intelligence: Some(intelligence),
        }
    }

    pub const fn get(&self, kind: TraitKind) -> Option<i64> {
        match kind {
            TraitKind::Speed => self.speed,
            TraitKind::Strength => self.strength,
            TraitKind::Defense => self.defense,
            TraitKind::Intelligence => self.intelligence,
        }
    }

    /// Validates every trait, reporting the first failure in declaration order.
    pub fn resolve(&self) -> Result<TraitSet, TraitError> {
        let value = |kind: TraitKind| -> Result<u8, TraitError> {
            let raw = self.get(kind).ok_or(TraitError::Missing { kind })?;
            TraitSet::check_value(kind, raw)
        };

        Ok(TraitSet {
            speed: value(TraitKind::Speed)?,
            strength: value(TraitKind::Strength)?,
            defense: value(TraitKind::Defense)?,
            intelligence: value(TraitKind::Intelligence)?,
        })
    }
}

impl From<TraitSet> for TraitInput {
    fn from(traits: TraitSet) -> Self {
        Self::new(
            traits.speed.into(),
            traits.strength.into(),
            traits.defense.into(),
            traits.intelligence.into(),
        )
    }
}

/// Validated traits, each in `[0, 100]`. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitSet {
    speed: u8,
    strength: u8,
    defense: u8,
    intelligence: u8,
}

impl TraitSet {
    /// Upper bound of every trait.
    pub const MAX: u8 = 100;

    pub fn new(
        speed: i64,
        strength: i64,
        defense: i64,
        intelligence: i64,
    ) -> Result<Self, TraitError> {
        TraitInput::new(speed, strength, defense, intelligence).resolve()
    }

    pub const fn speed(&self) -> u8 {
        self.speed
    }

    pub const fn strength(&self) -> u8 {
        self.strength
    }

    pub const fn defense(&self) -> u8 {
        self.defense
    }

    pub const fn intelligence(&self) -> u8 {
        self.intelligence
    }

    pub const fn get(&self, kind: TraitKind) -> u8 {
        match kind {
            TraitKind::Speed => self.speed,
            TraitKind::Strength => self.strength,
            TraitKind::Defense => self.defense,
            TraitKind::Intelligence => self.intelligence,
        }
    }

    /// Sum of all four traits, for point-budget checks.
    pub fn total(&self) -> u32 {
        u32::from(self.speed)
            + u32::from(self.strength)
            + u32::from(self.defense)
            + u32::from(self.intelligence)
    }

    /// Re-checks ranges on a set that bypassed [`TraitSet::new`] (e.g. deserialized).
    pub fn check(&self) -> Result<(), TraitError> {
        use strum::IntoEnumIterator;

        TraitKind::iter()
            .try_for_each(|kind| Self::check_value(kind, self.get(kind).into()).map(|_| ()))
    }

    fn check_value(kind: TraitKind, raw: i64) -> Result<u8, TraitError> {
        if (0..=i64::from(Self::MAX)).contains(&raw) {
            Ok(raw as u8)
        } else {
            Err(TraitError::OutOfRange { kind, value: raw })
        }
    }
}

//! Execution stages and the [`Stages`] flag set.
//!
//! Every contributor declares, once, the stages it participates in by
//! OR-ing flags together. The driver visits stages in a fixed global
//! order; at each one it invokes only the contributors whose declared
//! set contains that stage.
//!
//! The bit values are part of the public contract and never change:
//!
//! | Stage | Bit |
//! |-------|-----|
//! | `BEFORE_FIELD_UPDATE` | 0 |
//! | `AT_FIELD_UPDATE` | 1 |
//! | `AFTER_FIELD_UPDATE` | 2 |
//! | `BEFORE_MATERIAL_MODEL` | 3 |
//! | `AT_MATERIAL_MODEL` | 4 |
//! | `AFTER_MATERIAL_MODEL` | 5 |
//! | `BEFORE_SECONDARIES` | 6 |
//! | `AT_SECONDARIES` | 7 |
//! | `AFTER_SECONDARIES` | 8 |
//! | `AFTER_CORRECTION` | 9 |
//! | `AFTER_CONFIGURATION` | 10 |

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A single execution stage a contributor can hook into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Before primary fields are updated within a close.
    BeforeFieldUpdate,
    /// Primary field update.
    AtFieldUpdate,
    /// After primary fields are updated.
    AfterFieldUpdate,
    /// Before material models run; predictors live here.
    BeforeMaterialModel,
    /// Material (constitutive) models.
    AtMaterialModel,
    /// After material models.
    AfterMaterialModel,
    /// Before secondary quantities, after nodal acceleration is known.
    BeforeSecondaries,
    /// Secondary quantities.
    AtSecondaries,
    /// After secondary quantities.
    AfterSecondaries,
    /// After the velocity correction that ends a step.
    AfterCorrection,
    /// After the configuration (geometry) has been updated.
    AfterConfiguration,
}

impl Stage {
    /// All stages, in bit order.
    pub const ALL: [Stage; 11] = [
        Stage::BeforeFieldUpdate,
        Stage::AtFieldUpdate,
        Stage::AfterFieldUpdate,
        Stage::BeforeMaterialModel,
        Stage::AtMaterialModel,
        Stage::AfterMaterialModel,
        Stage::BeforeSecondaries,
        Stage::AtSecondaries,
        Stage::AfterSecondaries,
        Stage::AfterCorrection,
        Stage::AfterConfiguration,
    ];

    /// The flag set containing only this stage.
    pub const fn flag(self) -> Stages {
        Stages(1u64 << self as u32)
    }

    /// Hook name, used in diagnostics and trace spans.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeFieldUpdate => "before_field_update",
            Self::AtFieldUpdate => "at_field_update",
            Self::AfterFieldUpdate => "after_field_update",
            Self::BeforeMaterialModel => "before_material_model",
            Self::AtMaterialModel => "at_material_model",
            Self::AfterMaterialModel => "after_material_model",
            Self::BeforeSecondaries => "before_secondaries",
            Self::AtSecondaries => "at_secondaries",
            Self::AfterSecondaries => "after_secondaries",
            Self::AfterCorrection => "after_correction",
            Self::AfterConfiguration => "after_configuration",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable set of [`Stage`]s, combinable with `|`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stages(u64);

impl Stages {
    /// The empty set.
    pub const NONE: Stages = Stages(0);
    /// See [`Stage::BeforeFieldUpdate`].
    pub const BEFORE_FIELD_UPDATE: Stages = Stage::BeforeFieldUpdate.flag();
    /// See [`Stage::AtFieldUpdate`].
    pub const AT_FIELD_UPDATE: Stages = Stage::AtFieldUpdate.flag();
    /// See [`Stage::AfterFieldUpdate`].
    pub const AFTER_FIELD_UPDATE: Stages = Stage::AfterFieldUpdate.flag();
    /// See [`Stage::BeforeMaterialModel`].
    pub const BEFORE_MATERIAL_MODEL: Stages = Stage::BeforeMaterialModel.flag();
    /// See [`Stage::AtMaterialModel`].
    pub const AT_MATERIAL_MODEL: Stages = Stage::AtMaterialModel.flag();
    /// See [`Stage::AfterMaterialModel`].
    pub const AFTER_MATERIAL_MODEL: Stages = Stage::AfterMaterialModel.flag();
    /// See [`Stage::BeforeSecondaries`].
    pub const BEFORE_SECONDARIES: Stages = Stage::BeforeSecondaries.flag();
    /// See [`Stage::AtSecondaries`].
    pub const AT_SECONDARIES: Stages = Stage::AtSecondaries.flag();
    /// See [`Stage::AfterSecondaries`].
    pub const AFTER_SECONDARIES: Stages = Stage::AfterSecondaries.flag();
    /// See [`Stage::AfterCorrection`].
    pub const AFTER_CORRECTION: Stages = Stage::AfterCorrection.flag();
    /// See [`Stage::AfterConfiguration`].
    pub const AFTER_CONFIGURATION: Stages = Stage::AfterConfiguration.flag();
    /// Every defined stage.
    pub const ALL: Stages = Stages((1u64 << Stage::ALL.len()) - 1);

    /// Build a set from raw bits, rejecting bits that name no stage.
    pub const fn from_bits(bits: u64) -> Option<Stages> {
        if bits & !Self::ALL.0 == 0 {
            Some(Stages(bits))
        } else {
            None
        }
    }

    /// Build a set from raw bits without validation.
    ///
    /// Undefined bits are kept so that the registry can report them.
    pub const fn from_bits_retain(bits: u64) -> Stages {
        Stages(bits)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether every stage in `other` is also in `self`.
    pub const fn contains(self, other: Stages) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether `stage` is in the set.
    pub const fn has(self, stage: Stage) -> bool {
        self.contains(stage.flag())
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bits that do not correspond to any [`Stage`].
    pub const fn undefined_bits(self) -> u64 {
        self.0 & !Self::ALL.0
    }

    /// Iterate the contained stages in bit order.
    pub fn iter(self) -> impl Iterator<Item = Stage> {
        Stage::ALL.into_iter().filter(move |s| self.has(*s))
    }
}

impl BitOr for Stages {
    type Output = Stages;

    fn bitor(self, rhs: Stages) -> Stages {
        Stages(self.0 | rhs.0)
    }
}

impl BitOrAssign for Stages {
    fn bitor_assign(&mut self, rhs: Stages) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Stages {
    type Output = Stages;

    fn bitand(self, rhs: Stages) -> Stages {
        Stages(self.0 & rhs.0)
    }
}

impl From<Stage> for Stages {
    fn from(stage: Stage) -> Self {
        stage.flag()
    }
}

impl FromIterator<Stage> for Stages {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        iter.into_iter().fold(Stages::NONE, |acc, s| acc | s.flag())
    }
}

impl fmt::Display for Stages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for stage in self.iter() {
            if !first {
                f.write_str(" | ")?;
            }
            f.write_str(stage.name())?;
            first = false;
        }
        if first {
            f.write_str("(none)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bits_are_stable() {
        assert_eq!(Stages::BEFORE_FIELD_UPDATE.bits(), 1);
        assert_eq!(Stages::BEFORE_MATERIAL_MODEL.bits(), 1 << 3);
        assert_eq!(Stages::AFTER_CORRECTION.bits(), 1 << 9);
        assert_eq!(Stages::AFTER_CONFIGURATION.bits(), 1 << 10);
        assert_eq!(Stages::ALL.bits(), 0x7ff);
    }

    #[test]
    fn or_combines_declarations() {
        let s = Stages::BEFORE_MATERIAL_MODEL | Stages::BEFORE_SECONDARIES | Stages::AFTER_CORRECTION;
        assert!(s.has(Stage::BeforeMaterialModel));
        assert!(s.has(Stage::BeforeSecondaries));
        assert!(s.has(Stage::AfterCorrection));
        assert!(!s.has(Stage::AtMaterialModel));
        assert_eq!(s.iter().count(), 3);
    }

    #[test]
    fn from_bits_rejects_undefined() {
        assert!(Stages::from_bits(1 << 11).is_none());
        assert_eq!(Stages::from_bits(0b11), Some(Stages::BEFORE_FIELD_UPDATE | Stages::AT_FIELD_UPDATE));
        assert_eq!(Stages::from_bits_retain(1 << 20).undefined_bits(), 1 << 20);
    }

    #[test]
    fn display_lists_hook_names() {
        let s = Stages::AT_SECONDARIES | Stages::BEFORE_FIELD_UPDATE;
        assert_eq!(s.to_string(), "before_field_update | at_secondaries");
        assert_eq!(Stages::NONE.to_string(), "(none)");
    }

    proptest! {
        #[test]
        fn collect_then_iter_round_trips(bits in 0u64..0x800) {
            let s = Stages::from_bits(bits).unwrap();
            let back: Stages = s.iter().collect();
            prop_assert_eq!(s, back);
        }

        #[test]
        fn or_is_superset(a in 0u64..0x800, b in 0u64..0x800) {
            let sa = Stages::from_bits(a).unwrap();
            let sb = Stages::from_bits(b).unwrap();
            prop_assert!((sa | sb).contains(sa));
            prop_assert!((sa | sb).contains(sb));
        }
    }
}

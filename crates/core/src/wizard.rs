//! Configurator step machine.
//!
//! ```text
//! Slot(Headwear) -> Slot(Top) -> Slot(Bottom) -> Slot(Shoes) -> Summary
//! ```
//!
//! Transitions are linear in both directions. There is no skipping and no
//! branching; `next` on the summary and `back` on the first step do nothing.

use serde::{Deserialize, Serialize};

use crate::catalog::OutfitSlot;
use crate::outfit::Outfit;

/// A configurator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "slot", rename_all = "snake_case")]
pub enum WizardStep {
    Slot(OutfitSlot),
    Summary,
}

impl WizardStep {
    /// Every step in order.
    pub const ALL: [Self; 5] = [
        Self::Slot(OutfitSlot::Headwear),
        Self::Slot(OutfitSlot::Top),
        Self::Slot(OutfitSlot::Bottom),
        Self::Slot(OutfitSlot::Shoes),
        Self::Summary,
    ];

    /// Zero-based position in [`WizardStep::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Slot(OutfitSlot::Headwear) => 0,
            Self::Slot(OutfitSlot::Top) => 1,
            Self::Slot(OutfitSlot::Bottom) => 2,
            Self::Slot(OutfitSlot::Shoes) => 3,
            Self::Summary => 4,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slot(slot) => slot.label(),
            Self::Summary => "Shrnutí",
        }
    }

    #[must_use]
    pub const fn slot(self) -> Option<OutfitSlot> {
        match self {
            Self::Slot(slot) => Some(slot),
            Self::Summary => None,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Slot(OutfitSlot::Headwear) => Self::Slot(OutfitSlot::Top),
            Self::Slot(OutfitSlot::Top) => Self::Slot(OutfitSlot::Bottom),
            Self::Slot(OutfitSlot::Bottom) => Self::Slot(OutfitSlot::Shoes),
            Self::Slot(OutfitSlot::Shoes) | Self::Summary => Self::Summary,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Slot(OutfitSlot::Headwear | OutfitSlot::Top) => {
                Self::Slot(OutfitSlot::Headwear)
            }
            Self::Slot(OutfitSlot::Bottom) => Self::Slot(OutfitSlot::Top),
            Self::Slot(OutfitSlot::Shoes) => Self::Slot(OutfitSlot::Bottom),
            Self::Summary => Self::Slot(OutfitSlot::Shoes),
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Slot(OutfitSlot::Headwear)
    }
}

/// Where the visitor is in the configurator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    step: WizardStep,
}

impl Wizard {
    /// Number of steps, summary included.
    pub const STEP_COUNT: usize = WizardStep::ALL.len();

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// One-based step number for progress display.
    #[must_use]
    pub const fn step_number(&self) -> usize {
        self.step.index() + 1
    }

    #[must_use]
    pub const fn is_summary(&self) -> bool {
        matches!(self.step, WizardStep::Summary)
    }

    /// Advance one step. Returns the new step.
    pub const fn next(&mut self) -> WizardStep {
        self.step = self.step.next();
        self.step
    }

    /// Go back one step. Returns the new step.
    pub const fn back(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    /// Whether the outfit may be committed to the cart from here.
    ///
    /// Only the summary step commits, and only a non-empty outfit.
    #[must_use]
    pub fn can_commit(&self, outfit: &Outfit) -> bool {
        self.is_summary() && !outfit.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::ClothingType;
    use crate::catalog::fixtures::product;
    use crate::outfit::OutfitComposer;

    #[test]
    fn test_starts_at_headwear() {
        let wizard = Wizard::new();
        assert_eq!(wizard.step(), WizardStep::Slot(OutfitSlot::Headwear));
        assert_eq!(wizard.step_number(), 1);
    }

    #[test]
    fn test_walks_forward_without_skipping() {
        let mut wizard = Wizard::new();
        let visited: Vec<WizardStep> = (0..4).map(|_| wizard.next()).collect();

        assert_eq!(visited, WizardStep::ALL[1..].to_vec());
        assert!(wizard.is_summary());
        assert_eq!(wizard.step_number(), Wizard::STEP_COUNT);
    }

    #[test]
    fn test_summary_is_terminal_forward() {
        let mut wizard = Wizard::new();
        for _ in 0..10 {
            wizard.next();
        }
        assert_eq!(wizard.step(), WizardStep::Summary);
    }

    #[test]
    fn test_back_from_summary_and_floor_at_start() {
        let mut wizard = Wizard::new();
        for _ in 0..4 {
            wizard.next();
        }

        assert_eq!(wizard.back(), WizardStep::Slot(OutfitSlot::Shoes));
        for _ in 0..10 {
            wizard.back();
        }
        assert_eq!(wizard.step(), WizardStep::Slot(OutfitSlot::Headwear));
    }

    #[test]
    fn test_commit_only_from_summary_with_items() {
        let mut wizard = Wizard::new();
        let mut composer = OutfitComposer::new();
        composer.select_for_slot(&product("t1", ClothingType::Top, 890));

        assert!(!wizard.can_commit(composer.outfit()));
        for _ in 0..4 {
            wizard.next();
        }
        assert!(wizard.can_commit(composer.outfit()));
        assert!(!wizard.can_commit(&Outfit::default()));
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = WizardStep::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["Hlava", "Svršek", "Spodek", "Obuv", "Shrnutí"]);
    }

    #[test]
    fn test_step_serializes_tagged() {
        let json = serde_json::to_string(&WizardStep::Slot(OutfitSlot::Top)).unwrap();
        assert_eq!(json, r#"{"kind":"slot","slot":"top"}"#);
        let json = serde_json::to_string(&WizardStep::Summary).unwrap();
        assert_eq!(json, r#"{"kind":"summary"}"#);
    }
}

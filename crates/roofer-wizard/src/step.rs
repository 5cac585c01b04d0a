//! Wizard steps and progress.

use serde::{Deserialize, Serialize};

/// Steps in the estimate wizard.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum WizardStep {
    /// Zip code and relation to the property.
    #[default]
    Property,
    /// Roof type, age, stories and size.
    Roof,
    /// Current problem and how long it has been going on.
    Situation,
    /// Contact links. Terminal.
    Contact,
}

/// Display state of one step indicator dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotState {
    Active,
    Completed,
    Pending,
}

impl WizardStep {
    /// All steps in order.
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Property,
        WizardStep::Roof,
        WizardStep::Situation,
        WizardStep::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Property => "property",
            WizardStep::Roof => "roof",
            WizardStep::Situation => "situation",
            WizardStep::Contact => "contact",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WizardStep::Property => "Your Property",
            WizardStep::Roof => "Your Roof",
            WizardStep::Situation => "The Problem",
            WizardStep::Contact => "Get in Touch",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Property => 1,
            WizardStep::Roof => 2,
            WizardStep::Situation => 3,
            WizardStep::Contact => 4,
        }
    }

    /// Step for a 1-indexed number.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// The following step, if any.
    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, if any.
    pub fn prev(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Check if this is the last step.
    pub fn is_terminal(&self) -> bool {
        *self == WizardStep::Contact
    }

    /// Progress bar width: 0, 33, 66 or 100.
    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.number() - 1) * 100 / 3) as u8
    }

    /// Indicator state for every step, in order.
    pub fn indicators(&self) -> [DotState; 4] {
        Self::ALL.map(|step| {
            if step == *self {
                DotState::Active
            } else if step < *self {
                DotState::Completed
            } else {
                DotState::Pending
            }
        })
    }
}

//! Wizard navigation state machine.

use std::fmt;

use roofer_core::ClientConfig;

use crate::contact::ContactLinks;
use crate::state::{Field, WizardState};
use crate::step::{DotState, WizardStep};

/// A refused forward transition and the fields that blocked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Step the user is on.
    pub step: WizardStep,
    /// Required fields still empty, in form order.
    pub missing: Vec<Field>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(|m| m.display_name()).collect();
        write!(
            f,
            "Step {} incomplete, missing: {}",
            self.step.number(),
            names.join(", ")
        )
    }
}

/// Errors from wizard navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{0}")]
    StepIncomplete(Rejection),

    #[error("Wizard is already on its final step")]
    AlreadyComplete,
}

/// Result of a successful forward transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to an intermediate step.
    Moved(WizardStep),
    /// Reached the final step; links are ready.
    Completed(ContactLinks),
}

/// Check whether `state` may leave `step`.
pub fn validate_step(state: &WizardState, step: WizardStep) -> Result<(), Rejection> {
    let missing = state.missing_for(step);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Rejection { step, missing })
    }
}

/// One wizard session: answers, the config in effect and, once the final
/// step is reached, the contact links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardContext {
    state: WizardState,
    config: ClientConfig,
    links: Option<ContactLinks>,
}

impl WizardContext {
    /// Start a session with `config`.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            state: WizardState::new(),
            config,
            links: None,
        }
    }

    /// Start a session with the built-in config, before loading finishes.
    pub fn with_built_in() -> Self {
        Self::new(ClientConfig::built_in())
    }

    /// Current answers.
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Mutable answers, for input handlers.
    pub fn state_mut(&mut self) -> &mut WizardState {
        &mut self.state
    }

    /// Config in effect.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the config when loading completes.
    ///
    /// Links already shown on the final step are rebuilt with the new
    /// contacts.
    pub fn apply_config(&mut self, config: ClientConfig) {
        self.config = config;
        if self.links.is_some() {
            self.links = Some(ContactLinks::build(&self.config, &self.state));
        }
    }

    /// Current step.
    pub fn step(&self) -> WizardStep {
        self.state.step()
    }

    /// Progress bar width for the current step.
    pub fn progress_percent(&self) -> u8 {
        self.step().progress_percent()
    }

    /// Step indicator states for the current step.
    pub fn indicators(&self) -> [DotState; 4] {
        self.step().indicators()
    }

    /// Required fields on the current step that are still empty.
    pub fn missing_fields(&self) -> Vec<Field> {
        self.state.missing_for(self.step())
    }

    /// Contact links, once the final step is reached.
    pub fn links(&self) -> Option<&ContactLinks> {
        self.links.as_ref()
    }

    /// Validate the current step and move forward one step.
    pub fn next(&mut self) -> Result<Advance, WizardError> {
        let current = self.step();
        let next = current.next().ok_or(WizardError::AlreadyComplete)?;

        validate_step(&self.state, current).map_err(WizardError::StepIncomplete)?;
        self.state.set_step(next);

        if next.is_terminal() {
            let links = ContactLinks::build(&self.config, &self.state);
            self.links = Some(links.clone());
            Ok(Advance::Completed(links))
        } else {
            Ok(Advance::Moved(next))
        }
    }

    /// Move back one step. A no-op on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step().prev() {
            self.state.set_step(prev);
            self.links = None;
        }
        self.step()
    }
}

impl Default for WizardContext {
    fn default() -> Self {
        Self::with_built_in()
    }
}

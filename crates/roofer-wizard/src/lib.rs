//! Estimate wizard for the roofing estimate platform.
//!
//! This crate holds the wizard logic with no UI attached:
//! - `WizardStep` - The four steps, progress and step indicators
//! - `WizardState` - Collected answers
//! - `WizardContext` - Validated navigation over a state and config
//! - `ContactLinks` - Outbound messaging, SMS and email links
//! - `ConfigLoader` - Page-side config loading with one default retry

mod contact;
mod flow;
mod labels;
mod loader;
mod state;
mod step;

pub use contact::*;
pub use flow::*;
pub use labels::*;
pub use loader::*;
pub use state::*;
pub use step::*;

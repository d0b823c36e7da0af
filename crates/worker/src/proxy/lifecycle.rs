//! Worker lifecycle state machine.
//!
//! A worker moves Parsed -> Installing -> Installed -> Activating ->
//! Activated; Redundant is terminal and marks a failed or replaced
//! instance. Invalid transitions are rejected, never silently applied.

use shltr_core::Error;

/// Lifecycle states of the offline proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// Constructed, nothing fetched yet.
    #[default]
    Parsed,
    /// Pre-caching the app shell.
    Installing,
    /// Shell cached, eligible to activate.
    Installed,
    /// Purging stale generations.
    Activating,
    /// Controlling requests.
    Activated,
    /// Failed or replaced; never handles anything again.
    Redundant,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        }
    }
}

/// Check if a state transition is valid.
fn is_valid_transition(from: WorkerState, to: WorkerState) -> bool {
    use WorkerState::*;

    matches!(
        (from, to),
        (Parsed, Installing)
            | (Installing, Installed)
            | (Installing, Redundant)
            | (Installed, Activating)
            | (Activating, Activated)
            | (Activating, Redundant)
            | (Activated, Redundant)
    )
}

/// Apply a transition, rejecting anything the lifecycle does not allow.
pub(crate) fn transition(state: &mut WorkerState, to: WorkerState) -> Result<(), Error> {
    let from = *state;
    if !is_valid_transition(from, to) {
        return Err(Error::InvalidTransition { from: from.as_str(), to: to.as_str() });
    }
    tracing::debug!(from = from.as_str(), to = to.as_str(), "lifecycle transition");
    *state = to;
    Ok(())
}

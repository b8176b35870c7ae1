//! Worker lifecycle state machine.
//!
//! ```text
//! Uninitialized --Install--> Installing --Installed--> Waiting --Activate--> Active
//!       ^                        |                        |                    |
//!       +-----InstallFailed------+                    Supersede            Supersede
//!                                                         v                    v
//!                                                     Superseded <-------------+
//! ```

use serde::Serialize;

use crate::error::{EdgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Uninitialized,
    Installing,
    /// Installed, waiting to take over from the current controller
    Waiting,
    Active,
    Superseded,
}

/// Lifecycle triggers supplied by the hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Install,
    Installed,
    InstallFailed,
    Activate,
    Supersede,
}

impl WorkerState {
    /// Applies `event`, failing when it is not valid from the current state.
    pub fn on(self, event: LifecycleEvent) -> Result<WorkerState> {
        use LifecycleEvent::*;
        use WorkerState::*;

        let next = match (self, event) {
            (Uninitialized, Install) => Installing,
            (Installing, Installed) => Waiting,
            (Installing, InstallFailed) => Uninitialized,
            (Waiting, Activate) => Active,
            (Waiting, Supersede) | (Active, Supersede) => Superseded,
            (state, event) => {
                return Err(EdgeError::Lifecycle(format!(
                    "{:?} is not valid while {:?}",
                    event, state
                )))
            }
        };
        Ok(next)
    }

    /// Only an active worker intercepts fetches.
    pub fn intercepts(self) -> bool {
        self == WorkerState::Active
    }
}

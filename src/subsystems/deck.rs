//! # Deck presence gate
//!
//! Before entering the control loop the mission asks once whether the expansion decks it relies on are mounted.
//! What happens when they are not is a configuration choice, see [DeckPolicy].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Hardware presence check
#[async_trait]
pub trait DeckCheck {
    /// True if every required deck is detected
    async fn decks_mounted(&self) -> bool;
}

/// Reaction to a failed [DeckCheck]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckPolicy {
    /// Log a warning and fly anyway
    #[default]
    Warn,
    /// Never fly: hold the mission in a do-nothing loop
    Halt,
}

/// Outcome of the startup gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The control loop may run
    Proceed,
    /// The mission is permanently grounded
    Halted,
}

impl DeckPolicy {
    /// Decide the [Gate] from the deck check result
    pub fn gate(&self, decks_mounted: bool) -> Gate {
        match (decks_mounted, self) {
            (true, _) => Gate::Proceed,
            (false, DeckPolicy::Warn) => {
                log::warn!("Required decks not detected, continuing anyway");
                Gate::Proceed
            }
            (false, DeckPolicy::Halt) => {
                log::error!("Required decks not detected, mission halted");
                Gate::Halted
            }
        }
    }
}

/// A [DeckCheck] that always reports the decks as mounted
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeckCheck;

#[async_trait]
impl DeckCheck for NoDeckCheck {
    async fn decks_mounted(&self) -> bool {
        true
    }
}

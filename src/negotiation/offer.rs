//! Offers and the negotiation event log.

use serde::{Deserialize, Serialize};

use super::resolution::Outcome;
use crate::actor::ActorId;

/// A challenge sent from one actor to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Challenging actor
    pub sender: ActorId,
    /// Position the sender demands (its own, at send time)
    pub target_position: f64,
    /// Sender's expected utility of the challenge
    pub expected_utility: f64,
}

/// Record of one resolved inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationEvent {
    /// Round the resolution happened in
    pub round: usize,
    /// Actor whose inbox was resolved
    pub actor: ActorId,
    /// Sender of the winning offer
    pub counterpart: ActorId,
    /// How the actor responded
    pub outcome: Outcome,
    /// Actor's position before resolution
    pub before: f64,
    /// Actor's position after resolution
    pub after: f64,
    /// EU carried by the offer (Uj)
    pub offer_eu: f64,
    /// Actor's own EU of challenging the sender (Ui)
    pub own_eu: f64,
}

impl NegotiationEvent {
    /// True if the actor's position changed
    pub fn moved(&self) -> bool {
        self.after != self.before
    }

    /// One-line narration using the given actor names
    pub fn describe(&self, actor: &str, counterpart: &str) -> String {
        match self.outcome {
            Outcome::Stands => format!(
                "round {}: {actor} stands firm against {counterpart} (own EU {:.4} > offer EU {:.4})",
                self.round, self.own_eu, self.offer_eu
            ),
            outcome => format!(
                "round {}: {actor} {} to {counterpart}, {:.4} -> {:.4} (offer EU {:.4}, own EU {:.4})",
                self.round,
                outcome.verb(),
                self.before,
                self.after,
                self.offer_eu,
                self.own_eu
            ),
        }
    }
}

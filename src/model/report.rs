//! Serializable run summary.

use serde::{Deserialize, Serialize};

use super::{Model, RoundRecord};
use crate::actor::ActorSpec;
use crate::error::Result;
use crate::negotiation::NegotiationEvent;

/// Snapshot of a model run, suitable for JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Status-quo weight
    pub q: f64,
    /// Optimism weight
    pub t: f64,
    /// Lower bound of the issue space
    pub xmin: f64,
    /// Upper bound of the issue space
    pub xmax: f64,
    /// Rounds played
    pub rounds: usize,
    /// Actors at their current positions
    pub actors: Vec<ActorSpec>,
    /// Per-round summaries, starting with round 0
    pub history: Vec<RoundRecord>,
    /// Every resolution, in order
    pub events: Vec<NegotiationEvent>,
    /// Latest expected-utility matrix, one row per challenger
    pub expected_utility: Vec<Vec<f64>>,
}

impl RunReport {
    /// Capture the model's current state
    pub fn from_model(model: &Model) -> Self {
        let (xmin, xmax) = model.range();
        let matrix = model.expected_utility_matrix();

        Self {
            q: model.config().q,
            t: model.config().t,
            xmin,
            xmax,
            rounds: model.rounds_played(),
            actors: model.actors().iter().map(|a| a.spec()).collect(),
            history: model.history().to_vec(),
            events: model.events().to_vec(),
            expected_utility: matrix.rows().into_iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// Final record
    pub fn last(&self) -> Option<&RoundRecord> {
        self.history.last()
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

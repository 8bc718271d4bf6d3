//! Offer resolution rules and pair quadrants.

use serde::{Deserialize, Serialize};

/// How an actor responds to the strongest offer in its inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Would challenge back, but loses: adopts the offer's position
    ConflictLoss,
    /// Meets the sender part of the way
    Compromise,
    /// Gives in entirely: adopts the offer's position
    Capitulation,
    /// Own challenge is stronger; settled from the sender's side
    Stands,
}

impl Outcome {
    /// Pick the response given the recipient's own EU against the sender (`own_eu`, Ui)
    /// and the offer's EU (`offer_eu`, Uj).
    ///
    /// Rules are checked in order. Returns `None` when none applies: an exact
    /// tie (`Ui == 0`, `Ui == Uj`, `|Ui| == Uj`) or a non-finite value.
    pub fn decide(own_eu: f64, offer_eu: f64) -> Option<Self> {
        if !own_eu.is_finite() || !offer_eu.is_finite() {
            return None;
        }

        if own_eu > 0.0 && own_eu < offer_eu {
            Some(Outcome::ConflictLoss)
        } else if own_eu < 0.0 && own_eu.abs() < offer_eu {
            Some(Outcome::Compromise)
        } else if own_eu < 0.0 && own_eu.abs() > offer_eu {
            Some(Outcome::Capitulation)
        } else if own_eu > 0.0 && own_eu > offer_eu {
            Some(Outcome::Stands)
        } else {
            None
        }
    }

    /// New position for an actor at `position` taking this outcome.
    pub fn apply(self, position: f64, target: f64, own_eu: f64, offer_eu: f64) -> f64 {
        match self {
            Outcome::ConflictLoss | Outcome::Capitulation => target,
            Outcome::Compromise => position + (target - position) * (own_eu / offer_eu).abs(),
            Outcome::Stands => position,
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::ConflictLoss => "conflict loss",
            Outcome::Compromise => "compromise",
            Outcome::Capitulation => "capitulation",
            Outcome::Stands => "stands",
        }
    }

    pub(crate) fn verb(self) -> &'static str {
        match self {
            Outcome::ConflictLoss => "loses a conflict",
            Outcome::Compromise => "compromises",
            Outcome::Capitulation => "capitulates",
            Outcome::Stands => "stands firm",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Relationship of an ordered pair `(i, j)`, seen from `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Both want to challenge
    Conflict,
    /// `i` challenges, `j` would meet it part way
    AlterCompromises,
    /// `i` challenges, `j` would give in
    AlterCapitulates,
    /// `j` challenges, `i` would meet it part way
    ActorCompromises,
    /// `j` challenges, `i` would give in
    ActorCapitulates,
    /// Neither wants to challenge
    StatusQuo,
}

impl Quadrant {
    /// Classify from `eu_ij = EU(i → j)` and `eu_ji = EU(j → i)`.
    ///
    /// Uses the resolution thresholds; exact ties on the yield boundary count
    /// as capitulation.
    pub fn classify(eu_ij: f64, eu_ji: f64) -> Self {
        match (eu_ij > 0.0, eu_ji > 0.0) {
            (true, true) => Quadrant::Conflict,
            (true, false) if eu_ji.abs() < eu_ij => Quadrant::AlterCompromises,
            (true, false) => Quadrant::AlterCapitulates,
            (false, true) if eu_ij.abs() < eu_ji => Quadrant::ActorCompromises,
            (false, true) => Quadrant::ActorCapitulates,
            (false, false) => Quadrant::StatusQuo,
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Quadrant::Conflict => "conflict",
            Quadrant::AlterCompromises => "alter compromises",
            Quadrant::AlterCapitulates => "alter capitulates",
            Quadrant::ActorCompromises => "actor compromises",
            Quadrant::ActorCapitulates => "actor capitulates",
            Quadrant::StatusQuo => "status quo",
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

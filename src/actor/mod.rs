//! Actors and rosters.
//!
//! An [`Actor`] pairs immutable identity (name, capability, salience) with the
//! mutable negotiation state the model rewrites every round: position, risk
//! exponent, per-counterpart caches and the offer inbox.
//!
//! Caches are fixed-size vectors indexed by [`ActorId`], sized to the
//! population at construction. The entry for the actor itself is always
//! `None`, so "never keyed by self" holds structurally.

mod roster;

pub use roster::Roster;

use serde::{Deserialize, Serialize};

use crate::error::{BdmError, Result};
use crate::model::{PairEvaluation, Utilities};
use crate::negotiation::Offer;

/// Stable actor index, assigned at model construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub usize);

impl ActorId {
    /// Position in the model's actor list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Actor#{}", self.0)
    }
}

/// Construction record for one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpec {
    /// Unique name
    pub name: String,
    /// Preferred position on the issue
    pub x: f64,
    /// Capability / power
    pub c: f64,
    /// Salience of the issue
    pub s: f64,
}

impl ActorSpec {
    /// Create a new actor record
    pub fn new(name: impl Into<String>, x: f64, c: f64, s: f64) -> Self {
        Self {
            name: name.into(),
            x,
            c,
            s,
        }
    }

    /// Check the record's fields are usable
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| BdmError::InvalidActor {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if !self.x.is_finite() {
            return Err(invalid("position is not finite"));
        }
        if !self.c.is_finite() || self.c < 0.0 {
            return Err(invalid("capability must be finite and non-negative"));
        }
        if !(0.0..=1.0).contains(&self.s) {
            return Err(invalid("salience must be in [0, 1]"));
        }
        Ok(())
    }
}

/// A negotiating actor.
#[derive(Debug, Clone)]
pub struct Actor {
    id: ActorId,
    name: String,
    x: f64,
    c: f64,
    s: f64,
    r: f64,
    /// Utilities, probability and EU against each counterpart; `None` at `id`.
    evaluations: Vec<Option<PairEvaluation>>,
    /// Offers received this round
    inbox: Vec<Offer>,
}

impl Actor {
    /// Create an actor bound to a population of `population` actors.
    pub fn new(id: ActorId, spec: ActorSpec, population: usize) -> Self {
        Self {
            id,
            name: spec.name,
            x: spec.x,
            c: spec.c,
            s: spec.s,
            r: 1.0,
            evaluations: vec![None; population],
            inbox: Vec::new(),
        }
    }

    /// Get actor index
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Get actor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Capability
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Salience
    pub fn s(&self) -> f64 {
        self.s
    }

    /// Current risk exponent
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Voting weight, capability times salience
    pub fn weight(&self) -> f64 {
        self.c * self.s
    }

    /// Cached utilities against `alter`
    pub fn utilities(&self, alter: ActorId) -> Option<&Utilities> {
        self.evaluation(alter).map(|e| &e.utilities)
    }

    /// Cached win probability against `alter`
    pub fn probability(&self, alter: ActorId) -> Option<f64> {
        self.evaluation(alter).map(|e| e.probability)
    }

    /// Cached expected utility of challenging `alter`
    pub fn expected_utility(&self, alter: ActorId) -> Option<f64> {
        self.evaluation(alter).map(|e| e.expected_utility)
    }

    /// Full cached evaluation against `alter`
    pub fn evaluation(&self, alter: ActorId) -> Option<&PairEvaluation> {
        self.evaluations.get(alter.index()).and_then(Option::as_ref)
    }

    /// Offers waiting to be resolved
    pub fn inbox(&self) -> &[Offer] {
        &self.inbox
    }

    /// Back to a snapshot record
    pub fn spec(&self) -> ActorSpec {
        ActorSpec::new(self.name.clone(), self.x, self.c, self.s)
    }

    pub(crate) fn set_position(&mut self, x: f64) {
        self.x = x;
    }

    pub(crate) fn set_risk_exponent(&mut self, r: f64) {
        self.r = r;
    }

    /// Replace every cached evaluation with `row`.
    ///
    /// `row` must be population-sized with `None` at this actor's own index.
    pub(crate) fn overwrite_evaluations(&mut self, row: Vec<Option<PairEvaluation>>) {
        debug_assert_eq!(row.len(), self.evaluations.len());
        debug_assert!(row[self.id.index()].is_none());
        self.evaluations = row;
    }

    pub(crate) fn deliver(&mut self, offer: Offer) {
        self.inbox.push(offer);
    }

    /// Drain the inbox, leaving it empty.
    pub(crate) fn take_inbox(&mut self) -> Vec<Offer> {
        std::mem::take(&mut self.inbox)
    }
}

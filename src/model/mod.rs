//! Round orchestration.
//!
//! A [`Model`] owns the actors and the model-wide constants and plays rounds.
//! Per-pair computations are pure functions taking a read-only
//! [`ModelContext`]; actors never hold a reference back to the model.
//!
//! ## Round Pipeline
//!
//! ```text
//!  reset r = 1 ──> mean (mu) ──> Phase A: evaluate all pairs at r = 1
//!                                    │
//!                                    v
//!                     solve risk exponents from the Phase A matrix
//!                                    │
//!                                    v
//!                 Phase B: evaluate all pairs at the solved r
//!                                    │
//!                                    v
//!            send offers ──> resolve inboxes ──> reset r, record snapshot
//! ```
//!
//! Each arrow is a barrier: a phase completes for the whole population before
//! the next one reads it.

mod expected;
mod probability;
mod report;
mod risk;
mod stats;
mod utility;

pub use expected::{evaluate_pair, evaluate_population, expected_utility, PairEvaluation};
pub use probability::{vote, win_probability};
pub use report::RunReport;
pub use risk::{exponent, security_levels, solve, NEUTRAL_RISK};
pub use stats::{weighted_mean, weighted_median, RoundRecord};
pub use utility::Utilities;

use ndarray::Array2;

use crate::actor::{Actor, ActorId, Roster};
use crate::config::ModelConfig;
use crate::error::{BdmError, Result};
use crate::negotiation::{self, NegotiationEvent, Quadrant};

/// Read-only constants every pairwise computation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelContext {
    /// Width of the issue space, `xmax - xmin`
    pub range: f64,
    /// Status-quo weight
    pub q: f64,
    /// Optimism weight
    pub t: f64,
    /// Weighted mean position for the current round
    pub mu: f64,
}

/// Group decision model.
#[derive(Debug, Clone)]
pub struct Model {
    actors: Vec<Actor>,
    config: ModelConfig,
    xmin: f64,
    xmax: f64,
    mu: f64,
    round: usize,
    history: Vec<RoundRecord>,
    events: Vec<NegotiationEvent>,
}

impl Model {
    /// Build a model from a roster.
    ///
    /// The issue-space range comes from the config when given, otherwise from
    /// the initial positions, and stays fixed for the whole run.
    pub fn new(roster: impl Into<Roster>, config: ModelConfig) -> Result<Self> {
        let roster = roster.into();
        config.validate()?;
        roster.validate()?;

        let (lo, hi) = roster
            .position_bounds()
            .ok_or(BdmError::EmptyRoster(roster.len()))?;
        let xmin = config.xmin.unwrap_or(lo);
        let xmax = config.xmax.unwrap_or(hi);

        if xmax <= xmin || lo < xmin || hi > xmax {
            return Err(BdmError::DegenerateRange { xmin, xmax });
        }

        let total_weight: f64 = roster.iter().map(|a| a.c * a.s).sum();
        if total_weight <= 0.0 {
            return Err(BdmError::InvalidParameter(
                "total capability x salience weight must be positive".to_string(),
            ));
        }

        let population = roster.len();
        let actors: Vec<Actor> = roster
            .actors
            .into_iter()
            .enumerate()
            .map(|(i, spec)| Actor::new(ActorId(i), spec, population))
            .collect();

        let initial = RoundRecord::capture(0, &actors);
        tracing::debug!(
            actors = population,
            xmin,
            xmax,
            mean = initial.mean,
            median = initial.median,
            "model constructed"
        );

        Ok(Self {
            mu: initial.mean,
            actors,
            config,
            xmin,
            xmax,
            round: 0,
            history: vec![initial],
            events: Vec::new(),
        })
    }

    /// Constants for the current round
    pub fn context(&self) -> ModelContext {
        ModelContext {
            range: self.xmax - self.xmin,
            q: self.config.q,
            t: self.config.t,
            mu: self.mu,
        }
    }

    /// Model configuration
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Issue-space bounds
    pub fn range(&self) -> (f64, f64) {
        (self.xmin, self.xmax)
    }

    /// All actors, in index order
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Actor by index
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())
    }

    /// Look up an actor index by name
    pub fn actor_id(&self, name: &str) -> Result<ActorId> {
        self.actors
            .iter()
            .find(|a| a.name() == name)
            .map(Actor::id)
            .ok_or_else(|| BdmError::UnknownActor(name.to_string()))
    }

    /// Current position of the named actor
    pub fn position(&self, name: &str) -> Result<f64> {
        let id = self.actor_id(name)?;
        Ok(self.actors[id.index()].x())
    }

    /// Current positions, in actor order
    pub fn positions(&self) -> Vec<f64> {
        self.actors.iter().map(Actor::x).collect()
    }

    /// Rounds played so far
    pub fn rounds_played(&self) -> usize {
        self.round
    }

    /// One record per round, starting with round 0
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Every resolved inbox so far
    pub fn events(&self) -> &[NegotiationEvent] {
        &self.events
    }

    /// Current weighted mean position
    pub fn mean_position(&self) -> f64 {
        weighted_mean(&self.actors)
    }

    /// Current pairwise-vote median position
    pub fn median_position(&self) -> f64 {
        weighted_median(&self.actors)
    }

    /// Expected utility of `i` challenging `j` from the latest pass
    pub fn expected_utility(&self, i: ActorId, j: ActorId) -> Option<f64> {
        self.actor(i)?.expected_utility(j)
    }

    /// Latest expected-utility matrix: row challenges column, zero diagonal.
    ///
    /// All zeros before the first round.
    pub fn expected_utility_matrix(&self) -> Array2<f64> {
        let n = self.actors.len();
        Array2::from_shape_fn((n, n), |(i, j)| {
            self.actors[i].expected_utility(ActorId(j)).unwrap_or(0.0)
        })
    }

    /// Quadrant of the pair `(i, j)` from the latest pass
    pub fn quadrant(&self, i: ActorId, j: ActorId) -> Option<Quadrant> {
        let eu_ij = self.expected_utility(i, j)?;
        let eu_ji = self.expected_utility(j, i)?;
        Some(Quadrant::classify(eu_ij, eu_ji))
    }

    /// Play one round.
    ///
    /// On failure the error carries the round number and the model should be
    /// discarded: risk exponents and inboxes are reset, but caches may hold
    /// the failed round's partial passes.
    pub fn step(&mut self) -> Result<&RoundRecord> {
        let round = self.round + 1;
        let played = self.play_round(round);
        self.reset_round_state();

        let events = played.map_err(|e| BdmError::RoundFailed {
            round,
            source: Box::new(e),
        })?;

        for event in &events {
            self.narrate(event);
        }

        let record = RoundRecord::capture(round, &self.actors);
        tracing::debug!(
            round,
            mean = record.mean,
            median = record.median,
            resolutions = events.len(),
            "round complete"
        );

        self.round = round;
        self.events.extend(events);
        self.history.push(record);
        Ok(&self.history[self.history.len() - 1])
    }

    /// Play `rounds` rounds, stopping at the first failure.
    ///
    /// Returns the full history (every round so far, including round 0).
    pub fn run(&mut self, rounds: usize) -> Result<&[RoundRecord]> {
        for _ in 0..rounds {
            self.step()?;
        }
        Ok(&self.history)
    }

    /// Serializable snapshot of the run so far
    pub fn report(&self) -> RunReport {
        RunReport::from_model(self)
    }

    fn play_round(&mut self, round: usize) -> Result<Vec<NegotiationEvent>> {
        for actor in &mut self.actors {
            actor.set_risk_exponent(NEUTRAL_RISK);
        }
        self.mu = weighted_mean(&self.actors);

        self.evaluate()?;
        tracing::trace!(round, "neutral pass complete");

        let exponents = solve(&self.actors)?;
        for (actor, r) in self.actors.iter_mut().zip(&exponents) {
            actor.set_risk_exponent(*r);
        }
        tracing::debug!(round, ?exponents, "risk exponents solved");

        self.evaluate()?;
        tracing::trace!(round, "solved pass complete");

        let sent = negotiation::send_offers(&mut self.actors);
        tracing::trace!(round, sent, "offers sent");

        negotiation::resolve_offers(&mut self.actors, round)
    }

    /// Evaluate every ordered pair, then overwrite every actor's caches.
    fn evaluate(&mut self) -> Result<()> {
        let rows = evaluate_population(&self.actors, &self.context())?;
        for (actor, row) in self.actors.iter_mut().zip(rows) {
            actor.overwrite_evaluations(row);
        }
        Ok(())
    }

    fn reset_round_state(&mut self) {
        for actor in &mut self.actors {
            actor.set_risk_exponent(NEUTRAL_RISK);
            actor.take_inbox();
        }
    }

    fn narrate(&self, event: &NegotiationEvent) {
        let line = event.describe(
            self.actors[event.actor.index()].name(),
            self.actors[event.counterpart.index()].name(),
        );
        if self.config.verbose {
            tracing::info!("{line}");
        } else {
            tracing::trace!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorSpec;

    fn symmetric_three() -> Vec<ActorSpec> {
        vec![
            ActorSpec::new("A", 0.2, 1.0, 1.0),
            ActorSpec::new("B", 0.5, 1.0, 1.0),
            ActorSpec::new("C", 0.8, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_construction_records_round_zero() {
        let model = Model::new(symmetric_three(), ModelConfig::default()).unwrap();

        assert_eq!(model.rounds_played(), 0);
        assert_eq!(model.history().len(), 1);
        assert_eq!(model.history()[0].round, 0);
        assert!((model.history()[0].mean - 0.5).abs() < 1e-12);
        assert_eq!(model.range(), (0.2, 0.8));
        assert!((model.context().range - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_construction_rejects_bad_rosters() {
        let mut dup = symmetric_three();
        dup[1].name = "A".to_string();
        assert!(matches!(
            Model::new(dup, ModelConfig::default()),
            Err(BdmError::DuplicateActor(_))
        ));

        let same = vec![ActorSpec::new("A", 0.5, 1.0, 1.0), ActorSpec::new("B", 0.5, 1.0, 1.0)];
        assert!(matches!(
            Model::new(same, ModelConfig::default()),
            Err(BdmError::DegenerateRange { .. })
        ));

        let outside = ModelConfig::default().with_range(0.3, 1.0);
        assert!(matches!(
            Model::new(symmetric_three(), outside),
            Err(BdmError::DegenerateRange { .. })
        ));

        let weightless = vec![ActorSpec::new("A", 0.0, 0.0, 1.0), ActorSpec::new("B", 1.0, 1.0, 0.0)];
        assert!(matches!(
            Model::new(weightless, ModelConfig::default()),
            Err(BdmError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_explicit_range_is_kept() {
        let model = Model::new(symmetric_three(), ModelConfig::default().with_range(0.0, 1.0)).unwrap();
        assert_eq!(model.range(), (0.0, 1.0));
        assert_eq!(model.context().range, 1.0);
    }

    #[test]
    fn test_lookup_by_name() {
        let model = Model::new(symmetric_three(), ModelConfig::default()).unwrap();
        assert_eq!(model.actor_id("C").unwrap(), ActorId(2));
        assert_eq!(model.position("B").unwrap(), 0.5);
        assert!(matches!(model.actor_id("Z"), Err(BdmError::UnknownActor(name)) if name == "Z"));
    }

    #[test]
    fn test_step_fills_matrix_and_resets_state() {
        let mut model = Model::new(symmetric_three(), ModelConfig::default()).unwrap();
        assert!(model.expected_utility_matrix().iter().all(|v| *v == 0.0));

        model.step().unwrap();

        let matrix = model.expected_utility_matrix();
        assert_eq!(matrix.dim(), (3, 3));
        for i in 0..3 {
            assert_eq!(matrix[[i, i]], 0.0);
            for j in (0..3).filter(|j| *j != i) {
                assert!(matrix[[i, j]] < 0.0, "EU({i}->{j}) = {}", matrix[[i, j]]);
            }
        }
        assert!(model.actors().iter().all(|a| a.r() == NEUTRAL_RISK));
        assert!(model.actors().iter().all(|a| a.inbox().is_empty()));
        assert_eq!(
            model.quadrant(ActorId(0), ActorId(1)),
            Some(Quadrant::StatusQuo)
        );
    }

    #[test]
    fn test_solved_exponents_reach_phase_b() {
        let mut model = Model::new(symmetric_three(), ModelConfig::default()).unwrap();
        model.step().unwrap();

        // A solves to r = 2: Usq = 2 - 4 * 0.25
        let a = &model.actors()[0];
        let usq = a.utilities(ActorId(1)).unwrap().status_quo;
        assert!((usq - 1.0).abs() < 1e-9);

        // B solves to r = 0.5
        let b = &model.actors()[1];
        let usq = b.utilities(ActorId(0)).unwrap().status_quo;
        assert!((usq - (2.0 - 4.0 * 0.5_f64.sqrt())).abs() < 1e-9);
    }
}

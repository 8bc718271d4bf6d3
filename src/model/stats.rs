//! Population summary statistics.
//!
//! Tracks the weighted mean and the pairwise-vote median each round.

use serde::{Deserialize, Serialize};

use super::probability::vote;
use crate::actor::Actor;

/// Capability- and salience-weighted mean position.
pub fn weighted_mean(actors: &[Actor]) -> f64 {
    let (sum, weight) = actors.iter().fold((0.0, 0.0), |(sum, weight), a| {
        (sum + a.weight() * a.x(), weight + a.weight())
    });
    sum / weight
}

/// Best-effort Condorcet position among the attested positions.
///
/// Each candidate `x_k` collects its weighted vote margin against every other
/// attested position `x_j`; the first candidate with the largest total wins.
/// This is a heuristic: summed margins pick the attested position closest (in
/// weighted absolute distance) to everyone, which is a weighted median, but it
/// does not check that the winner beats every rival head-to-head and cannot
/// detect cycles.
pub fn weighted_median(actors: &[Actor]) -> f64 {
    let mut best: Option<(f64, f64)> = None;

    for candidate in actors {
        let x_k = candidate.x();
        let margin: f64 = actors
            .iter()
            .map(|rival| {
                actors
                    .iter()
                    .map(|voter| vote(voter, x_k, rival.x()))
                    .sum::<f64>()
            })
            .sum();

        if best.is_none_or(|(_, top)| margin > top) {
            best = Some((x_k, margin));
        }
    }

    best.map_or(f64::NAN, |(x, _)| x)
}

/// Snapshot taken after each round (round 0 is the starting state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number
    pub round: usize,
    /// Weighted mean position
    pub mean: f64,
    /// Pairwise-vote median position
    pub median: f64,
    /// Every actor's position, in actor order
    pub positions: Vec<f64>,
}

impl RoundRecord {
    /// Capture the population's current state.
    pub fn capture(round: usize, actors: &[Actor]) -> Self {
        Self {
            round,
            mean: weighted_mean(actors),
            median: weighted_median(actors),
            positions: actors.iter().map(Actor::x).collect(),
        }
    }

    /// Distance between the outermost positions
    pub fn spread(&self) -> f64 {
        let max = self.positions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = self.positions.iter().copied().fold(f64::INFINITY, f64::min);
        if self.positions.is_empty() {
            0.0
        } else {
            max - min
        }
    }
}

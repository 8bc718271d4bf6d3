//! Win probability from population-wide weighted votes.

use crate::actor::Actor;
use crate::error::{BdmError, Result};

/// Signed weighted vote of `voter` for `x_i` over `x_j`.
///
/// Positive when the voter sits closer to `x_i`.
pub fn vote(voter: &Actor, x_i: f64, x_j: f64) -> f64 {
    voter.weight() * ((voter.x() - x_j).abs() - (voter.x() - x_i).abs())
}

/// Probability that `actor` wins a challenge against `alter`.
///
/// Every actor in `population` votes, including the two contestants. The
/// summed vote is clamped at zero as a whole (not per voter) and divided by
/// the total absolute vote mass. Identical positions give exactly 0.
pub fn win_probability(actor: &Actor, alter: &Actor, population: &[Actor]) -> Result<f64> {
    if actor.x() == alter.x() {
        return Ok(0.0);
    }

    let (total, mass) = population.iter().fold((0.0, 0.0), |(total, mass), voter| {
        let v = vote(voter, actor.x(), alter.x());
        (total + v, mass + v.abs())
    });

    if mass == 0.0 {
        return Err(BdmError::ZeroVoteMass {
            actor: actor.name().to_string(),
            alter: alter.name().to_string(),
        });
    }

    Ok(f64::max(total, 0.0) / mass)
}

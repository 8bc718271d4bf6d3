//! Expected utility of one actor challenging another.

use serde::{Deserialize, Serialize};

use super::probability::win_probability;
use super::utility::Utilities;
use super::ModelContext;
use crate::actor::Actor;
use crate::error::Result;

/// Everything one actor knows about challenging one counterpart in a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairEvaluation {
    /// Base utilities
    pub utilities: Utilities,
    /// Win probability
    pub probability: f64,
    /// Expected utility of challenging
    pub expected_utility: f64,
}

/// Combine utilities and win probability into the expected utility of challenging.
///
/// Positive means the challenger prefers challenging over the status quo. A
/// low-salience target is challenged almost for free (`Us`); a high-salience
/// one resists, and the challenge pays off only with probability `p`.
pub fn expected_utility(u: &Utilities, p: f64, alter_salience: f64, ctx: &ModelContext) -> f64 {
    let s = alter_salience;
    let challenge = s * (p * u.success + (1.0 - p) * u.failure) + (1.0 - s) * u.success;
    let no_challenge = ctx.q * u.status_quo
        - (1.0 - ctx.q) * (ctx.t * u.better + (1.0 - ctx.t) * u.worse);

    challenge - no_challenge
}

/// Evaluate `actor` challenging `alter` under the current exponents.
pub fn evaluate_pair(
    actor: &Actor,
    alter: &Actor,
    population: &[Actor],
    ctx: &ModelContext,
) -> Result<PairEvaluation> {
    let utilities = Utilities::compute(actor, alter, ctx);
    let probability = win_probability(actor, alter, population)?;

    Ok(PairEvaluation {
        utilities,
        probability,
        expected_utility: expected_utility(&utilities, probability, alter.s(), ctx),
    })
}

/// Evaluate every ordered pair, one row per actor.
///
/// Reads the population only; the caller writes the rows back once the
/// whole pass is done.
pub fn evaluate_population(
    population: &[Actor],
    ctx: &ModelContext,
) -> Result<Vec<Vec<Option<PairEvaluation>>>> {
    population
        .iter()
        .map(|actor| {
            population
                .iter()
                .map(|alter| {
                    if alter.id() == actor.id() {
                        Ok(None)
                    } else {
                        evaluate_pair(actor, alter, population, ctx).map(Some)
                    }
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utilities() -> Utilities {
        Utilities {
            success: 1.0,
            failure: -1.0,
            better: 0.5,
            worse: -0.5,
            status_quo: 0.2,
        }
    }

    fn ctx(q: f64, t: f64) -> ModelContext {
        ModelContext {
            range: 1.0,
            q,
            t,
            mu: 0.5,
        }
    }

    #[test]
    fn test_full_status_quo_weight() {
        // s(p Us + (1-p) Uf) + (1-s) Us - Usq
        let eu = expected_utility(&utilities(), 0.75, 1.0, &ctx(1.0, 1.0));
        assert!((eu - (0.5 - 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_low_salience_target_pays_success() {
        let eu = expected_utility(&utilities(), 0.0, 0.0, &ctx(1.0, 0.0));
        assert!((eu - (1.0 - 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_no_status_quo_weight_adds_drift() {
        // Q = 0: challenge + (T Ub + (1-T) Uw)
        let eu = expected_utility(&utilities(), 0.5, 1.0, &ctx(0.0, 1.0));
        assert!((eu - 0.5).abs() < 1e-12);

        let eu = expected_utility(&utilities(), 0.5, 1.0, &ctx(0.0, 0.0));
        assert!((eu + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_higher_q_suppresses_challenges() {
        let low = expected_utility(&utilities(), 0.6, 0.8, &ctx(0.2, 1.0));
        let high = expected_utility(&utilities(), 0.6, 0.8, &ctx(0.8, 1.0));
        assert!(high < low);
    }
}

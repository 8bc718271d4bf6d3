//! Risk-exponent solver.
//!
//! Each round the model evaluates every pair with a neutral exponent,
//! derives each actor's exponent from how exposed it is relative to the rest
//! of the population, then evaluates again under the solved exponents.
//!
//! ```text
//!   security_k = Σ EU(alter → k)            over alter ≠ k
//!   R_i        = (2·security_i − max − min) / (max − min)
//!   r_i        = (1 − R_i/3) / (1 + R_i/3)
//! ```
//!
//! `R_i` lies in [-1, 1], so `r_i` lies in [0.5, 2].

use crate::actor::Actor;
use crate::error::{BdmError, Result};

/// Exponent every actor holds outside the solved phase.
pub const NEUTRAL_RISK: f64 = 1.0;

/// Aggregate expected utility every other actor sees in challenging each actor.
///
/// Reads the cached evaluations, so the population must have been evaluated.
pub fn security_levels(actors: &[Actor]) -> Vec<f64> {
    actors
        .iter()
        .map(|target| {
            actors
                .iter()
                .filter_map(|alter| alter.expected_utility(target.id()))
                .sum::<f64>()
        })
        .collect()
}

/// Map a relative security score onto an exponent.
pub fn exponent(relative: f64) -> f64 {
    (1.0 - relative / 3.0) / (1.0 + relative / 3.0)
}

/// Solve every actor's exponent from the neutral-phase expected utilities.
///
/// Fails with [`BdmError::DegenerateSecurity`] when every actor has the same
/// security level.
pub fn solve(actors: &[Actor]) -> Result<Vec<f64>> {
    let security = security_levels(actors);

    let max = security.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = security.iter().copied().fold(f64::INFINITY, f64::min);
    let spread = max - min;

    if spread == 0.0 || !spread.is_finite() {
        return Err(BdmError::DegenerateSecurity { security: max });
    }

    // The attack sum on i is its own security level.
    Ok(security
        .iter()
        .map(|attack| exponent((2.0 * attack - max - min) / spread))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, ActorSpec};
    use crate::model::{PairEvaluation, Utilities};

    /// Population with a hand-written EU matrix (row challenges column).
    fn with_matrix(matrix: &[&[f64]]) -> Vec<Actor> {
        let n = matrix.len();
        (0..n)
            .map(|i| {
                let mut actor = Actor::new(
                    ActorId(i),
                    ActorSpec::new(format!("a{i}"), i as f64, 1.0, 1.0),
                    n,
                );
                let row = (0..n)
                    .map(|j| {
                        (i != j).then(|| PairEvaluation {
                            utilities: Utilities {
                                success: 0.0,
                                failure: 0.0,
                                better: 0.0,
                                worse: 0.0,
                                status_quo: 0.0,
                            },
                            probability: 0.0,
                            expected_utility: matrix[i][j],
                        })
                    })
                    .collect();
                actor.overwrite_evaluations(row);
                actor
            })
            .collect()
    }

    #[test]
    fn test_exponent_bounds() {
        assert!((exponent(-1.0) - 2.0).abs() < 1e-12);
        assert!((exponent(0.0) - 1.0).abs() < 1e-12);
        assert!((exponent(1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_three_solution() {
        // Neutral-phase matrix of A(0.2) B(0.5) C(0.8), equal weights, Q = 1
        let actors = with_matrix(&[
            &[0.0, -1.0, -2.0],
            &[-1.0 / 3.0, 0.0, -1.0 / 3.0],
            &[-2.0, -1.0, 0.0],
        ]);

        let security = security_levels(&actors);
        assert!((security[0] + 7.0 / 3.0).abs() < 1e-12);
        assert!((security[1] + 2.0).abs() < 1e-12);

        let r = solve(&actors).unwrap();
        assert!((r[0] - 2.0).abs() < 1e-9);
        assert!((r[1] - 0.5).abs() < 1e-9);
        assert!((r[2] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_security() {
        let actors = with_matrix(&[&[0.0, -1.0], &[-1.0, 0.0]]);
        let err = solve(&actors).unwrap_err();
        assert!(matches!(err, BdmError::DegenerateSecurity { security } if security == -1.0));
    }
}

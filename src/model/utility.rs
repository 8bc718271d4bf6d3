//! Pairwise base utilities.
//!
//! Every utility has the form `2 - 4 * base^r`, where `r` is the evaluating
//! actor's own risk exponent. Distances are normalised by the fixed
//! issue-space range, so every base lies in `[0, 1]` while actors stay
//! inside the range.

use serde::{Deserialize, Serialize};

use super::ModelContext;
use crate::actor::Actor;

/// The five base utilities of one actor against one counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Utilities {
    /// Us: a successful challenge
    pub success: f64,
    /// Uf: a failed challenge
    pub failure: f64,
    /// Ub: things drift my way without a challenge
    pub better: f64,
    /// Uw: things drift the alter's way without a challenge
    pub worse: f64,
    /// Usq: the status quo persists
    pub status_quo: f64,
}

impl Utilities {
    /// Compute `actor`'s utilities against `alter`.
    pub fn compute(actor: &Actor, alter: &Actor, ctx: &ModelContext) -> Self {
        let r = actor.r();
        let gap = (actor.x() - alter.x()).abs();
        let stake = 0.5 * gap / ctx.range;
        let drift = 0.25 * ((actor.x() - ctx.mu).abs() + gap) / ctx.range;

        Self {
            success: curve(0.5 - stake, r),
            failure: curve(0.5 + stake, r),
            better: curve(0.5 - drift, r),
            worse: curve(0.5 + drift, r),
            status_quo: curve(0.5, r),
        }
    }
}

fn curve(base: f64, r: f64) -> f64 {
    2.0 - 4.0 * base.powf(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, ActorSpec};

    fn actor(id: usize, x: f64) -> Actor {
        Actor::new(ActorId(id), ActorSpec::new(format!("a{id}"), x, 1.0, 1.0), 2)
    }

    fn ctx(mu: f64) -> ModelContext {
        ModelContext {
            range: 1.0,
            q: 1.0,
            t: 1.0,
            mu,
        }
    }

    #[test]
    fn test_neutral_exponent_is_linear() {
        let a = actor(0, 0.2);
        let b = actor(1, 0.7);
        let u = Utilities::compute(&a, &b, &ctx(0.2));

        // r = 1: Us = 2d, Uf = -2d, Usq = 0
        assert!((u.success - 1.0).abs() < 1e-12);
        assert!((u.failure + 1.0).abs() < 1e-12);
        assert!(u.status_quo.abs() < 1e-12);
        // drift = 0.25 * (0 + 0.5)
        assert!((u.better - 0.5).abs() < 1e-12);
        assert!((u.worse + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_same_position_collapses_to_status_quo() {
        let mut a = actor(0, 0.4);
        a.set_risk_exponent(1.7);
        let b = actor(1, 0.4);
        let u = Utilities::compute(&a, &b, &ctx(0.4));

        assert_eq!(u.success, u.status_quo);
        assert_eq!(u.failure, u.status_quo);
        assert_eq!(u.better, u.status_quo);
    }

    #[test]
    fn test_uses_own_risk_exponent() {
        let mut a = actor(0, 0.0);
        let b = actor(1, 1.0);
        a.set_risk_exponent(2.0);

        let u = Utilities::compute(&a, &b, &ctx(0.5));
        assert!((u.status_quo - (2.0 - 4.0 * 0.25)).abs() < 1e-12);
        // base 0 for success at full distance
        assert!((u.success - 2.0).abs() < 1e-12);
        assert!((u.failure - (2.0 - 4.0)).abs() < 1e-12);
    }
}

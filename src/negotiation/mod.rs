//! Offer protocol.
//!
//! Once the solved-exponent expected utilities are in place, actors negotiate
//! in two simultaneous steps. Nobody sees another actor's decision inside a
//! step.
//!
//! ## Message Flow
//!
//! ```text
//! Actor i                               Actor j
//!    |                                     |
//!    |--- Offer (x_i, EU(i→j)) ---------->|  send: every j with EU(i→j) > 0
//!    |                                     |
//!    |          ...all sends complete...   |
//!    |                                     |
//!    |                                     |  resolve: strongest offer wins,
//!    |                                     |  ties go to the closest target
//! ```
//!
//! ## Resolution Rules
//!
//! `Uj` is the winning offer's EU, `Ui` the recipient's own EU of challenging
//! the sender. Rules are checked in order:
//!
//! | Condition              | Outcome        | New position                      |
//! |------------------------|----------------|-----------------------------------|
//! | `0 < Ui < Uj`          | `ConflictLoss` | target                            |
//! | `Ui < 0`, `\|Ui\| < Uj` | `Compromise`   | `x + (target − x)·\|Ui/Uj\|`        |
//! | `Ui < 0`, `\|Ui\| > Uj` | `Capitulation` | target                            |
//! | `Ui > Uj > 0`          | `Stands`       | unchanged                         |
//! | anything else          | error          | `BdmError::UnresolvedOffer`       |
//!
//! `Stands` leaves the pair to the sender's own inbox, where the recipient's
//! stronger challenge is resolved in the same round.

mod offer;
mod resolution;

pub use offer::{NegotiationEvent, Offer};
pub use resolution::{Outcome, Quadrant};

use crate::actor::{Actor, ActorId};
use crate::error::{BdmError, Result};

/// Deliver every positive-EU challenge into its target's inbox.
///
/// Actors at exactly the same position never challenge each other. Offers land
/// in each inbox in sender order. Returns the number of offers sent.
pub fn send_offers(actors: &mut [Actor]) -> usize {
    let population: &[Actor] = actors;
    let outgoing: Vec<(ActorId, Offer)> = population
        .iter()
        .flat_map(|sender| {
            population.iter().filter_map(move |target| {
                if target.id() == sender.id() || target.x() == sender.x() {
                    return None;
                }
                let eu = sender.expected_utility(target.id())?;
                (eu > 0.0).then_some((
                    target.id(),
                    Offer {
                        sender: sender.id(),
                        target_position: sender.x(),
                        expected_utility: eu,
                    },
                ))
            })
        })
        .collect();

    let sent = outgoing.len();
    for (target, offer) in outgoing {
        actors[target.index()].deliver(offer);
    }
    sent
}

/// Strongest offer in `inbox`, ties going to the target closest to `position`,
/// then to the earliest.
pub fn select_offer(inbox: &[Offer], position: f64) -> Option<&Offer> {
    let best = inbox
        .iter()
        .map(|o| o.expected_utility)
        .fold(f64::NEG_INFINITY, f64::max);

    inbox
        .iter()
        .filter(|o| o.expected_utility == best)
        .fold(None, |chosen: Option<&Offer>, offer| match chosen {
            Some(c)
                if (c.target_position - position).abs()
                    <= (offer.target_position - position).abs() =>
            {
                Some(c)
            },
            _ => Some(offer),
        })
}

/// Resolve every inbox and move actors accordingly.
///
/// All inboxes are emptied first, whatever happens next. Decisions are made
/// against the positions at the start of the step and only applied once every
/// inbox has resolved, so an error leaves every position untouched.
pub fn resolve_offers(actors: &mut [Actor], round: usize) -> Result<Vec<NegotiationEvent>> {
    let inboxes: Vec<Vec<Offer>> = actors.iter_mut().map(Actor::take_inbox).collect();

    let mut events = Vec::new();
    for (actor, inbox) in actors.iter().zip(&inboxes) {
        let Some(offer) = select_offer(inbox, actor.x()) else {
            continue;
        };

        let own_eu = actor.expected_utility(offer.sender).unwrap_or(f64::NAN);
        let offer_eu = offer.expected_utility;

        let outcome = Outcome::decide(own_eu, offer_eu).ok_or_else(|| BdmError::UnresolvedOffer {
            actor: actor.name().to_string(),
            sender: actors
                .get(offer.sender.index())
                .map_or_else(|| offer.sender.to_string(), |s| s.name().to_string()),
            own_eu,
            offer_eu,
        })?;

        events.push(NegotiationEvent {
            round,
            actor: actor.id(),
            counterpart: offer.sender,
            outcome,
            before: actor.x(),
            after: outcome.apply(actor.x(), offer.target_position, own_eu, offer_eu),
            offer_eu,
            own_eu,
        });
    }

    for event in &events {
        actors[event.actor.index()].set_position(event.after);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorSpec;
    use crate::model::{PairEvaluation, Utilities};

    /// Population at `positions` with a hand-written EU matrix.
    fn population(positions: &[f64], matrix: &[&[f64]]) -> Vec<Actor> {
        let n = positions.len();
        positions
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let mut actor =
                    Actor::new(ActorId(i), ActorSpec::new(format!("a{i}"), *x, 1.0, 1.0), n);
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
                            probability: 0.5,
                            expected_utility: matrix[i][j],
                        })
                    })
                    .collect();
                actor.overwrite_evaluations(row);
                actor
            })
            .collect()
    }

    fn offer(sender: usize, target: f64, eu: f64) -> Offer {
        Offer {
            sender: ActorId(sender),
            target_position: target,
            expected_utility: eu,
        }
    }

    #[test]
    fn test_send_only_positive() {
        let mut actors = population(
            &[0.0, 0.5, 1.0],
            &[&[0.0, 0.4, -0.1], &[-0.2, 0.0, 0.3], &[0.0, -0.5, 0.0]],
        );

        let sent = send_offers(&mut actors);
        assert_eq!(sent, 2);
        assert_eq!(actors[1].inbox(), &[offer(0, 0.0, 0.4)]);
        assert_eq!(actors[2].inbox(), &[offer(1, 0.5, 0.3)]);
        assert!(actors[0].inbox().is_empty());
    }

    #[test]
    fn test_send_skips_identical_positions() {
        let mut actors = population(&[0.3, 0.3], &[&[0.0, 0.9], &[0.9, 0.0]]);
        assert_eq!(send_offers(&mut actors), 0);
        assert!(actors.iter().all(|a| a.inbox().is_empty()));
    }

    #[test]
    fn test_select_strongest_then_closest() {
        let inbox = [offer(0, 0.0, 0.4), offer(1, 0.9, 0.6), offer(2, 0.6, 0.6)];
        assert_eq!(select_offer(&inbox, 0.5).unwrap().sender, ActorId(2));

        let tied = [offer(0, 0.4, 0.6), offer(1, 0.6, 0.6)];
        assert_eq!(select_offer(&tied, 0.5).unwrap().sender, ActorId(0));

        assert!(select_offer(&[], 0.5).is_none());
    }

    #[test]
    fn test_resolve_moves_and_clears() {
        // a1 gets a0's offer (0.4); its own EU against a0 is -0.2: compromise half way
        let mut actors = population(
            &[0.0, 0.5, 1.0],
            &[&[0.0, 0.4, -0.1], &[-0.2, 0.0, 0.3], &[0.0, -0.5, 0.0]],
        );
        send_offers(&mut actors);

        let events = resolve_offers(&mut actors, 1).unwrap();
        assert!(actors.iter().all(|a| a.inbox().is_empty()));
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].actor, ActorId(1));
        assert_eq!(events[0].outcome, Outcome::Compromise);
        assert!((actors[1].x() - 0.25).abs() < 1e-12);

        // a2 gets a1's offer (0.3) with own EU -0.5 against a1: gives in
        assert_eq!(events[1].actor, ActorId(2));
        assert_eq!(events[1].outcome, Outcome::Capitulation);
    }

    #[test]
    fn test_resolve_unresolved_leaves_positions() {
        let mut actors = population(&[0.0, 1.0], &[&[0.0, 0.5], &[0.5, 0.0]]);
        actors[1].deliver(offer(0, 0.0, 0.5));

        let err = resolve_offers(&mut actors, 2).unwrap_err();
        assert!(matches!(
            err,
            BdmError::UnresolvedOffer { ref actor, ref sender, .. } if actor == "a1" && sender == "a0"
        ));
        assert_eq!(actors[1].x(), 1.0);
        assert!(actors[1].inbox().is_empty());
    }
}

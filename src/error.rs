//! Group decision model error types.
//!
//! # Error Classification
//!
//! Errors fall into two groups:
//!
//! - **Construction errors**: the roster or parameters are unusable
//!   (duplicate names, empty roster, Q/T out of range, degenerate range).
//!   These are raised before any round runs.
//! - **Round errors**: the numerical pipeline hit a point where the model has
//!   no defined value (zero vote mass, degenerate security, an offer pair no
//!   resolution rule covers). The orchestrator wraps these in
//!   [`BdmError::RoundFailed`] so the caller sees the round index.
//!
//! The `RoundFailed` variant preserves the inner error via `#[source]`,
//! so `anyhow` and friends can display the complete chain.

use thiserror::Error;

/// Group decision model errors.
#[derive(Error, Debug)]
pub enum BdmError {
    /// Risk-exponent solve found every actor with the same aggregate security.
    #[error("Degenerate security: every actor has security level {security}")]
    DegenerateSecurity {
        /// The shared security level.
        security: f64,
    },

    /// Nobody in the population has a weighted preference between two positions.
    #[error("Zero vote mass: win probability of {actor} over {alter} is undefined")]
    ZeroVoteMass {
        /// Challenging actor.
        actor: String,
        /// Challenged actor.
        alter: String,
    },

    /// An inbox resolution matched none of the resolution rules.
    #[error(
        "Unresolved offer: {actor} cannot resolve offer from {sender} (own EU {own_eu}, offer EU {offer_eu})"
    )]
    UnresolvedOffer {
        /// Recipient of the offer.
        actor: String,
        /// Sender of the offer.
        sender: String,
        /// Recipient's expected utility of challenging the sender.
        own_eu: f64,
        /// Expected utility carried by the offer.
        offer_eu: f64,
    },

    /// Two actors share a name.
    #[error("Duplicate actor name: {0}")]
    DuplicateActor(String),

    /// An actor name was referenced but is not in the roster.
    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    /// Roster has fewer than two actors.
    #[error("Roster needs at least two actors, got {0}")]
    EmptyRoster(usize),

    /// An actor record has an out-of-range field.
    #[error("Invalid actor {name}: {reason}")]
    InvalidActor {
        /// Actor name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A model parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The issue-space range is empty or does not contain the roster.
    #[error("Degenerate position range [{xmin}, {xmax}]")]
    DegenerateRange {
        /// Lower bound.
        xmin: f64,
        /// Upper bound.
        xmax: f64,
    },

    /// A round aborted.
    ///
    /// Rounds are numbered from 1; round 0 is the pre-run snapshot.
    #[error("Round {round} failed: {source}")]
    RoundFailed {
        /// Round that failed.
        round: usize,
        /// Underlying failure.
        #[source]
        source: Box<BdmError>,
    },

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, BdmError>;

impl BdmError {
    /// Round index if this error came out of a round.
    pub fn round(&self) -> Option<usize> {
        match self {
            BdmError::RoundFailed { round, .. } => Some(*round),
            _ => None,
        }
    }

    /// Innermost error, unwrapping any `RoundFailed` layers.
    pub fn root(&self) -> &BdmError {
        match self {
            BdmError::RoundFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<toml::de::Error> for BdmError {
    fn from(err: toml::de::Error) -> Self {
        BdmError::Config(err.to_string())
    }
}

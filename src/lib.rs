//! # BDM - Expected-Utility Group Decision Model
//!
//! Simulates how a set of actors with different preferred positions on a
//! single issue bargain their way toward an outcome. Each round, every actor
//! estimates the expected utility of challenging every other actor, sends
//! challenges it expects to win, and responds to the strongest challenge it
//! receives by holding firm, compromising or giving in.
//!
//! ## Features
//!
//! - **Pairwise utilities**: success, failure, better, worse and status-quo
//!   utilities shaped by each actor's risk exponent
//! - **Weighted votes**: win probabilities from the whole population's
//!   capability- and salience-weighted preferences
//! - **Risk solving**: per-round exponents derived from each actor's exposure
//! - **Offer protocol**: simultaneous send and resolve steps, with an event log
//! - **Reporting**: per-round mean and median, expected-utility matrix, JSON export
//!
//! ## Architecture
//!
//! ```text
//!   Roster (JSON / TOML)        Config (TOML / env / CLI)
//!          │                            │
//!          v                            v
//!    ┌───────────────────────────────────────────┐
//!    │                  Model                    │
//!    │  actors: Vec<Actor>    history, events    │
//!    └───────────────────────────────────────────┘
//!          │ each round
//!          v
//!   utility ──> probability ──> expected ──> risk ──> expected
//!                                                        │
//!                                                        v
//!                                    negotiation: send ──> resolve
//! ```
//!
//! ### Round Outcomes
//!
//! | Recipient's own EU (Ui) vs offer EU (Uj) | Outcome        |
//! |------------------------------------------|----------------|
//! | `0 < Ui < Uj`                            | `ConflictLoss` |
//! | `Ui < 0`, `\|Ui\| < Uj`                  | `Compromise`   |
//! | `Ui < 0`, `\|Ui\| > Uj`                  | `Capitulation` |
//! | `Ui > Uj > 0`                            | `Stands`       |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bdm::{ActorSpec, Model, ModelConfig};
//!
//! let roster = vec![
//!     ActorSpec::new("Hawk", 0.0, 3.0, 0.8),
//!     ActorSpec::new("Dove", 0.4, 1.0, 0.6),
//!     ActorSpec::new("Mid", 0.6, 1.5, 0.5),
//!     ActorSpec::new("Far", 1.0, 1.0, 0.9),
//! ];
//!
//! let mut model = Model::new(roster, ModelConfig::default().with_q(0.9).with_t(0.8))?;
//! for record in model.run(3)? {
//!     println!("round {}: mean {:.3}, median {:.3}", record.round, record.mean, record.median);
//! }
//!
//! println!("{}", model.expected_utility_matrix());
//! ```
//!
//! ## Modules
//!
//! - [`actor`]: Actors, identifiers and rosters
//! - [`model`]: Utilities, probabilities, risk solving and the round loop
//! - [`negotiation`]: Offers, resolution rules and quadrants
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod actor;
pub mod config;
pub mod error;
pub mod model;
pub mod negotiation;

// Re-exports for convenience
pub use actor::{Actor, ActorId, ActorSpec, Roster};
pub use config::{Config, ModelConfig, RunConfig};
pub use error::{BdmError, Result};
pub use model::{Model, ModelContext, PairEvaluation, RoundRecord, RunReport, Utilities};
pub use negotiation::{NegotiationEvent, Offer, Outcome, Quadrant};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Decision core for a Hearts opponent.
//!
//! An [`AgentSession`] owns one seat's per-round state and answers two
//! questions: which three cards to pass and which card to play. The game loop
//! drives it through [`AgentSession::on_round_start`] and
//! [`AgentSession::on_trick_complete`].

pub mod aggression;
pub mod agent;
pub mod analysis;
pub mod context;
pub mod memory;
pub mod moon;
pub mod params;
pub mod pass;
pub mod scoring;

pub use agent::{AgentSession, DecisionError, DecisionObserver, DecisionTrace};
pub use aggression::AggressionModifiers;
pub use context::{PassContext, PlayContext};
pub use memory::OpponentMemory;
pub use moon::{MoonEvaluation, MoonState};
pub use params::StrategyParams;
pub use scoring::{Rationale, ScoredCandidate};

#![deny(warnings)]
//! Card model and the deterministic rules collaborator used by the strategy crate.

pub mod game;
pub mod model;
pub mod rules;

pub use model::card::Card;
pub use model::player::PlayerPosition;
pub use model::rank::Rank;
pub use model::suit::Suit;

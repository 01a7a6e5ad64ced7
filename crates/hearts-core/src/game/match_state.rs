use crate::model::deck::Deck;
use crate::model::passing::PassingDirection;
use crate::model::player::PlayerPosition;
use crate::model::round::{RoundPhase, RoundState};
use crate::model::score::ScoreBoard;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A seeded sequence of rounds with running totals.
///
/// Every deal comes from one `StdRng`, so a seed fixes the whole match.
#[derive(Debug, Clone)]
pub struct MatchState {
    scores: ScoreBoard,
    round_number: u32,
    current_round: RoundState,
    rng: StdRng,
}

impl MatchState {
    /// First round passes left, as in a fresh game.
    pub fn with_seed(starting_player: PlayerPosition, seed: u64) -> Self {
        Self::with_seed_and_direction(seed, PassingDirection::CYCLE[0], starting_player)
    }

    /// Starts the match on `direction` instead of the usual left pass.
    pub fn with_seed_and_direction(
        seed: u64,
        direction: PassingDirection,
        starting_player: PlayerPosition,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        Self {
            scores: ScoreBoard::new(),
            round_number: 1,
            current_round: RoundState::deal(&deck, starting_player, direction),
            rng,
        }
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    /// 1-based number of the round in progress.
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn passing_direction(&self) -> PassingDirection {
        self.current_round.passing_direction()
    }

    /// Scores the finished round and deals the next one.
    ///
    /// Returns the seat that shot the moon, if any.
    pub fn finish_round_and_start_next(&mut self) -> Option<PlayerPosition> {
        let shooter = self.scores.apply_hand(self.current_round.round_points());

        let next_direction = self.passing_direction().next();
        let next_starting_player = self.current_round.starting_player().next();
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = RoundState::deal(&deck, next_starting_player, next_direction);
        self.round_number += 1;
        shooter
    }

    /// Some seat has reached `target_score`.
    pub fn is_match_over(&self, target_score: u32) -> bool {
        self.scores.max_score() >= target_score
    }

    pub fn is_round_ready_for_scoring(&self) -> bool {
        matches!(self.current_round.phase(), RoundPhase::Playing)
            && self.current_round.is_complete()
    }
}

use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::passing::PassingDirection;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::round::RoundState;
use hearts_core::model::score::ScoreBoard;
use hearts_core::model::suit::Suit;
use hearts_core::model::trick::Trick;
use hearts_core::rules;

/// Read-only view handed to a play decision.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    pub seat: PlayerPosition,
    pub round: &'a RoundState,
    pub scores: &'a ScoreBoard,
    pub legal: &'a [Card],
}

impl<'a> PlayContext<'a> {
    pub fn new(
        seat: PlayerPosition,
        round: &'a RoundState,
        scores: &'a ScoreBoard,
        legal: &'a [Card],
    ) -> Self {
        Self {
            seat,
            round,
            scores,
            legal,
        }
    }

    pub fn hand(&self) -> &'a Hand {
        self.round.hand(self.seat)
    }

    pub fn trick(&self) -> &'a Trick {
        self.round.current_trick()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.trick().lead_suit()
    }

    pub fn trick_index(&self) -> usize {
        self.round.trick_index()
    }

    pub fn is_first_trick(&self) -> bool {
        rules::is_first_trick(self.round)
    }
}

/// Read-only view handed to a pass decision.
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    pub seat: PlayerPosition,
    pub round: &'a RoundState,
    pub scores: &'a ScoreBoard,
    pub direction: PassingDirection,
}

impl<'a> PassContext<'a> {
    pub fn new(seat: PlayerPosition, round: &'a RoundState, scores: &'a ScoreBoard) -> Self {
        Self {
            seat,
            round,
            scores,
            direction: round.passing_direction(),
        }
    }

    pub fn hand(&self) -> &'a Hand {
        self.round.hand(self.seat)
    }

    pub fn target(&self) -> PlayerPosition {
        self.direction.target(self.seat)
    }
}

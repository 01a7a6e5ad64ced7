use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::PlayerPosition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassingDirection {
    Left,
    Right,
    Across,
    Hold,
}

impl PassingDirection {
    pub const CYCLE: [PassingDirection; 4] = [
        PassingDirection::Left,
        PassingDirection::Right,
        PassingDirection::Across,
        PassingDirection::Hold,
    ];

    pub const fn next(self) -> PassingDirection {
        match self {
            PassingDirection::Left => PassingDirection::Right,
            PassingDirection::Right => PassingDirection::Across,
            PassingDirection::Across => PassingDirection::Hold,
            PassingDirection::Hold => PassingDirection::Left,
        }
    }

    pub const fn requires_selection(self) -> bool {
        !matches!(self, PassingDirection::Hold)
    }

    pub const fn target(self, seat: PlayerPosition) -> PlayerPosition {
        match self {
            PassingDirection::Left => seat.next(),
            PassingDirection::Right => seat.previous(),
            PassingDirection::Across => seat.opposite(),
            PassingDirection::Hold => seat,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PassingDirection::Left => "Left",
            PassingDirection::Right => "Right",
            PassingDirection::Across => "Across",
            PassingDirection::Hold => "Hold",
        }
    }
}

impl FromStr for PassingDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(PassingDirection::Left),
            "right" => Ok(PassingDirection::Right),
            "across" => Ok(PassingDirection::Across),
            "hold" => Ok(PassingDirection::Hold),
            other => Err(format!("unknown passing direction '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PassingState {
    direction: PassingDirection,
    submissions: [Option<[Card; 3]>; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassingError {
    NotInPassingPhase,
    DirectionDoesNotPass,
    AlreadySubmitted(PlayerPosition),
    CardNotInHand(Card),
    DuplicateCard(Card),
    Incomplete,
}

impl fmt::Display for PassingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassingError::NotInPassingPhase => write!(f, "round is not in the passing phase"),
            PassingError::DirectionDoesNotPass => write!(f, "hold rounds do not pass"),
            PassingError::AlreadySubmitted(seat) => write!(f, "{seat} already passed"),
            PassingError::CardNotInHand(card) => write!(f, "{card} is not in hand"),
            PassingError::DuplicateCard(card) => write!(f, "{card} passed twice"),
            PassingError::Incomplete => write!(f, "not every seat has passed"),
        }
    }
}

impl std::error::Error for PassingError {}

impl PassingState {
    pub fn new(direction: PassingDirection) -> Self {
        Self {
            direction,
            submissions: [None; 4],
        }
    }

    pub fn direction(&self) -> PassingDirection {
        self.direction
    }

    pub fn submit(
        &mut self,
        seat: PlayerPosition,
        cards: [Card; 3],
        hand: &mut Hand,
    ) -> Result<(), PassingError> {
        if !self.direction.requires_selection() {
            return Err(PassingError::DirectionDoesNotPass);
        }

        if self.submissions[seat.index()].is_some() {
            return Err(PassingError::AlreadySubmitted(seat));
        }

        for (i, card) in cards.iter().enumerate() {
            if cards[..i].contains(card) {
                return Err(PassingError::DuplicateCard(*card));
            }
            if !hand.contains(*card) {
                return Err(PassingError::CardNotInHand(*card));
            }
        }

        for card in cards {
            hand.remove(card);
        }

        self.submissions[seat.index()] = Some(cards);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.submissions.iter().all(Option::is_some)
    }

    pub fn apply(self, hands: &mut [Hand; 4]) -> Result<(), PassingError> {
        if !self.direction.requires_selection() {
            return Err(PassingError::DirectionDoesNotPass);
        }

        if !self.is_complete() {
            return Err(PassingError::Incomplete);
        }

        for seat in PlayerPosition::LOOP {
            if let Some(cards) = self.submissions[seat.index()] {
                let target = self.direction.target(seat);
                for card in cards {
                    hands[target.index()].add(card);
                }
            }
        }

        Ok(())
    }
}

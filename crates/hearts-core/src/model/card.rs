use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const TWO_OF_CLUBS: Card = Card::new(Rank::Two, Suit::Clubs);
    pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);
    pub const KING_OF_SPADES: Card = Card::new(Rank::King, Suit::Spades);
    pub const ACE_OF_SPADES: Card = Card::new(Rank::Ace, Suit::Spades);
    pub const ACE_OF_HEARTS: Card = Card::new(Rank::Ace, Suit::Hearts);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn is_penalty(self) -> bool {
        matches!(self.suit, Suit::Hearts) || self.is_queen_of_spades()
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    /// King or ace of spades: the two cards that can be forced to eat the queen.
    pub const fn is_spade_above_queen(self) -> bool {
        matches!(self.suit, Suit::Spades) && matches!(self.rank, Rank::King | Rank::Ace)
    }

    pub const fn is_spade_below_queen(self) -> bool {
        matches!(self.suit, Suit::Spades) && (self.rank as u8) < Rank::Queen as u8
    }

    pub fn penalty_value(self) -> u8 {
        if self.is_queen_of_spades() {
            13
        } else if self.suit == Suit::Hearts {
            1
        } else {
            0
        }
    }

    /// Ordering key used for deterministic tie-breaks: suit first, then rank.
    pub const fn sort_key(self) -> (u8, u8) {
        (self.suit as u8, self.rank as u8)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

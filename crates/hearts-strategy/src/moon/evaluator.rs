use crate::params::MoonParams;
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoonReason {
    pub label: &'static str,
    pub points: i32,
}

impl fmt::Display for MoonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:+})", self.label, self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoonEvaluation {
    pub should_attempt: bool,
    pub confidence: u8,
    pub score: i32,
    pub reasons: Vec<MoonReason>,
}

impl MoonEvaluation {
    pub fn has_reason(&self, label: &str) -> bool {
        self.reasons.iter().any(|reason| reason.label == label)
    }
}

pub const MISSING_ACE_OF_HEARTS: &str = "missing ace of hearts";

struct Tally {
    score: i32,
    reasons: Vec<MoonReason>,
}

impl Tally {
    fn add(&mut self, label: &'static str, points: i32) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.reasons.push(MoonReason { label, points });
    }
}

/// Scores `hand` for a moon attempt. `threshold_shift` comes from aggressiveness.
pub fn evaluate(hand: &Hand, params: &MoonParams, threshold_shift: i32) -> MoonEvaluation {
    let mut tally = Tally {
        score: 0,
        reasons: Vec::new(),
    };
    let mut counted: Vec<Card> = Vec::with_capacity(3);

    let has_ace_of_hearts = hand.contains(Card::ACE_OF_HEARTS);
    if has_ace_of_hearts {
        tally.add("ace of hearts", params.ace_of_hearts);
        counted.push(Card::ACE_OF_HEARTS);
    } else {
        tally.add(MISSING_ACE_OF_HEARTS, params.missing_ace_of_hearts);
    }

    let has_ace_spades = hand.contains(Card::ACE_OF_SPADES);
    let has_king_spades = hand.contains(Card::KING_OF_SPADES);
    if hand.contains(Card::QUEEN_OF_SPADES) {
        tally.add("queen of spades", params.queen_of_spades);
        counted.push(Card::QUEEN_OF_SPADES);
    } else if has_ace_spades && has_king_spades {
        tally.add("ace and king of spades", params.ace_king_of_spades);
        counted.extend([Card::ACE_OF_SPADES, Card::KING_OF_SPADES]);
    } else if has_ace_spades {
        tally.add("ace of spades", params.ace_of_spades);
        counted.push(Card::ACE_OF_SPADES);
    } else if has_king_spades {
        tally.add("king of spades", params.king_of_spades);
        counted.push(Card::KING_OF_SPADES);
    } else {
        tally.add("no spade control", params.no_spade_control);
    }

    let mut high_suits = 0usize;
    for suit in Suit::ALL {
        let mut suit_has_high = false;
        for card in hand.suit_cards(suit) {
            let bonus = match card.rank {
                Rank::Ace => params.ace_bonus,
                Rank::King => params.king_bonus,
                Rank::Queen => params.queen_bonus,
                _ => continue,
            };
            suit_has_high = true;
            if !counted.contains(&card) {
                tally.add("high card", bonus);
            }
        }
        if suit_has_high {
            high_suits += 1;
        }
    }
    if high_suits >= params.spread_suits {
        tally.add("high cards across suits", params.spread_bonus);
    }

    for suit in Suit::ALL {
        let len = hand.count_suit(suit);
        let has_ace = hand.contains(Card::new(Rank::Ace, suit));
        if len >= params.controlled_suit_len && has_ace {
            tally.add("controlled long suit", params.controlled_suit_bonus);
        }
        if len >= params.very_long_suit_len {
            let extra = (len - (params.very_long_suit_len - 1)) as i32;
            tally.add("very long suit", params.very_long_per_card * extra);
        }
        if suit.is_heart() && len >= params.long_hearts_len {
            tally.add("long hearts", params.long_hearts_bonus);
        }
        if (1..=2).contains(&len) && !has_ace {
            tally.add("short uncontrolled suit", params.short_uncontrolled_penalty);
        }
    }

    let low_cards = hand
        .iter()
        .filter(|card| card.rank.value() <= params.low_card_max_rank)
        .count();
    if low_cards > params.low_card_allowance {
        let excess = (low_cards - params.low_card_allowance) as i32;
        tally.add("too many low cards", -params.low_card_penalty * excess);
    }

    let threshold = params.attempt_threshold + threshold_shift;
    MoonEvaluation {
        should_attempt: has_ace_of_hearts && tally.score >= threshold,
        confidence: tally.score.clamp(0, 100) as u8,
        score: tally.score,
        reasons: tally.reasons,
    }
}

/// The four cards a shooter can never give away.
pub fn is_critical(card: Card) -> bool {
    card == Card::ACE_OF_HEARTS
        || card.is_queen_of_spades()
        || card == Card::ACE_OF_SPADES
        || card == Card::KING_OF_SPADES
}

fn is_keep_card(card: Card) -> bool {
    is_critical(card)
        || card.rank >= Rank::Queen
        || (card.suit.is_heart() && card.rank >= Rank::Ten)
}

/// Pass priorities while attempting: keep control, shed low cards.
pub fn score_for_passing(hand: &Hand, params: &MoonParams) -> Vec<(Card, i32)> {
    hand.iter()
        .map(|&card| {
            let mut score = 0;
            if is_keep_card(card) {
                score += params.pass_keep_penalty;
            } else {
                let rank = card.rank.value();
                score += match rank {
                    2..=5 => params.pass_low_bonus[0],
                    6..=9 => params.pass_low_bonus[usize::from(rank - 5)],
                    _ => 0,
                };
            }
            if !card.suit.is_heart() && hand.count_suit(card.suit) <= 2 {
                score += params.pass_void_bonus;
            }
            if is_critical(card) {
                score += params.pass_critical_penalty;
            }
            (card, score)
        })
        .collect()
}

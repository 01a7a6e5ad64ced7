//! Pass selection for both moon modes.

use crate::context::PassContext;
use crate::moon::evaluator::{self, is_critical};
use crate::params::{MoonParams, PassParams};
use crate::scoring::{Rationale, ScoredCandidate, Tally, rank_candidates};
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;

/// Normal-mode priorities: shed liabilities, create voids, keep the two of clubs.
pub fn score_normal(ctx: &PassContext<'_>, params: &PassParams) -> Vec<ScoredCandidate> {
    let hand = ctx.hand();
    let trailing = passing_to_trailing(ctx);
    hand.iter()
        .map(|&card| {
            let rank = f32::from(card.rank.value());
            let suit_len = hand.count_suit(card.suit);
            let mut tally = Tally::default();

            if card.is_queen_of_spades() {
                tally.add(Rationale::PassQueen, params.queen_of_spades);
                if hand.count_suit(Suit::Spades) >= params.long_spades_len {
                    tally.add(Rationale::LongSuit, -params.long_spades_relief);
                }
            } else if card.is_spade_above_queen() {
                tally.add(Rationale::PassHighSpade, params.high_spade);
            } else if card.suit.is_heart() {
                tally.add(
                    Rationale::PassHeart,
                    params.heart_base + params.heart_rank_mult * rank,
                );
            } else if card.suit.is_minor() && card.rank >= Rank::King {
                tally.add(Rationale::PassHighCard, params.high_card_base + rank);
            }

            if !card.suit.is_heart() && suit_len <= 2 {
                tally.add(
                    Rationale::VoidCreation,
                    params.void_base - params.void_per_card * suit_len as f32,
                );
            }
            if suit_len > params.long_suit_len {
                tally.add(
                    Rationale::LongSuit,
                    -params.long_suit_per_card * (suit_len - params.long_suit_len) as f32,
                );
            }
            if card == Card::TWO_OF_CLUBS {
                tally.add(Rationale::KeepTwoOfClubs, params.two_of_clubs);
            }
            if trailing && card.is_penalty() {
                tally.add(
                    Rationale::PassToTrailing,
                    params.trailing_points_mult * f32::from(card.penalty_value()),
                );
            }
            tally.finish(card)
        })
        .collect()
}

/// The pass target has the worst (highest) score at the table.
fn passing_to_trailing(ctx: &PassContext<'_>) -> bool {
    let target = ctx.target();
    if target == ctx.seat {
        return false;
    }
    let target_score = ctx.scores.score(target);
    target_score > 0
        && PlayerPosition::LOOP
            .iter()
            .all(|&seat| ctx.scores.score(seat) <= target_score)
}

/// Attempting-mode priorities: keep control cards, shed the low ones.
pub fn score_moon(ctx: &PassContext<'_>, params: &MoonParams) -> Vec<ScoredCandidate> {
    evaluator::score_for_passing(ctx.hand(), params)
        .into_iter()
        .map(|(card, score)| {
            let reason = if is_critical(card) {
                Rationale::MoonCritical
            } else if score < 0 {
                Rationale::MoonKeep
            } else {
                Rationale::MoonPassLow
            };
            ScoredCandidate {
                card,
                score: score as f32,
                reasons: vec![reason],
            }
        })
        .collect()
}

/// Ranks `candidates` in place and returns the best three cards.
pub fn top_three(candidates: &mut [ScoredCandidate]) -> Option<[Card; 3]> {
    rank_candidates(candidates);
    match candidates {
        [a, b, c, ..] => Some([a.card, b.card, c.card]),
        _ => None,
    }
}

//! Deterministic legality rules.
//!
//! These are the pure functions the strategy layer consumes: which cards a seat
//! may legally play given its hand and the trick so far.

use crate::model::card::Card;
use crate::model::round::RoundState;
use crate::model::trick::Trick;

/// Legal cards for the seat to act, in hand order.
///
/// - The first lead of a round must be the two of clubs when held.
/// - Followers must follow the lead suit when able.
/// - Hearts may not be led until broken, unless the hand holds nothing else.
/// - On the first trick a void follower may not discard points unless the hand
///   holds nothing else; the queen of spades is the last resort.
pub fn valid_cards(
    hand: &[Card],
    trick: &Trick,
    hearts_broken: bool,
    first_trick: bool,
) -> Vec<Card> {
    let Some(lead_suit) = trick.lead_suit() else {
        return valid_leads(hand, hearts_broken, first_trick);
    };

    let following: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|card| card.suit == lead_suit)
        .collect();
    if !following.is_empty() {
        return following;
    }

    if first_trick {
        let clean: Vec<Card> = hand.iter().copied().filter(|c| !c.is_penalty()).collect();
        if !clean.is_empty() {
            return clean;
        }
        let hearts: Vec<Card> = hand.iter().copied().filter(|c| c.suit.is_heart()).collect();
        if !hearts.is_empty() {
            return hearts;
        }
    }

    hand.to_vec()
}

fn valid_leads(hand: &[Card], hearts_broken: bool, first_trick: bool) -> Vec<Card> {
    if first_trick && hand.contains(&Card::TWO_OF_CLUBS) {
        return vec![Card::TWO_OF_CLUBS];
    }

    if !hearts_broken {
        let non_hearts: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|card| !card.suit.is_heart())
            .collect();
        if !non_hearts.is_empty() {
            return non_hearts;
        }
    }

    hand.to_vec()
}

/// No trick of the round has been completed yet.
pub fn is_first_trick(round: &RoundState) -> bool {
    round.trick_history().is_empty()
}

/// Legal cards for whichever seat is next to act in `round`.
pub fn legal_for_next(round: &RoundState) -> Vec<Card> {
    let seat = round.current_trick().next_to_play();
    valid_cards(
        round.hand(seat).cards(),
        round.current_trick(),
        round.hearts_broken(),
        is_first_trick(round),
    )
}

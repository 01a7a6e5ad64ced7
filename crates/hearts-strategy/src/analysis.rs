//! Stateless queries over the trick in progress.

use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::round::RoundState;
use hearts_core::model::trick::{Play, Trick};

/// Penalty points already sitting in the trick.
pub fn trick_points(trick: &Trick) -> u8 {
    trick.penalty_total()
}

/// Highest card of the lead suit played so far and its owner.
pub fn current_high(trick: &Trick) -> Option<Play> {
    trick.current_high()
}

pub fn current_winner(trick: &Trick) -> Option<PlayerPosition> {
    current_high(trick).map(|play| play.position)
}

/// Whether `card` would take the lead if played now. Any lead is winning.
pub fn would_win(trick: &Trick, card: Card) -> bool {
    match current_high(trick) {
        None => true,
        Some(high) => card.suit == high.card.suit && card.rank > high.card.rank,
    }
}

/// Seats still to play after the acting seat, in order.
pub fn seats_after_actor(trick: &Trick) -> Vec<PlayerPosition> {
    let played = trick.plays().len();
    if played >= 4 {
        return Vec::new();
    }
    let actor = trick.next_to_play();
    let mut seats = Vec::with_capacity(3 - played);
    let mut seat = actor.next();
    for _ in played + 1..4 {
        seats.push(seat);
        seat = seat.next();
    }
    seats
}

pub fn is_last_to_act(trick: &Trick) -> bool {
    trick.plays().len() == 3
}

/// Whether `card` has been played anywhere in the round so far.
pub fn card_seen(round: &RoundState, card: Card) -> bool {
    round
        .trick_history()
        .iter()
        .chain(std::iter::once(round.current_trick()))
        .flat_map(|trick| trick.plays())
        .any(|play| play.card == card)
}

/// `hand` holds a card of `card`'s suit ranked below it.
pub fn has_lower_in_suit(hand: &[Card], card: Card) -> bool {
    hand.iter()
        .any(|other| other.suit == card.suit && other.rank < card.rank)
}

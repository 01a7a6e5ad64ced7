//! Per-round opponent memory.
//!
//! The log of observed plays is deliberately imperfect: entries older than the
//! retention window are forgotten. Void facts and behavioral accumulators are
//! kept for the whole round.

use crate::params::MemoryParams;
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;
use hearts_core::model::trick::Trick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RememberedPlay {
    pub card: Card,
    pub player: PlayerPosition,
    pub trick_index: usize,
    /// The player could not follow the lead suit.
    pub void_play: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorSignals {
    pub led_queen: bool,
    pub high_card_leads: u32,
    pub hearts_won: u32,
    pub missed_dumps: u32,
    pub voluntary_penalty_wins: u32,
}

impl BehaviorSignals {
    pub fn suspicion(&self, params: &MemoryParams) -> u32 {
        let led_queen = if self.led_queen { params.led_queen_weight } else { 0 };
        led_queen
            + params.high_card_lead_weight * self.high_card_leads
            + params.hearts_won_weight * self.hearts_won
            + params.voluntary_win_weight * self.voluntary_penalty_wins
            + params.missed_dump_weight * self.missed_dumps
    }
}

#[derive(Debug, Clone)]
pub struct OpponentMemory {
    params: MemoryParams,
    log: Vec<RememberedPlay>,
    voids: [[bool; 4]; 4],
    signals: [BehaviorSignals; 4],
    tricks_observed: usize,
}

impl OpponentMemory {
    pub fn new(params: MemoryParams) -> Self {
        Self {
            params,
            log: Vec::with_capacity(32),
            voids: [[false; 4]; 4],
            signals: [BehaviorSignals::default(); 4],
            tricks_observed: 0,
        }
    }

    pub fn reset(&mut self) {
        self.log.clear();
        self.voids = [[false; 4]; 4];
        self.signals = [BehaviorSignals::default(); 4];
        self.tricks_observed = 0;
    }

    /// Records one completed trick. Must run exactly once per trick.
    pub fn record_trick(&mut self, trick: &Trick, trick_index: usize, winner: PlayerPosition) {
        let Some(lead_suit) = trick.lead_suit() else {
            return;
        };

        for (order, play) in trick.plays().iter().enumerate() {
            let seat = play.position.index();
            let void_play = play.card.suit != lead_suit;
            self.log.push(RememberedPlay {
                card: play.card,
                player: play.position,
                trick_index,
                void_play,
            });

            if void_play {
                self.voids[seat][lead_suit.index()] = true;
                if play.card.penalty_value() == 0 {
                    self.signals[seat].missed_dumps += 1;
                }
            }

            if order == 0 {
                if play.card.is_queen_of_spades() {
                    self.signals[seat].led_queen = true;
                }
                if play.card.rank.is_face_or_ace() {
                    self.signals[seat].high_card_leads += 1;
                }
            }
        }

        let hearts = trick
            .plays()
            .iter()
            .filter(|play| play.card.suit.is_heart())
            .count() as u32;
        let winner_order = trick
            .plays()
            .iter()
            .position(|play| play.position == winner);
        let signals = &mut self.signals[winner.index()];
        signals.hearts_won += hearts;
        if trick.penalty_total() > 0 && winner_order.is_some_and(|order| order >= 2) {
            signals.voluntary_penalty_wins += 1;
        }

        self.tricks_observed += 1;
        let cutoff = (trick_index + 1).saturating_sub(self.params.retention_window);
        self.log.retain(|entry| entry.trick_index >= cutoff);
    }

    pub fn is_card_played(&self, card: Card) -> bool {
        self.log.iter().any(|entry| entry.card == card)
    }

    pub fn is_player_void(&self, seat: PlayerPosition, suit: Suit) -> bool {
        self.voids[seat.index()][suit.index()]
    }

    /// Not void, and nothing remembered in `suit` from `seat` reaches jack rank.
    pub fn might_have_high_cards(&self, seat: PlayerPosition, suit: Suit) -> bool {
        if self.is_player_void(seat, suit) {
            return false;
        }
        let highest = self
            .log
            .iter()
            .filter(|entry| entry.player == seat && entry.card.suit == suit)
            .map(|entry| entry.card.rank)
            .max();
        match highest {
            None => true,
            Some(rank) => rank < Rank::Jack,
        }
    }

    /// Jack-through-ace cards of `suit` that are neither remembered nor held.
    pub fn count_unseen_high_cards(&self, suit: Suit, hand: &Hand) -> usize {
        [Rank::Jack, Rank::Queen, Rank::King, Rank::Ace]
            .into_iter()
            .map(|rank| Card::new(rank, suit))
            .filter(|card| !hand.contains(*card) && !self.is_card_played(*card))
            .count()
    }

    pub fn remembered_cards(&self) -> &[RememberedPlay] {
        &self.log
    }

    pub fn tricks_observed(&self) -> usize {
        self.tricks_observed
    }

    pub fn is_reliable(&self) -> bool {
        self.tricks_observed >= self.params.reliable_after
    }

    pub fn signals(&self, seat: PlayerPosition) -> &BehaviorSignals {
        &self.signals[seat.index()]
    }

    pub fn suspicion(&self, seat: PlayerPosition) -> u32 {
        self.signals[seat.index()].suspicion(&self.params)
    }

    /// Seats with a positive suspicion score, most suspicious first.
    pub fn suspects(&self) -> Vec<(PlayerPosition, u32)> {
        let mut ranked: Vec<(PlayerPosition, u32)> = PlayerPosition::LOOP
            .iter()
            .map(|&seat| (seat, self.suspicion(seat)))
            .filter(|&(_, score)| score > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.index().cmp(&b.0.index())));
        ranked
    }
}

impl Default for OpponentMemory {
    fn default() -> Self {
        Self::new(MemoryParams::default())
    }
}

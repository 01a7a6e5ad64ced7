//! Candidate scoring for the three trick phases.
//!
//! Scorers attach [`Rationale`] codes to every adjustment they make. Ranking
//! only ever reads `score`; the codes exist for traces.

pub mod dump;
pub mod follow;
pub mod lead;

use crate::aggression::AggressionModifiers;
use crate::analysis;
use crate::context::PlayContext;
use crate::memory::OpponentMemory;
use crate::params::StrategyParams;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::suit::Suit;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rationale {
    RankBias,
    QueenOfSpades,
    HeartsUnbroken,
    HeartsIntoVoid,
    HighHeartIntoVoid,
    HeartRank,
    FishForQueen,
    QueenGone,
    HoldingQueen,
    SpadeAboveLiveQueen,
    OpponentVoid,
    HighCardsOutstanding,
    ShooterVoid,
    ShooterPrevention,
    MoonRunSuit,
    MoonEarlyHeart,
    MoonEarlyQueen,
    MoonEarlyHighSpade,
    MoonHeartSweep,
    MoonQueenCapture,
    MoonLongSuit,
    MoonHighRank,
    QueenWin,
    RiskySpade,
    FirstTrickWin,
    StopShooter,
    LetWinnerTake,
    AvoidPoints,
    ForcedWin,
    SafeLastWin,
    VoidBehind,
    RiskyWin,
    Duck,
    Bluff,
    MoonWin,
    MoonLose,
    MoonLostPoints,
    DumpQueen,
    DumpHeart,
    DumpHighSpade,
    DumpHighCard,
    DumpLowCard,
    ShooterWinning,
    FeedNonShooter,
    RetainHighCard,
    FeedLeader,
    WithholdFromNonLeader,
    ProtectLowSpade,
    MoonKeepPenalty,
    MoonShedLow,
    MoonKeepHigh,
    PassQueen,
    PassHighSpade,
    PassHeart,
    PassHighCard,
    VoidCreation,
    LongSuit,
    KeepTwoOfClubs,
    PassToTrailing,
    MoonKeep,
    MoonPassLow,
    MoonCritical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub card: Card,
    pub score: f32,
    pub reasons: Vec<Rationale>,
}

/// Accumulates one candidate's score alongside its rationale codes.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    score: f32,
    reasons: Vec<Rationale>,
}

impl Tally {
    pub(crate) fn add(&mut self, reason: Rationale, delta: f32) {
        self.score += delta;
        self.reasons.push(reason);
    }

    pub(crate) fn finish(self, card: Card) -> ScoredCandidate {
        ScoredCandidate {
            card,
            score: self.score,
            reasons: self.reasons,
        }
    }
}

/// Where the queen of spades stands from this agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueenStatus {
    Held,
    Live,
    Gone,
}

/// Everything a scorer may read for one decision.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs<'a> {
    pub ctx: &'a PlayContext<'a>,
    pub memory: Option<&'a OpponentMemory>,
    pub shooter: Option<PlayerPosition>,
    pub attempting: bool,
    pub modifiers: &'a AggressionModifiers,
    pub params: &'a StrategyParams,
}

impl ScoringInputs<'_> {
    /// A detected shooter other than this agent.
    pub fn opposing_shooter(&self) -> Option<PlayerPosition> {
        self.shooter.filter(|&seat| seat != self.ctx.seat)
    }

    /// Seen through memory when available, otherwise through the public record.
    pub fn queen_status(&self) -> QueenStatus {
        if self.ctx.hand().contains(Card::QUEEN_OF_SPADES) {
            return QueenStatus::Held;
        }
        let in_trick = self
            .ctx
            .trick()
            .plays()
            .iter()
            .any(|play| play.card.is_queen_of_spades());
        let seen = in_trick
            || match self.memory {
                Some(memory) => memory.is_card_played(Card::QUEEN_OF_SPADES),
                None => analysis::card_seen(self.ctx.round, Card::QUEEN_OF_SPADES),
            };
        if seen {
            QueenStatus::Gone
        } else {
            QueenStatus::Live
        }
    }

    pub fn opponent_void(&self, seat: PlayerPosition, suit: Suit) -> bool {
        self.memory
            .is_some_and(|memory| memory.is_player_void(seat, suit))
    }
}

/// Orders best-first; ties break on suit then rank so results are reproducible.
pub fn rank_candidates(candidates: &mut [ScoredCandidate]) {
    debug_assert!(
        candidates.iter().all(|candidate| candidate.score.is_finite()),
        "candidate scores must be finite"
    );
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.card.sort_key().cmp(&b.card.sort_key()))
    });
}

//! The agent session: per-round state threaded through every decision.

use crate::aggression::{self, AggressionModifiers};
use crate::context::{PassContext, PlayContext};
use crate::memory::OpponentMemory;
use crate::moon::{self, MoonState};
use crate::params::StrategyParams;
use crate::pass;
use crate::scoring::{self, ScoredCandidate, ScoringInputs, rank_candidates};
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::score::ScoreBoard;
use hearts_core::model::trick::Trick;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("no legal cards were supplied")]
    NoLegalCards,
    #[error("a pass needs three cards but the hand holds {held}")]
    HandTooSmall { held: usize },
}

/// What a single decision looked like, for inspection only.
#[derive(Debug, Clone)]
pub struct DecisionTrace {
    pub tag: &'static str,
    pub seat: PlayerPosition,
    pub chosen: Vec<Card>,
    pub candidates: Vec<ScoredCandidate>,
    pub aggression: f32,
    pub moon: MoonState,
    pub shooter: Option<PlayerPosition>,
    pub remembered: usize,
}

/// Receives every decision trace. Nothing it does can influence play.
pub trait DecisionObserver: Send {
    fn observe(&mut self, trace: &DecisionTrace);
}

pub struct AgentSession<R: Rng = StdRng> {
    seat: PlayerPosition,
    params: StrategyParams,
    memory: OpponentMemory,
    moon: MoonState,
    base_aggression: f32,
    effective_aggression: f32,
    rng: R,
    observer: Option<Box<dyn DecisionObserver>>,
}

impl AgentSession<StdRng> {
    pub fn with_seed(seat: PlayerPosition, params: StrategyParams, seed: u64) -> Self {
        Self::new(seat, params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AgentSession<R> {
    /// Draws the personality base from `rng`; the same generator feeds bluffs.
    pub fn new(seat: PlayerPosition, params: StrategyParams, mut rng: R) -> Self {
        let base = aggression::generate_base(&params.aggression, &mut rng);
        let memory = OpponentMemory::new(params.memory.clone());
        Self {
            seat,
            params,
            memory,
            moon: MoonState::Normal,
            base_aggression: base,
            effective_aggression: base,
            rng,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn DecisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn seat(&self) -> PlayerPosition {
        self.seat
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn memory(&self) -> &OpponentMemory {
        &self.memory
    }

    pub fn moon_state(&self) -> MoonState {
        self.moon
    }

    pub fn base_aggression(&self) -> f32 {
        self.base_aggression
    }

    pub fn effective_aggression(&self) -> f32 {
        self.effective_aggression
    }

    /// Must run once before the first decision of every round.
    pub fn on_round_start(&mut self) {
        self.memory.reset();
        self.moon = MoonState::Normal;
    }

    /// Must run exactly once per completed trick, before the next lead.
    pub fn on_trick_complete(&mut self, trick: &Trick, winner: PlayerPosition, trick_index: usize) {
        self.memory.record_trick(trick, trick_index, winner);

        if let MoonState::Attempting { confidence } = self.moon
            && trick.penalty_total() > 0
            && winner != self.seat
        {
            self.moon = MoonState::Normal;
            event!(
                target: "hearts_strategy::moon",
                Level::INFO,
                seat = %self.seat,
                winner = %winner,
                trick_index,
                confidence,
                points = trick.penalty_total(),
                "moon attempt aborted"
            );
        }
    }

    pub fn choose_cards_to_pass(
        &mut self,
        ctx: &PassContext<'_>,
    ) -> Result<[Card; 3], DecisionError> {
        let held = ctx.hand().len();
        if held < 3 {
            return Err(DecisionError::HandTooSmall { held });
        }
        let modifiers = self.refresh_aggression(ctx.scores);

        if !self.moon.is_attempting() && ctx.direction.requires_selection() {
            let evaluation =
                moon::evaluate(ctx.hand(), &self.params.moon, modifiers.moon_threshold_shift);
            if evaluation.should_attempt {
                self.moon = MoonState::Attempting {
                    confidence: evaluation.confidence,
                };
                let reasons: Vec<String> =
                    evaluation.reasons.iter().map(ToString::to_string).collect();
                event!(
                    target: "hearts_strategy::moon",
                    Level::INFO,
                    seat = %self.seat,
                    score = evaluation.score,
                    confidence = evaluation.confidence,
                    reasons = ?reasons,
                    "committing to a moon attempt"
                );
            }
        }

        let (tag, mut candidates) = if self.moon.is_attempting() {
            ("pass_moon", pass::score_moon(ctx, &self.params.moon))
        } else {
            ("pass", pass::score_normal(ctx, &self.params.pass))
        };
        let selection =
            pass::top_three(&mut candidates).ok_or(DecisionError::HandTooSmall { held })?;

        self.publish(DecisionTrace {
            tag,
            seat: self.seat,
            chosen: selection.to_vec(),
            candidates,
            aggression: modifiers.effective,
            moon: self.moon,
            shooter: None,
            remembered: self.memory.remembered_cards().len(),
        });
        Ok(selection)
    }

    pub fn choose_card_to_play(&mut self, ctx: &PlayContext<'_>) -> Result<Card, DecisionError> {
        if ctx.legal.is_empty() {
            return Err(DecisionError::NoLegalCards);
        }
        let modifiers = self.refresh_aggression(ctx.scores);

        if ctx.is_first_trick() && ctx.legal.contains(&Card::TWO_OF_CLUBS) {
            self.publish(DecisionTrace {
                tag: "forced_two_of_clubs",
                seat: self.seat,
                chosen: vec![Card::TWO_OF_CLUBS],
                candidates: Vec::new(),
                aggression: modifiers.effective,
                moon: self.moon,
                shooter: None,
                remembered: self.memory.remembered_cards().len(),
            });
            return Ok(Card::TWO_OF_CLUBS);
        }

        let attempting = self.moon.is_attempting();
        let shooter = if attempting {
            None
        } else {
            moon::detect(ctx.round, &self.params.detector, Some(&self.memory), self.seat)
        };

        let (tag, mut candidates) = {
            let inputs = ScoringInputs {
                ctx,
                memory: Some(&self.memory),
                shooter,
                attempting,
                modifiers: &modifiers,
                params: &self.params,
            };
            match ctx.lead_suit() {
                None => ("lead", scoring::lead::score(&inputs)),
                Some(suit) if ctx.hand().has_suit(suit) => {
                    let bluff = if attempting {
                        None
                    } else {
                        roll_bluff(
                            &mut self.rng,
                            modifiers.bluff_probability,
                            self.params.follow.bluff_max_bonus,
                        )
                    };
                    ("follow", scoring::follow::score(&inputs, bluff))
                }
                Some(_) => ("dump", scoring::dump::score(&inputs)),
            }
        };
        rank_candidates(&mut candidates);

        let chosen = candidates
            .iter()
            .map(|candidate| candidate.card)
            .find(|card| ctx.legal.contains(card))
            .ok_or(DecisionError::NoLegalCards)?;

        self.publish(DecisionTrace {
            tag,
            seat: self.seat,
            chosen: vec![chosen],
            candidates,
            aggression: modifiers.effective,
            moon: self.moon,
            shooter,
            remembered: self.memory.remembered_cards().len(),
        });
        Ok(chosen)
    }

    fn refresh_aggression(&mut self, scores: &ScoreBoard) -> AggressionModifiers {
        self.effective_aggression = aggression::effective(
            &self.params.aggression,
            self.base_aggression,
            scores,
            self.seat,
        );
        AggressionModifiers::from_effective(&self.params.aggression, self.effective_aggression)
    }

    fn publish(&mut self, trace: DecisionTrace) {
        if tracing::enabled!(target: "hearts_strategy::decision", Level::DEBUG) {
            let chosen: Vec<String> = trace.chosen.iter().map(ToString::to_string).collect();
            let top: Vec<String> = trace
                .candidates
                .iter()
                .take(3)
                .map(|candidate| format!("{}:{:.1}", candidate.card, candidate.score))
                .collect();
            event!(
                target: "hearts_strategy::decision",
                Level::DEBUG,
                tag = trace.tag,
                seat = %trace.seat,
                chosen = ?chosen,
                top = ?top,
                candidates = trace.candidates.len(),
                aggression = trace.aggression,
                moon = trace.moon.as_str(),
                shooter = ?trace.shooter,
                remembered = trace.remembered,
            );
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&trace);
        }
    }
}

/// One draw per follow decision: whether a bluff fires, and how large it is.
fn roll_bluff<R: Rng + ?Sized>(rng: &mut R, probability: f32, max_bonus: f32) -> Option<f32> {
    let fired = rng.gen_bool(f64::from(probability.clamp(0.0, 1.0)));
    if fired && max_bonus > 0.0 {
        Some(rng.gen_range(0.0..=max_bonus))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearts_core::model::hand::Hand;
    use hearts_core::model::passing::PassingDirection;
    use hearts_core::model::rank::Rank;
    use hearts_core::model::round::RoundState;
    use crate::params::Span;
    use crate::scoring::Rationale;
    use hearts_core::model::suit::Suit;
    use std::sync::{Arc, Mutex};

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    struct Recorder(Arc<Mutex<Vec<&'static str>>>);

    impl DecisionObserver for Recorder {
        fn observe(&mut self, trace: &DecisionTrace) {
            self.0.lock().unwrap().push(trace.tag);
        }
    }

    /// Records whether the follow scorer saw a bluff bonus.
    struct BluffRecorder(Arc<Mutex<Vec<bool>>>);

    impl DecisionObserver for BluffRecorder {
        fn observe(&mut self, trace: &DecisionTrace) {
            let bluffed = trace
                .candidates
                .iter()
                .any(|candidate| candidate.reasons.contains(&Rationale::Bluff));
            self.0.lock().unwrap().push(bluffed);
        }
    }

    /// West is last to act on a pointless diamond trick, one trick in.
    fn safe_last_seat_round() -> RoundState {
        let earlier = Trick::from_plays(
            PlayerPosition::North,
            &[
                (PlayerPosition::North, Card::TWO_OF_CLUBS),
                (PlayerPosition::East, c(Rank::Four, Suit::Clubs)),
                (PlayerPosition::South, c(Rank::Five, Suit::Clubs)),
                (PlayerPosition::West, c(Rank::Six, Suit::Clubs)),
            ],
        )
        .unwrap();
        let current = Trick::from_plays(
            PlayerPosition::North,
            &[
                (PlayerPosition::North, c(Rank::Five, Suit::Diamonds)),
                (PlayerPosition::East, c(Rank::Six, Suit::Diamonds)),
                (PlayerPosition::South, c(Rank::Seven, Suit::Diamonds)),
            ],
        )
        .unwrap();
        let mut hands: [Hand; 4] = Default::default();
        hands[PlayerPosition::West.index()] =
            Hand::with_cards(vec![c(Rank::Two, Suit::Diamonds), c(Rank::King, Suit::Diamonds)]);
        RoundState::from_hands_with_state(
            hands,
            PlayerPosition::North,
            PassingDirection::Hold,
            current,
            vec![earlier],
            false,
        )
    }

    fn moon_round() -> RoundState {
        let hand = [
            Card::ACE_OF_HEARTS,
            c(Rank::King, Suit::Hearts),
            c(Rank::Nine, Suit::Hearts),
            c(Rank::Five, Suit::Hearts),
            Card::QUEEN_OF_SPADES,
            Card::KING_OF_SPADES,
            c(Rank::Three, Suit::Spades),
            c(Rank::Ace, Suit::Clubs),
            c(Rank::King, Suit::Clubs),
            c(Rank::Four, Suit::Clubs),
            c(Rank::Ace, Suit::Diamonds),
            c(Rank::Queen, Suit::Diamonds),
            c(Rank::Two, Suit::Diamonds),
        ];
        let mut hands: [Hand; 4] = Default::default();
        hands[PlayerPosition::North.index()] = Hand::with_cards(hand.to_vec());
        RoundState::from_hands_with_state(
            hands,
            PlayerPosition::North,
            PassingDirection::Left,
            Trick::new(PlayerPosition::North),
            Vec::new(),
            false,
        )
    }

    #[test]
    fn strong_hand_commits_at_pass_and_aborts_on_foreign_points() {
        let round = moon_round();
        let scores = ScoreBoard::new();
        let mut session =
            AgentSession::with_seed(PlayerPosition::North, StrategyParams::default(), 3);
        session.on_round_start();
        let ctx = PassContext::new(PlayerPosition::North, &round, &scores);
        let passed = session.choose_cards_to_pass(&ctx).unwrap();
        assert!(session.moon_state().is_attempting());
        assert!(!passed.contains(&Card::ACE_OF_HEARTS));
        assert!(!passed.contains(&Card::QUEEN_OF_SPADES));

        let clean = Trick::from_plays(
            PlayerPosition::North,
            &[
                (PlayerPosition::North, c(Rank::Three, Suit::Clubs)),
                (PlayerPosition::East, c(Rank::Ace, Suit::Clubs)),
                (PlayerPosition::South, c(Rank::Five, Suit::Clubs)),
                (PlayerPosition::West, c(Rank::Six, Suit::Clubs)),
            ],
        )
        .unwrap();
        session.on_trick_complete(&clean, PlayerPosition::East, 0);
        assert!(session.moon_state().is_attempting());

        let pointed = Trick::from_plays(
            PlayerPosition::East,
            &[
                (PlayerPosition::East, c(Rank::Seven, Suit::Diamonds)),
                (PlayerPosition::South, c(Rank::Two, Suit::Hearts)),
                (PlayerPosition::West, c(Rank::Eight, Suit::Diamonds)),
                (PlayerPosition::North, c(Rank::Three, Suit::Diamonds)),
            ],
        )
        .unwrap();
        session.on_trick_complete(&pointed, PlayerPosition::West, 1);
        assert_eq!(session.moon_state(), MoonState::Normal);

        session.on_round_start();
        assert_eq!(session.moon_state(), MoonState::Normal);
        assert!(session.memory().remembered_cards().is_empty());
    }

    #[test]
    fn hold_rounds_never_commit() {
        let mut round_hands: [Hand; 4] = Default::default();
        round_hands[0] = moon_round().hand(PlayerPosition::North).clone();
        let round = RoundState::from_hands_with_state(
            round_hands,
            PlayerPosition::North,
            PassingDirection::Hold,
            Trick::new(PlayerPosition::North),
            Vec::new(),
            false,
        );
        let scores = ScoreBoard::new();
        let mut session =
            AgentSession::with_seed(PlayerPosition::North, StrategyParams::default(), 3);
        let ctx = PassContext::new(PlayerPosition::North, &round, &scores);
        session.choose_cards_to_pass(&ctx).unwrap();
        assert_eq!(session.moon_state(), MoonState::Normal);
    }

    #[test]
    fn errors_on_malformed_requests() {
        let round = moon_round();
        let scores = ScoreBoard::new();
        let mut session =
            AgentSession::with_seed(PlayerPosition::East, StrategyParams::default(), 1);
        let ctx = PassContext::new(PlayerPosition::East, &round, &scores);
        assert_eq!(
            session.choose_cards_to_pass(&ctx),
            Err(DecisionError::HandTooSmall { held: 0 })
        );
        let play = PlayContext::new(PlayerPosition::East, &round, &scores, &[]);
        assert_eq!(
            session.choose_card_to_play(&play),
            Err(DecisionError::NoLegalCards)
        );
    }

    #[test]
    fn observer_sees_every_decision() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let round = moon_round();
        let scores = ScoreBoard::new();
        let mut session =
            AgentSession::with_seed(PlayerPosition::North, StrategyParams::default(), 9)
                .with_observer(Box::new(Recorder(Arc::clone(&log))));
        let legal = vec![c(Rank::Four, Suit::Clubs), c(Rank::King, Suit::Clubs)];
        let ctx = PlayContext::new(PlayerPosition::North, &round, &scores, &legal);
        let card = session.choose_card_to_play(&ctx).unwrap();
        assert!(legal.contains(&card));
        assert_eq!(log.lock().unwrap().as_slice(), &["lead"]);
    }

    #[test]
    fn bluff_roll_respects_probability_and_bound() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..64 {
            assert_eq!(roll_bluff(&mut rng, 0.0, 25.0), None);
            assert_eq!(roll_bluff(&mut rng, 1.0, 0.0), None);
            let bonus = roll_bluff(&mut rng, 1.0, 25.0).unwrap();
            assert!((0.0..=25.0).contains(&bonus));
        }

        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        for _ in 0..32 {
            assert_eq!(roll_bluff(&mut a, 0.3, 25.0), roll_bluff(&mut b, 0.3, 25.0));
        }
    }

    #[test]
    fn bluff_bonus_reaches_safe_last_seat_follows() {
        let round = safe_last_seat_round();
        let scores = ScoreBoard::new();
        let legal = vec![c(Rank::Two, Suit::Diamonds), c(Rank::King, Suit::Diamonds)];

        for (probability, expected) in [(1.0, true), (0.0, false)] {
            let mut params = StrategyParams::default();
            params.aggression.bluff_probability = Span::new(probability, probability);
            for seed in 0u64..8 {
                let log = Arc::new(Mutex::new(Vec::new()));
                let mut session =
                    AgentSession::with_seed(PlayerPosition::West, params.clone(), seed)
                        .with_observer(Box::new(BluffRecorder(Arc::clone(&log))));
                session.on_round_start();
                let ctx = PlayContext::new(PlayerPosition::West, &round, &scores, &legal);
                let card = session.choose_card_to_play(&ctx).unwrap();
                assert!(legal.contains(&card));
                assert_eq!(log.lock().unwrap().as_slice(), &[expected], "seed {seed}");
            }
        }
    }
}

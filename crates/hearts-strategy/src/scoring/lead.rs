use super::{QueenStatus, Rationale, ScoredCandidate, ScoringInputs, Tally};
use hearts_core::model::card::Card;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;

pub fn score(inputs: &ScoringInputs<'_>) -> Vec<ScoredCandidate> {
    inputs
        .ctx
        .legal
        .iter()
        .map(|&card| {
            if inputs.attempting {
                score_moon_lead(inputs, card)
            } else {
                score_normal_lead(inputs, card)
            }
        })
        .collect()
}

fn score_normal_lead(inputs: &ScoringInputs<'_>, card: Card) -> ScoredCandidate {
    let params = &inputs.params.lead;
    let ctx = inputs.ctx;
    let rank = f32::from(card.rank.value());
    let mut tally = Tally::default();

    tally.add(Rationale::RankBias, -params.rank_mult * rank);

    if card.is_queen_of_spades() {
        tally.add(Rationale::QueenOfSpades, params.queen_of_spades);
    }

    if card.suit.is_heart() {
        let holds_other_suits = ctx.hand().iter().any(|c| !c.suit.is_heart());
        let void_in_hearts = ctx
            .seat
            .others()
            .any(|seat| inputs.opponent_void(seat, Suit::Hearts));
        if !ctx.round.hearts_broken() && holds_other_suits {
            tally.add(Rationale::HeartsUnbroken, params.unbroken_hearts);
        } else if void_in_hearts {
            if card.rank.value() <= params.void_hearts_low_max_rank {
                tally.add(Rationale::HeartsIntoVoid, params.void_hearts_low_bonus);
            } else if card.rank.value() >= params.void_hearts_high_min_rank {
                tally.add(Rationale::HighHeartIntoVoid, params.void_hearts_high_penalty);
            }
        } else {
            tally.add(Rationale::HeartRank, -params.heart_rank_mult * rank);
        }
    }

    if card.is_spade_below_queen() {
        match inputs.queen_status() {
            QueenStatus::Live => tally.add(Rationale::FishForQueen, params.fish_queen_unseen),
            QueenStatus::Gone => tally.add(Rationale::QueenGone, params.fish_queen_gone),
            QueenStatus::Held => tally.add(Rationale::HoldingQueen, params.holding_queen_low_spade),
        }
    } else if card.is_spade_above_queen() && inputs.queen_status() == QueenStatus::Live {
        tally.add(Rationale::SpadeAboveLiveQueen, params.high_spade_queen_live);
    }

    if let Some(memory) = inputs.memory {
        let voids = ctx
            .seat
            .others()
            .filter(|&seat| memory.is_player_void(seat, card.suit))
            .count();
        if voids > 0 {
            tally.add(Rationale::OpponentVoid, params.opponent_void_bonus * voids as f32);
        }
        if card.rank.value() <= params.high_holder_max_rank {
            let holders = ctx
                .seat
                .others()
                .filter(|&seat| memory.might_have_high_cards(seat, card.suit))
                .count();
            if holders > 0 {
                tally.add(
                    Rationale::HighCardsOutstanding,
                    params.high_holder_bonus * holders as f32,
                );
            }
        }
    }

    if let Some(shooter) = inputs.opposing_shooter() {
        if inputs.opponent_void(shooter, card.suit) {
            tally.add(Rationale::ShooterVoid, params.shooter_void_penalty);
        } else {
            tally.add(Rationale::ShooterPrevention, params.shooter_prevention_bonus);
        }
    }

    tally.finish(card)
}

fn score_moon_lead(inputs: &ScoringInputs<'_>, card: Card) -> ScoredCandidate {
    let params = &inputs.params.lead;
    let ctx = inputs.ctx;
    let rank = f32::from(card.rank.value());
    let trick = ctx.trick_index();
    let mut tally = Tally::default();

    tally.add(Rationale::RankBias, params.moon_rank_mult * rank);

    if trick <= params.moon_early_last_trick {
        if card.suit.is_minor() {
            tally.add(Rationale::MoonRunSuit, params.moon_minor_suit_bonus);
            let high_in_suit = ctx
                .hand()
                .suit_cards(card.suit)
                .filter(|c| c.rank.is_face_or_ace())
                .count();
            if high_in_suit >= params.moon_run_suit_min_high {
                tally.add(Rationale::MoonRunSuit, params.moon_run_suit_bonus);
            }
        } else if card.suit.is_heart() {
            tally.add(Rationale::MoonEarlyHeart, params.moon_early_heart_penalty);
        } else if card.is_queen_of_spades() {
            tally.add(Rationale::MoonEarlyQueen, params.moon_early_queen_penalty);
        } else if card.is_spade_above_queen() {
            tally.add(Rationale::MoonEarlyHighSpade, params.moon_early_high_spade_penalty);
        }
    } else if trick <= params.moon_mid_last_trick {
        if card.suit.is_heart() {
            tally.add(Rationale::MoonHeartSweep, params.moon_mid_heart_rank_mult * rank);
        } else if card.is_queen_of_spades() {
            tally.add(Rationale::MoonQueenCapture, params.moon_mid_queen_bonus);
        }
    } else if card.suit.is_heart() {
        tally.add(Rationale::MoonHeartSweep, params.moon_late_heart_bonus + rank);
    } else if card.is_queen_of_spades() {
        tally.add(Rationale::MoonQueenCapture, params.moon_late_queen_bonus);
    }

    if ctx.hand().count_suit(card.suit) >= params.moon_long_suit_len {
        tally.add(Rationale::MoonLongSuit, params.moon_long_suit_bonus);
    }
    if card.rank >= Rank::Queen {
        tally.add(Rationale::MoonHighRank, params.moon_high_rank_bonus);
    }

    tally.finish(card)
}

#[cfg(test)]
mod tests {
    use super::score;
    use crate::aggression::AggressionModifiers;
    use crate::context::PlayContext;
    use crate::memory::OpponentMemory;
    use crate::params::StrategyParams;
    use crate::scoring::{Rationale, ScoredCandidate, ScoringInputs, rank_candidates};
    use hearts_core::model::card::Card;
    use hearts_core::model::hand::Hand;
    use hearts_core::model::passing::PassingDirection;
    use hearts_core::model::player::PlayerPosition;
    use hearts_core::model::rank::Rank;
    use hearts_core::model::round::RoundState;
    use hearts_core::model::score::ScoreBoard;
    use hearts_core::model::suit::Suit;
    use hearts_core::model::trick::Trick;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn best_lead(
        hand: Vec<Card>,
        hearts_broken: bool,
        attempting: bool,
        trick_index: usize,
    ) -> Card {
        let mut hands: [Hand; 4] = Default::default();
        hands[PlayerPosition::South.index()] = Hand::with_cards(hand.clone());
        let filler = Trick::from_plays(
            PlayerPosition::North,
            &[
                (PlayerPosition::North, c(Rank::Three, Suit::Diamonds)),
                (PlayerPosition::East, c(Rank::Four, Suit::Diamonds)),
                (PlayerPosition::South, c(Rank::Five, Suit::Diamonds)),
                (PlayerPosition::West, c(Rank::Six, Suit::Diamonds)),
            ],
        )
        .unwrap();
        let round = RoundState::from_hands_with_state(
            hands,
            PlayerPosition::South,
            PassingDirection::Hold,
            Trick::new(PlayerPosition::South),
            vec![filler; trick_index],
            hearts_broken,
        );
        let scores = ScoreBoard::new();
        let ctx = PlayContext::new(PlayerPosition::South, &round, &scores, &hand);
        let params = StrategyParams::default();
        let modifiers = AggressionModifiers::from_effective(&params.aggression, 0.5);
        let inputs = ScoringInputs {
            ctx: &ctx,
            memory: None,
            shooter: None,
            attempting,
            modifiers: &modifiers,
            params: &params,
        };
        let mut candidates = score(&inputs);
        rank_candidates(&mut candidates);
        candidates[0].card
    }

    #[test]
    fn normal_lead_prefers_low_safe_cards() {
        let hand = vec![
            Card::QUEEN_OF_SPADES,
            c(Rank::Two, Suit::Hearts),
            c(Rank::Ace, Suit::Clubs),
            c(Rank::Four, Suit::Diamonds),
        ];
        assert_eq!(best_lead(hand, false, false, 3), c(Rank::Four, Suit::Diamonds));
    }

    #[test]
    fn low_spades_fish_for_a_live_queen() {
        let hand = vec![c(Rank::Five, Suit::Spades), c(Rank::Four, Suit::Clubs)];
        assert_eq!(best_lead(hand, true, false, 3), c(Rank::Five, Suit::Spades));
    }

    #[test]
    fn early_moon_lead_runs_a_minor_suit() {
        let hand = vec![
            c(Rank::Ace, Suit::Hearts),
            c(Rank::Ace, Suit::Clubs),
            c(Rank::King, Suit::Clubs),
            c(Rank::King, Suit::Spades),
        ];
        assert_eq!(best_lead(hand, true, true, 2), c(Rank::Ace, Suit::Clubs));
    }

    #[test]
    fn late_moon_lead_sweeps_hearts() {
        let hand = vec![c(Rank::Ace, Suit::Hearts), c(Rank::Ace, Suit::Clubs)];
        assert_eq!(best_lead(hand, true, true, 11), c(Rank::Ace, Suit::Hearts));
    }

    /// South leads after West showed out of clubs on trick 0.
    fn scored_after_club_void(
        hand: Vec<Card>,
        shooter: Option<PlayerPosition>,
    ) -> Vec<ScoredCandidate> {
        let mut hands: [Hand; 4] = Default::default();
        hands[PlayerPosition::South.index()] = Hand::with_cards(hand.clone());
        let earlier = Trick::from_plays(
            PlayerPosition::North,
            &[
                (PlayerPosition::North, Card::TWO_OF_CLUBS),
                (PlayerPosition::East, c(Rank::Three, Suit::Clubs)),
                (PlayerPosition::South, c(Rank::Five, Suit::Clubs)),
                (PlayerPosition::West, c(Rank::Eight, Suit::Diamonds)),
            ],
        )
        .unwrap();
        let mut memory = OpponentMemory::default();
        memory.record_trick(&earlier, 0, PlayerPosition::South);
        let round = RoundState::from_hands_with_state(
            hands,
            PlayerPosition::North,
            PassingDirection::Hold,
            Trick::new(PlayerPosition::South),
            vec![earlier],
            true,
        );
        let scores = ScoreBoard::new();
        let ctx = PlayContext::new(PlayerPosition::South, &round, &scores, &hand);
        let params = StrategyParams::default();
        let modifiers = AggressionModifiers::from_effective(&params.aggression, 0.5);
        let inputs = ScoringInputs {
            ctx: &ctx,
            memory: Some(&memory),
            shooter,
            attempting: false,
            modifiers: &modifiers,
            params: &params,
        };
        let mut candidates = score(&inputs);
        rank_candidates(&mut candidates);
        candidates
    }

    fn find(candidates: &[ScoredCandidate], card: Card) -> &ScoredCandidate {
        candidates
            .iter()
            .find(|candidate| candidate.card == card)
            .unwrap()
    }

    #[test]
    fn high_spades_are_favored_while_the_queen_is_live() {
        let ace = c(Rank::Ace, Suit::Spades);
        let hand = vec![ace, c(Rank::Ace, Suit::Diamonds)];
        assert_eq!(best_lead(hand, true, false, 3), ace);

        let candidates = scored_after_club_void(vec![ace, c(Rank::Jack, Suit::Spades)], None);
        let scored = find(&candidates, ace);
        assert!(scored.reasons.contains(&Rationale::SpadeAboveLiveQueen));
        let params = StrategyParams::default();
        assert!(params.lead.high_spade_queen_live > 0.0);
    }

    #[test]
    fn high_spades_lose_the_bonus_once_the_queen_is_held() {
        let hand = vec![c(Rank::King, Suit::Spades), Card::QUEEN_OF_SPADES];
        let candidates = scored_after_club_void(hand, None);
        let king = find(&candidates, c(Rank::King, Suit::Spades));
        assert!(!king.reasons.contains(&Rationale::SpadeAboveLiveQueen));
    }

    #[test]
    fn leads_into_a_known_void_until_a_shooter_owns_it() {
        let clubs = c(Rank::Four, Suit::Clubs);
        let diamonds = c(Rank::Four, Suit::Diamonds);

        let candidates = scored_after_club_void(vec![clubs, diamonds], None);
        assert_eq!(candidates[0].card, clubs);
        assert!(candidates[0].reasons.contains(&Rationale::OpponentVoid));

        let candidates = scored_after_club_void(vec![clubs, diamonds], Some(PlayerPosition::West));
        assert_eq!(candidates[0].card, diamonds);
        assert!(
            find(&candidates, clubs)
                .reasons
                .contains(&Rationale::ShooterVoid)
        );
        assert!(
            find(&candidates, diamonds)
                .reasons
                .contains(&Rationale::ShooterPrevention)
        );
    }

    #[test]
    fn shooter_detection_of_this_seat_changes_nothing() {
        let hand = vec![c(Rank::Four, Suit::Clubs), c(Rank::Four, Suit::Diamonds)];
        let plain = scored_after_club_void(hand.clone(), None);
        let own = scored_after_club_void(hand, Some(PlayerPosition::South));
        assert_eq!(plain, own);
    }

    #[test]
    fn low_hearts_count_opponents_who_may_hold_high_hearts() {
        let low = c(Rank::Three, Suit::Hearts);
        let candidates = scored_after_club_void(vec![low, c(Rank::King, Suit::Hearts)], None);
        let scored = find(&candidates, low);
        assert!(scored.reasons.contains(&Rationale::HighCardsOutstanding));
        // -2x3 rank, -1.5x3 heart rank, +4 for each of three possible holders.
        assert!((scored.score - 1.5).abs() < 1e-4);
        let king = find(&candidates, c(Rank::King, Suit::Hearts));
        assert!(!king.reasons.contains(&Rationale::HighCardsOutstanding));
    }
}

use super::{QueenStatus, Rationale, ScoredCandidate, ScoringInputs, Tally};
use crate::analysis;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;

/// Scores discards when the agent cannot follow the lead suit.
pub fn score(inputs: &ScoringInputs<'_>) -> Vec<ScoredCandidate> {
    let winner = analysis::current_winner(inputs.ctx.trick());
    let queen = inputs.queen_status();
    let leader = scoreboard_leader(inputs);
    inputs
        .ctx
        .legal
        .iter()
        .map(|&card| {
            if inputs.attempting {
                score_moon_dump(inputs, card)
            } else {
                score_normal_dump(inputs, card, winner, queen, leader)
            }
        })
        .collect()
}

/// Lowest-scoring opponent, when they lead this agent by enough to be worth targeting.
fn scoreboard_leader(inputs: &ScoringInputs<'_>) -> Option<PlayerPosition> {
    let seat = inputs.ctx.seat;
    let scores = inputs.ctx.scores;
    let leader = seat.others().min_by_key(|&other| scores.score(other))?;
    let margin = scores.score(seat) as f32 - scores.score(leader) as f32;
    (margin >= inputs.modifiers.leader_target_threshold).then_some(leader)
}

fn score_normal_dump(
    inputs: &ScoringInputs<'_>,
    card: Card,
    winner: Option<PlayerPosition>,
    queen: QueenStatus,
    leader: Option<PlayerPosition>,
) -> ScoredCandidate {
    let params = &inputs.params.dump;
    let modifiers = inputs.modifiers;
    let rank = f32::from(card.rank.value());
    let high_card = !card.is_penalty() && card.rank.value() >= params.high_card_min_rank;
    let mut tally = Tally::default();

    let (reason, mut value) = if card.is_queen_of_spades() {
        (Rationale::DumpQueen, params.queen_of_spades)
    } else if card.suit.is_heart() {
        (Rationale::DumpHeart, params.heart_base + rank)
    } else if card.is_spade_above_queen() && queen == QueenStatus::Live {
        (Rationale::DumpHighSpade, params.high_spade_queen_live)
    } else if high_card {
        (
            Rationale::DumpHighCard,
            params.high_card_rank_mult * rank + modifiers.high_card_dump_bonus,
        )
    } else {
        (Rationale::DumpLowCard, rank)
    };

    if let Some(shooter) = inputs.opposing_shooter() {
        if card.is_penalty() {
            let shooter_winning = winner == Some(shooter);
            value = match (card.is_queen_of_spades(), shooter_winning) {
                (true, true) => params.shooter_winning_queen,
                (false, true) => params.shooter_winning_heart,
                (true, false) => params.feed_queen,
                (false, false) => params.feed_heart,
            };
            let defense = if shooter_winning {
                Rationale::ShooterWinning
            } else {
                Rationale::FeedNonShooter
            };
            tally.add(defense, value);
        } else if high_card {
            tally.add(Rationale::RetainHighCard, -params.defense_high_rank_mult * rank);
        } else {
            tally.add(reason, value);
        }
    } else {
        tally.add(reason, value);
        if card.is_penalty()
            && let Some(leader) = leader
        {
            if winner == Some(leader) {
                tally.add(
                    Rationale::FeedLeader,
                    params.leader_bonus * modifiers.leader_targeting,
                );
            } else {
                let mut factor = if card.is_queen_of_spades() {
                    modifiers.leader_targeting
                } else {
                    params.heart_targeting_share * modifiers.leader_targeting
                };
                if inputs.ctx.trick_index() >= params.final_third_trick {
                    factor *= params.final_third_discount;
                }
                value *= factor;
                tally.add(Rationale::WithholdFromNonLeader, -value);
            }
        }
    }

    if card.is_spade_below_queen() {
        let protect = match queen {
            QueenStatus::Gone => params.low_spade_queen_gone,
            QueenStatus::Live | QueenStatus::Held => params.low_spade_queen_live,
        };
        tally.add(Rationale::ProtectLowSpade, protect);
    }

    tally.finish(card)
}

fn score_moon_dump(inputs: &ScoringInputs<'_>, card: Card) -> ScoredCandidate {
    let params = &inputs.params.dump;
    let rank = f32::from(card.rank.value());
    let mut tally = Tally::default();

    if card.is_queen_of_spades() {
        tally.add(Rationale::MoonKeepPenalty, params.moon_queen);
    } else if card.suit.is_heart() {
        tally.add(Rationale::MoonKeepPenalty, params.moon_heart);
    } else if card.rank.value() <= params.moon_low_max_rank {
        tally.add(Rationale::MoonShedLow, params.moon_low_base - rank);
    } else {
        tally.add(Rationale::MoonKeepHigh, -params.moon_high_rank_mult * rank);
    }

    tally.finish(card)
}

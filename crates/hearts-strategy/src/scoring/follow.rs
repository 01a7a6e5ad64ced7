use super::{QueenStatus, Rationale, ScoredCandidate, ScoringInputs, Tally};
use crate::analysis;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerPosition;

/// Scores candidates that follow the lead suit.
///
/// `bluff` is the one random draw made for this decision, if it fired.
pub fn score(inputs: &ScoringInputs<'_>, bluff: Option<f32>) -> Vec<ScoredCandidate> {
    let trick = inputs.ctx.trick();
    let state = TrickView {
        points: analysis::trick_points(trick),
        winner: analysis::current_winner(trick),
        still_to_act: analysis::seats_after_actor(trick),
        last_to_act: analysis::is_last_to_act(trick),
    };
    inputs
        .ctx
        .legal
        .iter()
        .map(|&card| {
            if inputs.attempting {
                score_moon_follow(inputs, &state, card)
            } else {
                score_normal_follow(inputs, &state, card, bluff)
            }
        })
        .collect()
}

struct TrickView {
    points: u8,
    winner: Option<PlayerPosition>,
    still_to_act: Vec<PlayerPosition>,
    last_to_act: bool,
}

fn score_normal_follow(
    inputs: &ScoringInputs<'_>,
    view: &TrickView,
    card: Card,
    bluff: Option<f32>,
) -> ScoredCandidate {
    let params = &inputs.params.follow;
    let modifiers = inputs.modifiers;
    let ctx = inputs.ctx;
    let rank = f32::from(card.rank.value());
    let points = f32::from(view.points + card.penalty_value());
    let first_trick = ctx.is_first_trick();
    let mut tally = Tally::default();

    if !analysis::would_win(ctx.trick(), card) {
        tally.add(Rationale::Duck, params.duck_base * modifiers.duck_preference);
        let rank_term = params.duck_rank_mult * rank;
        if inputs.opposing_shooter().is_some() {
            tally.add(Rationale::Duck, -rank_term);
        } else {
            tally.add(Rationale::Duck, rank_term);
        }
        return tally.finish(card);
    }

    if card.is_queen_of_spades() && !first_trick {
        tally.add(Rationale::QueenWin, params.queen_win_penalty);
        return tally.finish(card);
    }

    if first_trick {
        tally.add(Rationale::FirstTrickWin, params.first_trick_base + rank);
        return tally.finish(card);
    }

    let risky = card.is_spade_above_queen() && inputs.queen_status() == QueenStatus::Live;
    if risky {
        tally.add(
            Rationale::RiskySpade,
            params.risky_spade_penalty * modifiers.risk_tolerance,
        );
    }

    if points > 0.0 {
        let shooter = inputs.opposing_shooter();
        if let Some(shooter) = shooter
            && (view.winner == Some(shooter) || view.still_to_act.contains(&shooter))
        {
            tally.add(Rationale::StopShooter, params.stop_shooter_base + params.per_point * points);
        } else if shooter.is_some() {
            tally.add(Rationale::LetWinnerTake, params.let_winner_bonus);
        } else {
            tally.add(
                Rationale::AvoidPoints,
                -(params.avoid_points_base + params.avoid_points_per_point * points),
            );
            if !analysis::has_lower_in_suit(ctx.legal, card) {
                tally.add(Rationale::ForcedWin, params.forced_win_rank_mult * rank);
            }
        }
        return tally.finish(card);
    }

    if view.last_to_act {
        tally.add(
            Rationale::SafeLastWin,
            params.last_safe_base + params.last_safe_rank_mult * rank,
        );
        if let Some(bonus) = bluff
            && !risky
            && ctx.trick_index() <= params.bluff_last_trick
        {
            tally.add(Rationale::Bluff, bonus);
        }
        return tally.finish(card);
    }

    let lead_suit = ctx.lead_suit();
    let void_behind = lead_suit.is_some_and(|suit| {
        view.still_to_act
            .iter()
            .any(|&seat| inputs.opponent_void(seat, suit))
    });
    if void_behind {
        tally.add(Rationale::VoidBehind, params.void_behind_penalty);
    } else {
        let mut penalty = -(params.risk_base + rank) * modifiers.risk_tolerance;
        if inputs.memory.is_some_and(|memory| memory.is_reliable()) {
            penalty *= params.reliable_risk_factor;
        }
        tally.add(Rationale::RiskyWin, penalty);
    }

    tally.finish(card)
}

fn score_moon_follow(inputs: &ScoringInputs<'_>, view: &TrickView, card: Card) -> ScoredCandidate {
    let params = &inputs.params.follow;
    let rank = f32::from(card.rank.value());
    let points = f32::from(view.points + card.penalty_value());
    let mut tally = Tally::default();

    if analysis::would_win(inputs.ctx.trick(), card) {
        tally.add(
            Rationale::MoonWin,
            params.moon_win_base + params.moon_win_per_point * points
                - params.moon_win_rank_mult * rank,
        );
    } else {
        tally.add(Rationale::MoonLose, -params.moon_lose_rank_mult * rank);
        if points > 0.0 {
            tally.add(Rationale::MoonLostPoints, params.moon_lose_points_penalty);
        }
    }

    tally.finish(card)
}

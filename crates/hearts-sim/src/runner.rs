use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hearts_core::game::match_state::MatchState;
use hearts_core::model::card::Card;
use hearts_core::model::passing::PassingError;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::round::{PlayError, PlayOutcome, RoundPhase};
use hearts_strategy::{AgentSession, DecisionError, PassContext, PlayContext};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SimConfig};

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Plays seeded self-play matches and streams one JSONL row per match.
pub struct SimulationRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub moons_shot: usize,
    /// Wins per agent, in seating order.
    pub wins: Vec<(String, usize)>,
    pub jsonl_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
struct GameLogRow {
    run_id: String,
    game_index: usize,
    game_seed: u64,
    agents: Vec<String>,
    final_scores: [u32; 4],
    rounds: u32,
    moons_shot: Vec<MoonRecord>,
    winner: String,
}

#[derive(Debug, Clone, Serialize)]
struct MoonRecord {
    round: u32,
    agent: String,
}

struct GameOutcome {
    final_scores: [u32; 4],
    rounds: u32,
    moons: Vec<(u32, PlayerPosition)>,
    winner: PlayerPosition,
}

impl SimulationRunner {
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute every configured game, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let names: Vec<String> = self
            .config
            .agents
            .iter()
            .map(|agent| agent.name.clone())
            .collect();

        let mut wins = vec![0usize; names.len()];
        let mut moons_shot = 0usize;
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let outcome = self.play_game(game_seed)?;

            wins[outcome.winner.index()] += 1;
            moons_shot += outcome.moons.len();

            let row = GameLogRow {
                run_id: self.config.run_id.clone(),
                game_index,
                game_seed,
                agents: names.clone(),
                final_scores: outcome.final_scores,
                rounds: outcome.rounds,
                moons_shot: outcome
                    .moons
                    .iter()
                    .map(|&(round, seat)| MoonRecord {
                        round,
                        agent: names[seat.index()].clone(),
                    })
                    .collect(),
                winner: names[outcome.winner.index()].clone(),
            };
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;

            event!(
                Level::INFO,
                run_id = %self.config.run_id,
                game_index,
                game_seed,
                rounds = outcome.rounds,
                scores = ?outcome.final_scores,
                winner = %row.winner,
                "game complete"
            );
        }

        writer.flush()?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            moons_shot,
            wins: names.into_iter().zip(wins).collect(),
            jsonl_path: self.outputs.jsonl.clone(),
        })
    }

    fn play_game(&self, game_seed: u64) -> Result<GameOutcome, RunnerError> {
        let mut match_state = MatchState::with_seed(PlayerPosition::North, game_seed);
        let mut sessions: Vec<AgentSession> = PlayerPosition::LOOP
            .iter()
            .zip(&self.config.agents)
            .map(|(&seat, agent)| {
                let offset = agent.seed.unwrap_or(seat.index() as u64 + 1);
                let seed = game_seed ^ offset.wrapping_mul(SEED_MIX);
                AgentSession::with_seed(seat, agent.params.clone(), seed)
            })
            .collect();

        let mut moons = Vec::new();
        loop {
            let round_number = match_state.round_number();
            play_round(&mut match_state, &mut sessions)?;
            if let Some(shooter) = match_state.finish_round_and_start_next() {
                event!(
                    target: "hearts_sim::moon",
                    Level::INFO,
                    round = round_number,
                    shooter = %shooter,
                    "moon shot"
                );
                moons.push((round_number, shooter));
            }
            if match_state.is_match_over(self.config.games.target_score) {
                break;
            }
        }

        let final_scores = *match_state.scores().standings();
        Ok(GameOutcome {
            final_scores,
            rounds: match_state.round_number() - 1,
            moons,
            winner: lowest_score(&final_scores),
        })
    }
}

/// One round through the lifecycle: start, pass, play with per-trick callbacks.
fn play_round(
    match_state: &mut MatchState,
    sessions: &mut [AgentSession],
) -> Result<(), RunnerError> {
    for session in sessions.iter_mut() {
        session.on_round_start();
    }

    if matches!(match_state.round().phase(), RoundPhase::Passing(_)) {
        let mut passes = Vec::with_capacity(sessions.len());
        for session in sessions.iter_mut() {
            let seat = session.seat();
            let ctx = PassContext::new(seat, match_state.round(), match_state.scores());
            let cards = session
                .choose_cards_to_pass(&ctx)
                .map_err(|source| RunnerError::Decision { seat, source })?;
            passes.push((seat, cards));
        }
        let round = match_state.round_mut();
        for (seat, cards) in passes {
            round.submit_pass(seat, cards)?;
        }
        round.resolve_passes()?;
    }

    while !match_state.is_round_ready_for_scoring() {
        let round = match_state.round();
        let seat = round.current_trick().next_to_play();
        let trick_index = round.trick_index();
        let legal = round.legal_cards(seat);
        let session = &mut sessions[seat.index()];
        let card = {
            let ctx = PlayContext::new(seat, round, match_state.scores(), &legal);
            session
                .choose_card_to_play(&ctx)
                .map_err(|source| RunnerError::Decision { seat, source })?
        };
        if !legal.contains(&card) {
            return Err(RunnerError::IllegalChoice { seat, card });
        }

        let outcome = match_state
            .round_mut()
            .play_card(seat, card)
            .map_err(|source| RunnerError::Play { seat, card, source })?;

        if let PlayOutcome::TrickCompleted { winner, .. } = outcome
            && let Some(trick) = match_state.round().trick_history().last()
        {
            for session in sessions.iter_mut() {
                session.on_trick_complete(trick, winner, trick_index);
            }
        }
    }
    Ok(())
}

/// Lowest total wins; ties go to the earlier seat.
fn lowest_score(scores: &[u32; 4]) -> PlayerPosition {
    PlayerPosition::LOOP
        .iter()
        .copied()
        .min_by_key(|seat| scores[seat.index()])
        .unwrap_or(PlayerPosition::North)
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("{seat} could not decide: {source}")]
    Decision {
        seat: PlayerPosition,
        source: DecisionError,
    },
    #[error("pass rejected: {0}")]
    Pass(#[from] PassingError),
    #[error("{seat} chose {card}, which is not legal")]
    IllegalChoice { seat: PlayerPosition, card: Card },
    #[error("{seat} could not play {card}: {source}")]
    Play {
        seat: PlayerPosition,
        card: Card,
        source: PlayError,
    },
}

#[cfg(test)]
mod tests {
    use super::lowest_score;
    use hearts_core::model::player::PlayerPosition;

    #[test]
    fn lowest_total_wins_and_ties_go_to_the_earlier_seat() {
        assert_eq!(lowest_score(&[40, 12, 100, 60]), PlayerPosition::East);
        assert_eq!(lowest_score(&[30, 30, 101, 30]), PlayerPosition::North);
    }
}

//! Tunable strategy parameters.
//!
//! Every magic number the decision core uses lives in one of these tables so
//! the simulator can override any subset from YAML. Defaults reproduce the
//! reference tuning; none of them are claimed to be optimal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    pub memory: MemoryParams,
    pub aggression: AggressionCurve,
    pub moon: MoonParams,
    pub detector: DetectorParams,
    pub pass: PassParams,
    pub lead: LeadParams,
    pub follow: FollowParams,
    pub dump: DumpParams,
}

/// Opponent memory retention and suspicion weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryParams {
    /// Tricks a remembered play survives before it is pruned (default: 7)
    pub retention_window: usize,
    /// Tricks observed before memory-derived inferences are trusted (default: 2)
    pub reliable_after: usize,
    pub led_queen_weight: u32,
    pub high_card_lead_weight: u32,
    pub hearts_won_weight: u32,
    pub voluntary_win_weight: u32,
    pub missed_dump_weight: u32,
}

impl Default for MemoryParams {
    fn default() -> Self {
        Self {
            retention_window: 7,
            reliable_after: 2,
            led_queen_weight: 50,
            high_card_lead_weight: 5,
            hearts_won_weight: 3,
            voluntary_win_weight: 10,
            missed_dump_weight: 2,
        }
    }
}

/// Linear interpolation endpoints: value at aggressiveness 0.0 and at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub calm: f32,
    pub aggressive: f32,
}

impl Span {
    pub const fn new(calm: f32, aggressive: f32) -> Self {
        Self { calm, aggressive }
    }

    pub fn at(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        self.calm + (self.aggressive - self.calm) * t
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggressionCurve {
    pub base_min: f32,
    pub base_max: f32,
    /// Aggressiveness gained per point of score deficit against the table mean.
    pub delta_scale: f32,
    pub max_delta: f32,
    pub duck_preference: Span,
    pub risk_tolerance: Span,
    pub bluff_probability: Span,
    pub leader_target_threshold: Span,
    pub leader_targeting: Span,
    pub moon_threshold_shift: Span,
    pub high_card_dump_bonus: Span,
}

impl Default for AggressionCurve {
    fn default() -> Self {
        Self {
            base_min: 0.3,
            base_max: 0.7,
            delta_scale: 0.01,
            max_delta: 0.2,
            duck_preference: Span::new(1.25, 0.75),
            risk_tolerance: Span::new(1.0, 0.5),
            bluff_probability: Span::new(0.08, 0.30),
            leader_target_threshold: Span::new(25.0, 10.0),
            leader_targeting: Span::new(0.0, 0.7),
            moon_threshold_shift: Span::new(10.0, -10.0),
            high_card_dump_bonus: Span::new(0.0, 12.0),
        }
    }
}

/// Hand-strength terms for deciding whether to shoot the moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonParams {
    pub ace_of_hearts: i32,
    pub missing_ace_of_hearts: i32,
    pub queen_of_spades: i32,
    pub ace_king_of_spades: i32,
    pub ace_of_spades: i32,
    pub king_of_spades: i32,
    pub no_spade_control: i32,
    pub ace_bonus: i32,
    pub king_bonus: i32,
    pub queen_bonus: i32,
    pub spread_suits: usize,
    pub spread_bonus: i32,
    pub controlled_suit_len: usize,
    pub controlled_suit_bonus: i32,
    pub very_long_suit_len: usize,
    pub very_long_per_card: i32,
    pub long_hearts_len: usize,
    pub long_hearts_bonus: i32,
    pub short_uncontrolled_penalty: i32,
    pub low_card_max_rank: u8,
    pub low_card_allowance: usize,
    pub low_card_penalty: i32,
    pub attempt_threshold: i32,
    pub pass_keep_penalty: i32,
    pub pass_critical_penalty: i32,
    /// Pass bonus for ranks 2..=5, then 6, 7, 8 and 9.
    pub pass_low_bonus: [i32; 5],
    pub pass_void_bonus: i32,
}

impl Default for MoonParams {
    fn default() -> Self {
        Self {
            ace_of_hearts: 25,
            missing_ace_of_hearts: -30,
            queen_of_spades: 20,
            ace_king_of_spades: 27,
            ace_of_spades: 15,
            king_of_spades: 6,
            no_spade_control: -50,
            ace_bonus: 8,
            king_bonus: 5,
            queen_bonus: 3,
            spread_suits: 3,
            spread_bonus: 10,
            controlled_suit_len: 4,
            controlled_suit_bonus: 10,
            very_long_suit_len: 7,
            very_long_per_card: 5,
            long_hearts_len: 5,
            long_hearts_bonus: 8,
            short_uncontrolled_penalty: -8,
            low_card_max_rank: 5,
            low_card_allowance: 4,
            low_card_penalty: 5,
            attempt_threshold: 75,
            pass_keep_penalty: -100,
            pass_critical_penalty: -1_000,
            pass_low_bonus: [60, 40, 30, 20, 10],
            pass_void_bonus: 15,
        }
    }
}

/// Thresholds for spotting an opponent shooting the moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    pub round_points_threshold: u8,
    pub captured_hearts_with_queen: usize,
    pub captured_hearts_alone: usize,
    pub high_heart_lead_min_points: u8,
    pub monopoly_hearts: usize,
    pub monopoly_hearts_with_queen: usize,
    pub monopoly_hearts_without_queen: usize,
    pub suspicion_flag: u32,
    pub suspicion_with_points: u32,
    pub suspicion_points: u8,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            round_points_threshold: 20,
            captured_hearts_with_queen: 6,
            captured_hearts_alone: 10,
            high_heart_lead_min_points: 3,
            monopoly_hearts: 10,
            monopoly_hearts_with_queen: 5,
            monopoly_hearts_without_queen: 8,
            suspicion_flag: 25,
            suspicion_with_points: 15,
            suspicion_points: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassParams {
    pub queen_of_spades: f32,
    pub long_spades_len: usize,
    pub long_spades_relief: f32,
    pub high_spade: f32,
    pub heart_base: f32,
    pub heart_rank_mult: f32,
    pub high_card_base: f32,
    pub void_base: f32,
    pub void_per_card: f32,
    pub long_suit_len: usize,
    pub long_suit_per_card: f32,
    pub two_of_clubs: f32,
    pub trailing_points_mult: f32,
}

impl Default for PassParams {
    fn default() -> Self {
        Self {
            queen_of_spades: 100.0,
            long_spades_len: 5,
            long_spades_relief: 60.0,
            high_spade: 60.0,
            heart_base: 10.0,
            heart_rank_mult: 3.0,
            high_card_base: 20.0,
            void_base: 25.0,
            void_per_card: 5.0,
            long_suit_len: 4,
            long_suit_per_card: 5.0,
            two_of_clubs: -20.0,
            trailing_points_mult: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadParams {
    pub rank_mult: f32,
    pub queen_of_spades: f32,
    pub unbroken_hearts: f32,
    pub void_hearts_low_max_rank: u8,
    pub void_hearts_low_bonus: f32,
    pub void_hearts_high_min_rank: u8,
    pub void_hearts_high_penalty: f32,
    pub heart_rank_mult: f32,
    pub fish_queen_unseen: f32,
    pub fish_queen_gone: f32,
    pub holding_queen_low_spade: f32,
    pub high_spade_queen_live: f32,
    pub opponent_void_bonus: f32,
    pub high_holder_bonus: f32,
    pub high_holder_max_rank: u8,
    pub shooter_void_penalty: f32,
    pub shooter_prevention_bonus: f32,
    pub moon_rank_mult: f32,
    pub moon_early_last_trick: usize,
    pub moon_mid_last_trick: usize,
    pub moon_minor_suit_bonus: f32,
    pub moon_run_suit_min_high: usize,
    pub moon_run_suit_bonus: f32,
    pub moon_early_heart_penalty: f32,
    pub moon_early_queen_penalty: f32,
    pub moon_early_high_spade_penalty: f32,
    pub moon_mid_heart_rank_mult: f32,
    pub moon_mid_queen_bonus: f32,
    pub moon_late_heart_bonus: f32,
    pub moon_late_queen_bonus: f32,
    pub moon_long_suit_len: usize,
    pub moon_long_suit_bonus: f32,
    pub moon_high_rank_bonus: f32,
}

impl Default for LeadParams {
    fn default() -> Self {
        Self {
            rank_mult: 2.0,
            queen_of_spades: -200.0,
            unbroken_hearts: -500.0,
            void_hearts_low_max_rank: 6,
            void_hearts_low_bonus: 15.0,
            void_hearts_high_min_rank: 10,
            void_hearts_high_penalty: -20.0,
            heart_rank_mult: 1.5,
            fish_queen_unseen: 12.0,
            fish_queen_gone: 6.0,
            holding_queen_low_spade: -15.0,
            high_spade_queen_live: 10.0,
            opponent_void_bonus: 8.0,
            high_holder_bonus: 4.0,
            high_holder_max_rank: 8,
            shooter_void_penalty: -30.0,
            shooter_prevention_bonus: 5.0,
            moon_rank_mult: 2.0,
            moon_early_last_trick: 5,
            moon_mid_last_trick: 9,
            moon_minor_suit_bonus: 20.0,
            moon_run_suit_min_high: 2,
            moon_run_suit_bonus: 15.0,
            moon_early_heart_penalty: -25.0,
            moon_early_queen_penalty: -40.0,
            moon_early_high_spade_penalty: -20.0,
            moon_mid_heart_rank_mult: 2.0,
            moon_mid_queen_bonus: 5.0,
            moon_late_heart_bonus: 30.0,
            moon_late_queen_bonus: 40.0,
            moon_long_suit_len: 4,
            moon_long_suit_bonus: 8.0,
            moon_high_rank_bonus: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowParams {
    pub queen_win_penalty: f32,
    pub risky_spade_penalty: f32,
    pub first_trick_base: f32,
    pub per_point: f32,
    pub stop_shooter_base: f32,
    pub let_winner_bonus: f32,
    pub avoid_points_base: f32,
    pub avoid_points_per_point: f32,
    pub forced_win_rank_mult: f32,
    pub last_safe_base: f32,
    pub last_safe_rank_mult: f32,
    pub void_behind_penalty: f32,
    pub risk_base: f32,
    pub reliable_risk_factor: f32,
    pub duck_base: f32,
    pub duck_rank_mult: f32,
    pub bluff_max_bonus: f32,
    pub bluff_last_trick: usize,
    pub moon_win_base: f32,
    pub moon_win_per_point: f32,
    pub moon_win_rank_mult: f32,
    pub moon_lose_rank_mult: f32,
    pub moon_lose_points_penalty: f32,
}

impl Default for FollowParams {
    fn default() -> Self {
        Self {
            queen_win_penalty: -1_000.0,
            risky_spade_penalty: -25.0,
            first_trick_base: 10.0,
            per_point: 5.0,
            stop_shooter_base: 150.0,
            let_winner_bonus: 5.0,
            avoid_points_base: 30.0,
            avoid_points_per_point: 8.0,
            forced_win_rank_mult: 2.0,
            last_safe_base: 15.0,
            last_safe_rank_mult: 1.5,
            void_behind_penalty: -80.0,
            risk_base: 15.0,
            reliable_risk_factor: 0.5,
            duck_base: 20.0,
            duck_rank_mult: 1.5,
            bluff_max_bonus: 25.0,
            bluff_last_trick: 9,
            moon_win_base: 40.0,
            moon_win_per_point: 6.0,
            moon_win_rank_mult: 0.5,
            moon_lose_rank_mult: 2.0,
            moon_lose_points_penalty: -30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpParams {
    pub queen_of_spades: f32,
    pub heart_base: f32,
    pub high_spade_queen_live: f32,
    pub high_card_min_rank: u8,
    pub high_card_rank_mult: f32,
    pub shooter_winning_queen: f32,
    pub shooter_winning_heart: f32,
    pub feed_queen: f32,
    pub feed_heart: f32,
    pub defense_high_rank_mult: f32,
    pub leader_bonus: f32,
    pub heart_targeting_share: f32,
    pub final_third_trick: usize,
    pub final_third_discount: f32,
    pub low_spade_queen_live: f32,
    pub low_spade_queen_gone: f32,
    pub moon_queen: f32,
    pub moon_heart: f32,
    pub moon_low_max_rank: u8,
    pub moon_low_base: f32,
    pub moon_high_rank_mult: f32,
}

impl Default for DumpParams {
    fn default() -> Self {
        Self {
            queen_of_spades: 60.0,
            heart_base: 20.0,
            high_spade_queen_live: 25.0,
            high_card_min_rank: 10,
            high_card_rank_mult: 1.5,
            shooter_winning_queen: -200.0,
            shooter_winning_heart: -80.0,
            feed_queen: 150.0,
            feed_heart: 60.0,
            defense_high_rank_mult: 0.5,
            leader_bonus: 30.0,
            heart_targeting_share: 0.3,
            final_third_trick: 9,
            final_third_discount: 0.5,
            low_spade_queen_live: -15.0,
            low_spade_queen_gone: -3.0,
            moon_queen: -150.0,
            moon_heart: -100.0,
            moon_low_max_rank: 6,
            moon_low_base: 15.0,
            moon_high_rank_mult: 0.8,
        }
    }
}

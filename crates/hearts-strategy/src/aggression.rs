//! Personality plus score-standing aggressiveness.

use crate::params::AggressionCurve;
use hearts_core::model::player::PlayerPosition;
use hearts_core::model::score::ScoreBoard;
use rand::Rng;

/// One draw per game; the result stays fixed for the session.
pub fn generate_base<R: Rng + ?Sized>(curve: &AggressionCurve, rng: &mut R) -> f32 {
    let (low, high) = if curve.base_min <= curve.base_max {
        (curve.base_min, curve.base_max)
    } else {
        (curve.base_max, curve.base_min)
    };
    if (high - low).abs() < f32::EPSILON {
        return low.clamp(0.0, 1.0);
    }
    rng.gen_range(low..=high).clamp(0.0, 1.0)
}

/// Higher cumulative score is worse, so trailing the table raises aggression.
pub fn effective(
    curve: &AggressionCurve,
    base: f32,
    scores: &ScoreBoard,
    seat: PlayerPosition,
) -> f32 {
    let own = scores.score(seat) as f32;
    let opponents: f32 = seat.others().map(|other| scores.score(other) as f32).sum();
    let mean = opponents / 3.0;
    let limit = curve.max_delta.abs();
    let delta = (curve.delta_scale * (own - mean)).clamp(-limit, limit);
    (base + delta).clamp(0.0, 1.0)
}

/// Scoring knobs derived from one effective aggressiveness value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggressionModifiers {
    pub effective: f32,
    pub duck_preference: f32,
    /// Multiplies penalties on risky wins; lower means risk is discounted.
    pub risk_tolerance: f32,
    pub bluff_probability: f32,
    pub leader_target_threshold: f32,
    pub leader_targeting: f32,
    pub moon_threshold_shift: i32,
    pub high_card_dump_bonus: f32,
}

impl AggressionModifiers {
    pub fn from_effective(curve: &AggressionCurve, effective: f32) -> Self {
        let e = effective.clamp(0.0, 1.0);
        Self {
            effective: e,
            duck_preference: curve.duck_preference.at(e),
            risk_tolerance: curve.risk_tolerance.at(e),
            bluff_probability: curve.bluff_probability.at(e).clamp(0.0, 1.0),
            leader_target_threshold: curve.leader_target_threshold.at(e),
            leader_targeting: curve.leader_targeting.at(e).clamp(0.0, 1.0),
            moon_threshold_shift: curve.moon_threshold_shift.at(e).round() as i32,
            high_card_dump_bonus: curve.high_card_dump_bonus.at(e),
        }
    }
}

pub mod detector;
pub mod evaluator;

pub use detector::detect;
pub use evaluator::{MISSING_ACE_OF_HEARTS, MoonEvaluation, MoonReason, evaluate, score_for_passing};

/// Whether this agent is trying to take every penalty point this round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoonState {
    #[default]
    Normal,
    Attempting {
        confidence: u8,
    },
}

impl MoonState {
    pub fn is_attempting(self) -> bool {
        matches!(self, MoonState::Attempting { .. })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoonState::Normal => "normal",
            MoonState::Attempting { .. } => "attempting",
        }
    }
}

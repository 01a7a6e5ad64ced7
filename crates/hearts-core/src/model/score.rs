use crate::model::player::PlayerPosition;

/// Full-moon payout: the shooter scores nothing, every other seat takes this.
pub const MOON_POINTS: u8 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    totals: [u32; 4],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 4] }
    }

    pub const fn from_totals(totals: [u32; 4]) -> Self {
        Self { totals }
    }

    pub fn add_penalty(&mut self, seat: PlayerPosition, points: u32) {
        self.totals[seat.index()] += points;
    }

    pub fn set_score(&mut self, seat: PlayerPosition, points: u32) {
        self.totals[seat.index()] = points;
    }

    pub fn score(&self, seat: PlayerPosition) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 4] {
        &self.totals
    }

    /// Lowest cumulative score is the best standing.
    pub fn leading_player(&self) -> PlayerPosition {
        PlayerPosition::LOOP
            .iter()
            .copied()
            .min_by_key(|seat| self.score(*seat))
            .unwrap_or(PlayerPosition::North)
    }

    pub fn max_score(&self) -> u32 {
        self.totals.iter().copied().max().unwrap_or(0)
    }

    /// Applies one round of penalties, returning the shooter when someone took all 26.
    pub fn apply_hand(&mut self, penalties: [u8; 4]) -> Option<PlayerPosition> {
        let shooter = PlayerPosition::LOOP
            .iter()
            .copied()
            .find(|seat| penalties[seat.index()] == MOON_POINTS);

        match shooter {
            Some(shooter) => {
                for seat in shooter.others() {
                    self.add_penalty(seat, MOON_POINTS as u32);
                }
            }
            None => {
                for seat in PlayerPosition::LOOP {
                    self.add_penalty(seat, penalties[seat.index()] as u32);
                }
            }
        }
        shooter
    }
}

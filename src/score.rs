//! Running score, bonus multipliers, and high score.

use log::info;
use serde::{Deserialize, Serialize};

/// Score state for one board.
///
/// `high_score` survives resets; everything else starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    pub rotation_count: u64,
    pub high_score: u64,
    pub island_multiplier: u64,
    pub edge_multiplier: u64,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::with_high_score(0)
    }
}

impl ScoreState {
    pub fn with_high_score(high_score: u64) -> Self {
        Self {
            rotation_count: 0,
            high_score,
            island_multiplier: 1,
            edge_multiplier: 1,
        }
    }

    /// Score one round of `rotated` cells under the given multipliers.
    ///
    /// `rotation_count = (rotation_count + rotated) * island * edge`, and the
    /// high score follows. Returns true if the high score moved.
    pub fn apply_round(&mut self, rotated: usize, island_multiplier: u64, edge_multiplier: u64) -> bool {
        self.island_multiplier = island_multiplier.max(1);
        self.edge_multiplier = edge_multiplier.max(1);

        self.rotation_count = self
            .rotation_count
            .saturating_add(rotated as u64)
            .saturating_mul(self.island_multiplier)
            .saturating_mul(self.edge_multiplier);

        if self.rotation_count > self.high_score {
            info!("new high score {}", self.rotation_count);
            self.high_score = self.rotation_count;
            true
        } else {
            false
        }
    }

    /// Drop both multipliers back to 1 once a bonus has been shown.
    pub fn clear_bonus(&mut self) {
        self.island_multiplier = 1;
        self.edge_multiplier = 1;
    }

    /// Zero the running score but keep the multipliers.
    pub fn reset_score(&mut self) {
        self.rotation_count = 0;
    }

    /// New game: running score and multipliers start over.
    pub fn reset(&mut self) {
        self.rotation_count = 0;
        self.clear_bonus();
    }
}

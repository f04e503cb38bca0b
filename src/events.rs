//! Feedback events for sound and effects collaborators.

use serde::Serialize;

use crate::rng::WasmRng;

/// Spacing between staggered rotation sound cues.
const CUE_SPACING_MS: f64 = 60.0;
/// Random jitter added to each cue.
const CUE_JITTER_MS: f64 = 40.0;

/// Something the player should see or hear about.
///
/// Consumers may ignore or throttle any of these; no game logic depends on
/// them being handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// A round rotated `count` tiles.
    RotationsOccurred { count: usize },
    /// A round formed more than one qualifying island.
    IslandBonusTriggered { islands: usize },
    /// A round connected two opposite edges with a run of `length` tiles.
    EdgeBonusTriggered { length: usize },
    /// The board was re-randomized.
    BoardReset,
    #[serde(rename_all = "camelCase")]
    HighScoreChanged { high_score: u64 },
}

/// Start offsets (ms) for the rotation sound cues of one round.
///
/// One cue per rotated tile, capped at one less than the number of sound
/// voices but never fewer than one. Cue `i` starts at `60·i` ms plus up to
/// 40 ms of jitter so simultaneous rotations do not sound like one click.
pub fn rotation_cues(count: usize, voices: usize, rng: &mut WasmRng) -> Vec<f64> {
    let cues = count.min(voices.saturating_sub(1)).max(1);
    (0..cues)
        .map(|i| CUE_SPACING_MS * i as f64 + rng.gen_f64(CUE_JITTER_MS))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_count_capped_by_voices() {
        let mut rng = WasmRng::from_seed(1);
        assert_eq!(rotation_cues(10, 5, &mut rng).len(), 4);
        assert_eq!(rotation_cues(2, 5, &mut rng).len(), 2);
        assert_eq!(rotation_cues(0, 5, &mut rng).len(), 1);
        assert_eq!(rotation_cues(10, 1, &mut rng).len(), 1);
    }

    #[test]
    fn test_cues_are_staggered() {
        let mut rng = WasmRng::from_seed(5);
        let cues = rotation_cues(4, 5, &mut rng);
        for (i, &cue) in cues.iter().enumerate() {
            let base = 60.0 * i as f64;
            assert!(cue >= base && cue < base + 40.0, "cue {} at {}", i, cue);
        }
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&GameEvent::HighScoreChanged { high_score: 12 }).unwrap();
        assert_eq!(json, r#"{"type":"highScoreChanged","highScore":12}"#);
        let json = serde_json::to_string(&GameEvent::BoardReset).unwrap();
        assert_eq!(json, r#"{"type":"boardReset"}"#);
    }
}

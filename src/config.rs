//! Game configuration.
//!
//! Board dimensions are fixed once a game is created. Everything else tunes
//! the pacing and the bonus rules. All fields have defaults, so an empty JSON
//! object is a valid configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::islands::DEFAULT_MIN_ISLAND_SIZE;

/// Largest supported board side. Cell keys pack each axis into 16 bits.
pub const MAX_BOARD_SIDE: usize = 256;

pub const DEFAULT_STORAGE_KEY: &str = "pipe-game-storage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Pause after an ordinary round.
    pub round_delay_ms: u32,
    /// Pause after a round that earned an island bonus.
    pub island_delay_ms: u32,
    /// Pause after a round that connected two opposite edges.
    pub edge_delay_ms: u32,
    pub min_island_size: usize,
    pub edge_multiplier: u64,
    /// Number of overlapping rotation sound players on the client.
    pub sound_voices: usize,
    pub storage_key: String,
    /// Fixed RNG seed for reproducible boards; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            round_delay_ms: 800,
            island_delay_ms: 2000,
            edge_delay_ms: 5000,
            min_island_size: DEFAULT_MIN_ISLAND_SIZE,
            edge_multiplier: 10,
            sound_voices: 5,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Failed to parse game config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("Board must be at least 1x1, got {}x{}", self.width, self.height);
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            bail!(
                "Board {}x{} exceeds the {} cell limit per side",
                self.width,
                self.height,
                MAX_BOARD_SIDE
            );
        }
        if self.min_island_size == 0 {
            bail!("minIslandSize must be at least 1");
        }
        if self.edge_multiplier == 0 {
            bail!("edgeMultiplier must be at least 1");
        }
        Ok(())
    }

    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_ms as u64)
    }

    pub fn island_delay(&self) -> Duration {
        Duration::from_millis(self.island_delay_ms as u64)
    }

    pub fn edge_delay(&self) -> Duration {
        Duration::from_millis(self.edge_delay_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.round_delay(), Duration::from_millis(800));
        assert_eq!(config.island_delay(), Duration::from_millis(2000));
        assert_eq!(config.edge_delay(), Duration::from_millis(5000));
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = GameConfig::from_json(r#"{"width": 12, "roundDelayMs": 100, "seed": 9}"#).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 8);
        assert_eq!(config.round_delay_ms, 100);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_rejects_empty_board() {
        let err = GameConfig::from_json(r#"{"width": 0}"#).unwrap_err();
        assert!(err.to_string().contains("at least 1x1"));
    }

    #[test]
    fn test_rejects_oversized_board() {
        assert!(GameConfig::with_size(300, 4).validate().is_err());
        assert!(GameConfig::with_size(256, 256).validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GameConfig::from_json("{width:").unwrap_err();
        assert!(err.to_string().contains("Failed to parse game config"));
    }
}

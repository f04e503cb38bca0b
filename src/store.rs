//! High-score persistence.
//!
//! Only the high score outlives a session. It is stored as a small JSON
//! envelope, `{"state":{"highScore":N},"version":0}`, the same shape the web
//! client's state store writes, so an existing browser save keeps working.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Envelope version written by this crate.
pub const STORE_VERSION: u32 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    high_score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedEnvelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// Serialize a high score into the persisted envelope.
pub fn encode_high_score(high_score: u64) -> Result<String> {
    let envelope = PersistedEnvelope {
        state: PersistedState { high_score },
        version: STORE_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Read a high score back out of the persisted envelope.
pub fn decode_high_score(raw: &str) -> Result<u64> {
    let envelope: PersistedEnvelope =
        serde_json::from_str(raw).context("Failed to parse stored high score")?;
    if envelope.version != STORE_VERSION {
        bail!(
            "Stored high score has version {}, expected {}",
            envelope.version,
            STORE_VERSION
        );
    }
    Ok(envelope.state.high_score)
}

/// Key-value storage for the high score.
pub trait HighScoreStore {
    /// The stored high score, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<u64>>;

    fn save(&mut self, high_score: u64) -> Result<()>;
}

/// Keeps the high score in memory only. Used when no durable store is
/// available or the durable one has failed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u64) -> Result<()> {
        self.value = Some(high_score);
        Ok(())
    }
}

/// Stores the envelope as a JSON file (native builds and tooling).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u64>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let score = decode_high_score(&text)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(score))
    }

    fn save(&mut self, high_score: u64) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = encode_high_score(high_score)?;
        fs::write(&self.path, text).with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Browser `localStorage` under a fixed key.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage> {
        let Some(window) = web_sys::window() else {
            bail!("No window available");
        };
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => bail!("localStorage unavailable"),
            Err(err) => bail!("localStorage access denied: {:?}", err),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<u64>> {
        let storage = Self::storage()?;
        let raw = match storage.get_item(&self.key) {
            Ok(raw) => raw,
            Err(err) => bail!("Failed to read {}: {:?}", self.key, err),
        };
        match raw {
            Some(raw) if !raw.is_empty() => Ok(Some(decode_high_score(&raw)?)),
            _ => Ok(None),
        }
    }

    fn save(&mut self, high_score: u64) -> Result<()> {
        let storage = Self::storage()?;
        let raw = encode_high_score(high_score)?;
        if let Err(err) = storage.set_item(&self.key, &raw) {
            bail!("Failed to write {}: {:?}", self.key, err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pipe-cascade-store-{}-{}", std::process::id(), name))
            .join("score.json")
    }

    #[test]
    fn test_envelope_matches_web_client_shape() {
        let raw = encode_high_score(42).unwrap();
        assert_eq!(raw, r#"{"state":{"highScore":42},"version":0}"#);
    }

    #[test]
    fn test_decode_accepts_web_client_save() {
        assert_eq!(decode_high_score(r#"{"state":{"highScore":1234},"version":0}"#).unwrap(), 1234);
        assert_eq!(decode_high_score(r#"{"state":{}}"#).unwrap(), 0);
    }

    #[test]
    fn test_decode_rejects_garbage_and_unknown_versions() {
        assert!(decode_high_score("not json").is_err());
        assert!(decode_high_score(r#"{"state":{"highScore":1},"version":3}"#).is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save(9).unwrap();
        assert_eq!(store.load().unwrap(), Some(9));
    }

    #[test]
    fn test_json_file_store_roundtrip() {
        let path = temp_path("roundtrip");
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), None);

        store.save(77).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), Some(77));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_json_file_store_reports_corrupt_file() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}

//! WebAssembly chain-reaction engine for the Pipe Cascade rotation puzzle.
//!
//! Exports a `PipeGame` class callable from JavaScript via wasm-bindgen. The
//! JS side owns rendering, animation and audio; it feeds clicks and frame
//! time in and reads back a per-cell snapshot plus feedback events.
//! Grid data is column-major: `cells[x * height + y]`.

pub mod board;
pub mod config;
pub mod connectivity;
pub mod events;
pub mod game;
pub mod islands;
pub mod propagation;
pub mod rng;
pub mod score;
pub mod span;
pub mod store;
pub mod types;

pub use config::GameConfig;
pub use game::{BoardSnapshot, CellView, ChainPhase, PipeGame};
pub use types::{Cell, Grid, Orientation};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use std::time::Duration;

    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use crate::config::GameConfig;
    use crate::game::PipeGame;
    use crate::store::LocalStorageStore;

    // ─── Logging ────────────────────────────────────────────────────────────

    /// Routes `log` records to the browser console.
    struct ConsoleLogger;

    impl log::Log for ConsoleLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &log::Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&msg),
                log::Level::Warn => web_sys::console::warn_1(&msg),
                log::Level::Info => web_sys::console::info_1(&msg),
                _ => web_sys::console::debug_1(&msg),
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: ConsoleLogger = ConsoleLogger;

    /// Install the console logger. Safe to call more than once; only the
    /// level changes after the first call.
    #[wasm_bindgen(js_name = "initLogging")]
    pub fn wasm_init_logging(verbose: bool) {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        });
    }

    fn to_js_error(err: anyhow::Error) -> JsValue {
        JsValue::from_str(&format!("{:#}", err))
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
        value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(JsValue::from)
    }

    fn millis(ms: f64) -> Duration {
        if ms.is_finite() && ms > 0.0 {
            Duration::from_secs_f64(ms / 1000.0)
        } else {
            Duration::ZERO
        }
    }

    // ─── Game ───────────────────────────────────────────────────────────────

    /// JS handle to a running game. The high score lives in `localStorage`.
    #[wasm_bindgen(js_name = "PipeGame")]
    pub struct WasmPipeGame {
        inner: PipeGame,
    }

    #[wasm_bindgen(js_class = "PipeGame")]
    impl WasmPipeGame {
        /// Create a game from an optional config object (see `GameConfig`).
        #[wasm_bindgen(constructor)]
        pub fn new(config: JsValue) -> Result<WasmPipeGame, JsValue> {
            let config: GameConfig = if config.is_undefined() || config.is_null() {
                GameConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config)?
            };
            let store = Box::new(LocalStorageStore::new(config.storage_key.clone()));
            let inner = PipeGame::new(config, store).map_err(to_js_error)?;
            Ok(Self { inner })
        }

        pub fn click(&mut self, x: u32, y: u32) -> bool {
            self.inner.click(x as usize, y as usize)
        }

        /// Advance by `dt_ms` milliseconds. Returns true if the board changed.
        pub fn tick(&mut self, dt_ms: f64) -> bool {
            self.inner.tick(millis(dt_ms))
        }

        pub fn reset(&mut self) -> bool {
            self.inner.reset()
        }

        #[wasm_bindgen(js_name = "resetScore")]
        pub fn reset_score(&mut self) {
            self.inner.reset_score();
        }

        #[wasm_bindgen(js_name = "setHoveredCell")]
        pub fn set_hovered_cell(&mut self, x: u32, y: u32) {
            self.inner.set_hovered_cell(Some((x as usize, y as usize)));
        }

        #[wasm_bindgen(js_name = "clearHoveredCell")]
        pub fn clear_hovered_cell(&mut self) {
            self.inner.set_hovered_cell(None);
        }

        #[wasm_bindgen(getter, js_name = "isRotating")]
        pub fn is_rotating(&self) -> bool {
            self.inner.is_rotating()
        }

        #[wasm_bindgen(getter, js_name = "rotationCount")]
        pub fn rotation_count(&self) -> f64 {
            self.inner.score().rotation_count as f64
        }

        #[wasm_bindgen(getter, js_name = "highScore")]
        pub fn high_score(&self) -> f64 {
            self.inner.score().high_score as f64
        }

        /// Milliseconds until the pending round, or `undefined` when idle.
        #[wasm_bindgen(js_name = "nextRoundIn")]
        pub fn next_round_in(&self) -> Option<f64> {
            self.inner
                .next_round_in()
                .map(|d| d.as_secs_f64() * 1000.0)
        }

        /// Full per-cell snapshot as a plain JS object.
        pub fn snapshot(&self) -> Result<JsValue, JsValue> {
            to_js(&self.inner.snapshot())
        }

        /// Raw rotation counters, column-major.
        pub fn rotations(&self) -> js_sys::Uint32Array {
            let cells = &self.inner.grid().cells;
            let arr = js_sys::Uint32Array::new_with_length(cells.len() as u32);
            arr.copy_from(cells);
            arr
        }

        /// Events since the last call, as an array of `{ type, ... }` objects.
        #[wasm_bindgen(js_name = "drainEvents")]
        pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
            to_js(&self.inner.drain_events())
        }

        /// Start offsets (ms) for the staggered rotation sounds of a round.
        #[wasm_bindgen(js_name = "rotationCues")]
        pub fn rotation_cues(&mut self, count: u32) -> Vec<f64> {
            self.inner.rotation_cues(count as usize)
        }
    }

    /// Lets the page check that the engine module loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "Pipe engine ready".to_string()
    }
}

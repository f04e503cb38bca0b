//! The game controller: board, chain state machine, scoring, and feedback.
//!
//! `PipeGame` owns every piece of mutable state. Callers drive it with
//! commands (`click`, `reset`) and advance time explicitly with `tick`, so
//! the chain can run against a browser animation loop or synchronously in
//! tests through `run_until_idle`.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;

use crate::board::random_grid;
use crate::config::GameConfig;
use crate::events::{rotation_cues, GameEvent};
use crate::islands::{island_bonus, island_lookup, qualifying_islands};
use crate::propagation::{round_limit, run_round};
use crate::rng::WasmRng;
use crate::score::ScoreState;
use crate::span::{find_edge_span_through, EdgeSpan};
use crate::store::{HighScoreStore, MemoryStore};
use crate::types::{cell_key, Cell, CellSet, Grid};

/// Number of distinct island highlight colors on the client.
pub const ISLAND_PALETTE_SIZE: usize = 10;

/// Where the cascade stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainPhase {
    /// Waiting for a click.
    Idle,
    /// A round has been applied; the next one (possibly none) is due after
    /// `remaining`.
    Rotating { next_seeds: Vec<Cell>, remaining: Duration },
}

/// Bonus classification of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundBonus {
    /// Islands of at least the minimum size among the rotated cells.
    pub islands: Vec<Vec<Cell>>,
    pub island_multiplier: u64,
    pub edge_multiplier: u64,
    pub span: Option<EdgeSpan>,
}

impl RoundBonus {
    pub fn is_edge(&self) -> bool {
        self.span.is_some()
    }

    pub fn is_island(&self) -> bool {
        self.island_multiplier > 1
    }
}

/// Classify a round that rotated `rotated`, on the grid after the rotation.
///
/// The span check covers the whole board but only accepts runs passing
/// through a cell rotated this round ([`find_edge_span_through`]), so a run
/// left standing by an earlier round is not paid again. Plain
/// [`crate::span::find_edge_span`] has no such filter and is not used here.
///
/// A span through any rotated cell wins over islands: the island multiplier
/// drops to 1 and the edge multiplier applies instead.
pub fn classify_round(grid: &Grid, rotated: &[Cell], config: &GameConfig) -> RoundBonus {
    let islands = qualifying_islands(rotated, grid.width, grid.height, config.min_island_size);

    match find_edge_span_through(grid, rotated) {
        Some(span) => RoundBonus {
            islands,
            island_multiplier: 1,
            edge_multiplier: config.edge_multiplier.max(1),
            span: Some(span),
        },
        None => RoundBonus {
            island_multiplier: island_bonus(islands.len()),
            islands,
            edge_multiplier: 1,
            span: None,
        },
    }
}

/// Per-cell view handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    /// Raw counter; the renderer uses the full delta to pick spin direction.
    pub rotation: u32,
    pub orientation: u8,
    pub rotating: bool,
    pub island_color: Option<usize>,
    pub edge_span: bool,
    pub hovered: bool,
}

/// Read-only picture of the game after the latest tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    /// Column-major, `cells[x * height + y]`.
    pub cells: Vec<CellView>,
    pub rotating: bool,
    pub rotation_count: u64,
    pub high_score: u64,
    pub island_multiplier: u64,
    pub edge_multiplier: u64,
    pub island_count: usize,
}

impl BoardSnapshot {
    pub fn cell(&self, x: usize, y: usize) -> &CellView {
        &self.cells[x * self.height + y]
    }
}

pub struct PipeGame {
    config: GameConfig,
    grid: Grid,
    score: ScoreState,
    phase: ChainPhase,
    rotating_cells: Vec<Cell>,
    islands: Vec<Vec<Cell>>,
    edge_span: Option<EdgeSpan>,
    hovered: Option<Cell>,
    events: Vec<GameEvent>,
    rng: WasmRng,
    store: Box<dyn HighScoreStore>,
    persist: bool,
    rounds_in_chain: usize,
    max_rounds: usize,
}

impl PipeGame {
    /// Start a game on a random board, reading the high score from `store`.
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Result<Self> {
        config.validate()?;
        let mut rng = WasmRng::from_optional_seed(config.seed);
        let grid = random_grid(config.width, config.height, &mut rng);
        Ok(Self::assemble(config, grid, rng, store))
    }

    /// Start a game on a given board. The board's size replaces the
    /// configured one.
    pub fn with_grid(mut config: GameConfig, grid: Grid, store: Box<dyn HighScoreStore>) -> Result<Self> {
        config.width = grid.width;
        config.height = grid.height;
        config.validate()?;
        let rng = WasmRng::from_optional_seed(config.seed);
        Ok(Self::assemble(config, grid, rng, store))
    }

    /// In-memory game with default settings, mostly for tools and tests.
    pub fn in_memory(config: GameConfig) -> Result<Self> {
        Self::new(config, Box::new(MemoryStore::new()))
    }

    fn assemble(config: GameConfig, grid: Grid, rng: WasmRng, store: Box<dyn HighScoreStore>) -> Self {
        let high_score = match store.load() {
            Ok(stored) => stored.unwrap_or(0),
            Err(err) => {
                warn!("could not load high score, starting from 0: {:#}", err);
                0
            }
        };
        let max_rounds = round_limit(&grid);

        info!(
            "new {}x{} board, high score {}",
            grid.width, grid.height, high_score
        );

        Self {
            config,
            grid,
            score: ScoreState::with_high_score(high_score),
            phase: ChainPhase::Idle,
            rotating_cells: Vec::new(),
            islands: Vec::new(),
            edge_span: None,
            hovered: None,
            events: Vec::new(),
            rng,
            store,
            persist: true,
            rounds_in_chain: 0,
            max_rounds,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn phase(&self) -> &ChainPhase {
        &self.phase
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self.phase, ChainPhase::Rotating { .. })
    }

    /// Cells rotated by the round currently on display.
    pub fn rotating_cells(&self) -> &[Cell] {
        &self.rotating_cells
    }

    /// Qualifying islands of the round currently on display.
    pub fn islands(&self) -> &[Vec<Cell>] {
        &self.islands
    }

    pub fn edge_span(&self) -> Option<&EdgeSpan> {
        self.edge_span.as_ref()
    }

    pub fn hovered_cell(&self) -> Option<Cell> {
        self.hovered
    }

    /// Whether high-score saves still go to the durable store.
    pub fn is_persisting(&self) -> bool {
        self.persist
    }

    /// Time until the pending round fires, if a chain is running.
    pub fn next_round_in(&self) -> Option<Duration> {
        match &self.phase {
            ChainPhase::Idle => None,
            ChainPhase::Rotating { remaining, .. } => Some(*remaining),
        }
    }

    /// Rotate `(x, y)` and start a chain.
    ///
    /// Ignored while a chain is running or when the cell is off the board.
    pub fn click(&mut self, x: usize, y: usize) -> bool {
        if self.is_rotating() {
            debug!("click on ({}, {}) ignored while rotating", x, y);
            return false;
        }
        if !self.grid.in_bounds(x, y) {
            return false;
        }

        self.rounds_in_chain = 0;
        self.play_round(vec![(x, y)]);
        true
    }

    /// Advance time by `dt`. Fires at most one pending round.
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let ChainPhase::Rotating { remaining, .. } = &mut self.phase else {
            return false;
        };
        *remaining = remaining.saturating_sub(dt);
        if !remaining.is_zero() {
            return false;
        }

        let ChainPhase::Rotating { next_seeds, .. } =
            std::mem::replace(&mut self.phase, ChainPhase::Idle)
        else {
            return false;
        };

        if next_seeds.is_empty() {
            self.finish_chain();
        } else {
            self.play_round(next_seeds);
        }
        true
    }

    /// Play out the rest of the chain without waiting. Returns the number
    /// of ticks it took.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ticks = 0;
        while let Some(remaining) = self.next_round_in() {
            self.tick(remaining);
            ticks += 1;
        }
        ticks
    }

    /// Re-randomize the board and start a new game.
    ///
    /// Rejected while a chain is running.
    pub fn reset(&mut self) -> bool {
        if self.is_rotating() {
            debug!("reset ignored while rotating");
            return false;
        }

        self.grid = random_grid(self.config.width, self.config.height, &mut self.rng);
        self.score.reset();
        self.rotating_cells.clear();
        self.islands.clear();
        self.edge_span = None;
        self.events.push(GameEvent::BoardReset);
        info!("board reset");
        true
    }

    /// Zero the running score without touching the board.
    pub fn reset_score(&mut self) {
        self.score.reset_score();
    }

    /// Track the cell under the pointer. Off-board cells clear it.
    pub fn set_hovered_cell(&mut self, cell: Option<Cell>) {
        self.hovered = cell.filter(|&(x, y)| self.grid.in_bounds(x, y));
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sound cue offsets (ms) for a round of `count` rotations.
    pub fn rotation_cues(&mut self, count: usize) -> Vec<f64> {
        rotation_cues(count, self.config.sound_voices, &mut self.rng)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let width = self.grid.width;
        let height = self.grid.height;
        let islands = if self.score.island_multiplier > 1 {
            island_lookup(&self.islands)
        } else {
            Default::default()
        };
        let rotating: CellSet = self.rotating_cells.iter().copied().collect();
        let span: HashSet<u32> = self
            .edge_span
            .iter()
            .flat_map(|s| s.path.iter().map(|&(x, y)| cell_key(x, y)))
            .collect();
        let mut cells = Vec::with_capacity(width * height);

        for x in 0..width {
            for y in 0..height {
                let key = cell_key(x, y);
                cells.push(CellView {
                    x,
                    y,
                    rotation: self.grid.get(x, y),
                    orientation: self.grid.orientation(x, y).index(),
                    rotating: rotating.contains((x, y)),
                    island_color: islands.get(&key).map(|i| i % ISLAND_PALETTE_SIZE),
                    edge_span: span.contains(&key),
                    hovered: self.hovered == Some((x, y)),
                });
            }
        }

        BoardSnapshot {
            width,
            height,
            cells,
            rotating: self.is_rotating(),
            rotation_count: self.score.rotation_count,
            high_score: self.score.high_score,
            island_multiplier: self.score.island_multiplier,
            edge_multiplier: self.score.edge_multiplier,
            island_count: self.islands.len(),
        }
    }

    fn play_round(&mut self, seeds: Vec<Cell>) {
        let outcome = run_round(&mut self.grid, &seeds);
        self.rounds_in_chain += 1;

        let bonus = classify_round(&self.grid, &outcome.rotated, &self.config);
        let count = outcome.rotated.len();

        self.events.push(GameEvent::RotationsOccurred { count });
        let delay = if let Some(span) = &bonus.span {
            info!("edge bonus: {} tile run", span.len());
            self.events.push(GameEvent::EdgeBonusTriggered { length: span.len() });
            self.config.edge_delay()
        } else if bonus.is_island() {
            info!("island bonus x{}", bonus.island_multiplier);
            self.events.push(GameEvent::IslandBonusTriggered {
                islands: bonus.islands.len(),
            });
            self.config.island_delay()
        } else {
            self.config.round_delay()
        };

        if self
            .score
            .apply_round(count, bonus.island_multiplier, bonus.edge_multiplier)
        {
            let high_score = self.score.high_score;
            self.events.push(GameEvent::HighScoreChanged { high_score });
            self.persist_high_score(high_score);
        }

        let mut next_seeds = outcome.next_seeds;
        if !next_seeds.is_empty() && self.rounds_in_chain >= self.max_rounds {
            warn!(
                "chain stopped after {} rounds with {} cells still queued",
                self.rounds_in_chain,
                next_seeds.len()
            );
            next_seeds.clear();
        }

        self.rotating_cells = outcome.rotated;
        self.islands = bonus.islands;
        self.edge_span = bonus.span;
        self.phase = ChainPhase::Rotating {
            next_seeds,
            remaining: delay,
        };
    }

    fn finish_chain(&mut self) {
        debug!("chain finished after {} rounds", self.rounds_in_chain);
        self.phase = ChainPhase::Idle;
        self.rotating_cells.clear();
        self.islands.clear();
        self.edge_span = None;
        self.score.clear_bonus();
    }

    fn persist_high_score(&mut self, high_score: u64) {
        if !self.persist {
            return;
        }
        if let Err(err) = self.store.save(high_score) {
            warn!("could not save high score, keeping it in memory: {:#}", err);
            self.persist = false;
        }
    }
}

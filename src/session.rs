//! Game session state: the board plus level, currency, speed, and cutscene
//! tracking, composed into one explicitly-constructed object.
//!
//! There are no global singletons here: everything a menu, dialog, or board
//! owner needs is reached through a `&mut GameSession` handed to it.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::board::{Grid, GridError, MatchDetector};
use crate::config::AppConfig;
use crate::events::{EventBus, GameEvent};
use crate::save::{keys, Prefs};

/// Game speed setting with a fixed multiplier per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameSpeed {
    #[default]
    Normal,
    Fast,
    Turbo,
}

impl GameSpeed {
    pub fn multiplier(self) -> f32 {
        match self {
            GameSpeed::Normal => 1.0,
            GameSpeed::Fast => 1.5,
            GameSpeed::Turbo => 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameSpeed::Normal => "normal",
            GameSpeed::Fast => "fast",
            GameSpeed::Turbo => "turbo",
        }
    }

    pub fn from_name(name: &str) -> Option<GameSpeed> {
        match name {
            "normal" => Some(GameSpeed::Normal),
            "fast" => Some(GameSpeed::Fast),
            "turbo" => Some(GameSpeed::Turbo),
            _ => None,
        }
    }
}

/// Level progression tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    current: u32,
    highest_cleared: u32,
}

impl LevelProgress {
    pub fn new(start: u32) -> Self {
        LevelProgress {
            current: start.max(1),
            highest_cleared: 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn highest_cleared(&self) -> u32 {
        self.highest_cleared
    }

    /// Mark the current level cleared and advance. Returns the cleared level.
    pub fn advance(&mut self) -> u32 {
        let cleared = self.current;
        self.highest_cleared = self.highest_cleared.max(cleared);
        self.current += 1;
        cleared
    }
}

/// Gold balance with saturating earn and checked spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wallet {
    gold: u64,
}

impl Wallet {
    pub fn new(gold: u64) -> Self {
        Wallet { gold }
    }

    pub fn balance(&self) -> u64 {
        self.gold
    }

    pub fn earn(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Deduct `amount` if the balance covers it
    pub fn spend(&mut self, amount: u64) -> bool {
        if amount > self.gold {
            return false;
        }
        self.gold -= amount;
        true
    }
}

/// Which cutscenes have already been shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CutsceneLog {
    seen: BTreeSet<u32>,
}

impl CutsceneLog {
    pub fn new() -> Self {
        CutsceneLog::default()
    }

    /// Record a viewing. Returns true only the first time an id is seen.
    pub fn mark_seen(&mut self, id: u32) -> bool {
        self.seen.insert(id)
    }

    pub fn has_seen(&self, id: u32) -> bool {
        self.seen.contains(&id)
    }

    pub fn seen_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.seen.iter().copied()
    }
}

/// Why a swap was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    OutOfBounds,
    NotAdjacent,
    /// The swap would not produce any match; the grid was restored.
    NoMatch,
}

/// Outcome of one settle pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettleReport {
    pub cascades: usize,
    pub pieces_cleared: usize,
    pub gold_earned: u64,
}

/// One explicitly-owned game session.
pub struct GameSession {
    grid: Grid,
    level: LevelProgress,
    wallet: Wallet,
    speed: GameSpeed,
    cutscenes: CutsceneLog,
    events: EventBus,
    rng: StdRng,
}

impl GameSession {
    pub fn new(width: usize, height: usize, rng: StdRng) -> Self {
        GameSession {
            grid: Grid::new(width, height),
            level: LevelProgress::new(1),
            wallet: Wallet::default(),
            speed: GameSpeed::default(),
            cutscenes: CutsceneLog::new(),
            events: EventBus::new(),
            rng,
        }
    }

    pub fn from_config(config: &AppConfig, rng: StdRng) -> Self {
        let mut session = GameSession::new(config.board.width, config.board.height, rng);
        session.level = LevelProgress::new(config.session.starting_level);
        session.wallet = Wallet::new(config.session.starting_gold);
        session.speed = config.session.speed;
        session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn gold(&self) -> u64 {
        self.wallet.balance()
    }

    pub fn level(&self) -> u32 {
        self.level.current()
    }

    pub fn highest_cleared_level(&self) -> u32 {
        self.level.highest_cleared()
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn cutscenes(&self) -> &CutsceneLog {
        &self.cutscenes
    }

    /// Subscribe/unsubscribe point for observers (UI, audio, ...)
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Fill every empty cell with random pieces
    pub fn fill_board(&mut self) -> usize {
        self.grid.refill(&mut self.rng)
    }

    /// Swap two orthogonally adjacent cells if the swap produces a match.
    /// Rejected swaps leave the grid untouched.
    pub fn try_swap(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<(), SwapError> {
        if a.0.abs_diff(b.0) + a.1.abs_diff(b.1) != 1 {
            return Err(SwapError::NotAdjacent);
        }
        self.grid.swap(a, b).map_err(|e| match e {
            GridError::OutOfBounds | GridError::Occupied => SwapError::OutOfBounds,
        })?;

        // Full-board detection, not has_match_at: the forward-only per-cell
        // predicate misses runs the swapped cell merely extends.
        if MatchDetector::new(&self.grid).find_all_matches().is_empty() {
            self.grid.swap(a, b).ok();
            return Err(SwapError::NoMatch);
        }
        Ok(())
    }

    /// Clear current matches once, award gold, and let pieces fall.
    /// Does not refill; returns None when the board has no matches.
    pub fn resolve_step(&mut self, cascade: usize) -> Option<SettleReport> {
        let matched = MatchDetector::new(&self.grid).find_all_matches();
        if matched.is_empty() {
            return None;
        }

        let removed = self.grid.take_matching(&matched);
        let gold: u64 = removed
            .iter()
            .map(|piece| u64::from(piece.kind.gold_value()))
            .sum();
        self.wallet.earn(gold);
        self.grid.collapse();

        self.events.emit(&GameEvent::MatchesCleared {
            pieces: removed.len(),
            cascade,
        });
        self.events.emit(&GameEvent::GoldChanged {
            total: self.wallet.balance(),
            delta: i64::try_from(gold).unwrap_or(i64::MAX),
        });

        Some(SettleReport {
            cascades: 1,
            pieces_cleared: removed.len(),
            gold_earned: gold,
        })
    }

    /// Run the full settle loop: detect, clear, collapse, refill, repeat
    /// until the board is stable.
    pub fn settle(&mut self) -> SettleReport {
        let mut report = SettleReport::default();
        while let Some(step) = self.resolve_step(report.cascades) {
            report.cascades += 1;
            report.pieces_cleared += step.pieces_cleared;
            report.gold_earned += step.gold_earned;
            self.grid.refill(&mut self.rng);
        }
        report
    }

    /// Spend gold, emitting a balance notification on success
    pub fn spend_gold(&mut self, amount: u64) -> bool {
        if !self.wallet.spend(amount) {
            return false;
        }
        self.events.emit(&GameEvent::GoldChanged {
            total: self.wallet.balance(),
            delta: -i64::try_from(amount).unwrap_or(i64::MAX),
        });
        true
    }

    /// Mark the current level cleared; plays its cutscene on first clear.
    /// Returns the level that was cleared.
    pub fn complete_level(&mut self) -> u32 {
        let cleared = self.level.advance();
        self.events.emit(&GameEvent::LevelCompleted { level: cleared });
        if self.cutscenes.mark_seen(cleared) {
            self.events.emit(&GameEvent::CutscenePlayed { id: cleared });
        }
        cleared
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        if self.speed == speed {
            return;
        }
        self.speed = speed;
        self.events.emit(&GameEvent::SpeedChanged { speed });
    }

    /// Write session progress into flat preference keys
    pub fn write_prefs(&self, prefs: &mut Prefs) {
        prefs.set_int(keys::LEVEL, i64::from(self.level.current()));
        prefs.set_int(keys::HIGHEST_LEVEL, i64::from(self.level.highest_cleared()));
        prefs.set_int(
            keys::GOLD,
            i64::try_from(self.wallet.balance()).unwrap_or(i64::MAX),
        );
        prefs.set_text(keys::SPEED, self.speed.name());
        let seen: Vec<String> = self.cutscenes.seen_ids().map(|id| id.to_string()).collect();
        prefs.set_text(keys::CUTSCENES, seen.join(","));
    }

    /// Restore session progress from preferences. Missing or malformed keys
    /// leave the corresponding field unchanged.
    pub fn apply_prefs(&mut self, prefs: &Prefs) {
        if let Some(level) = prefs.get_int(keys::LEVEL) {
            if let Ok(level) = u32::try_from(level) {
                self.level.current = level.max(1);
            }
        }
        if let Some(highest) = prefs.get_int(keys::HIGHEST_LEVEL) {
            if let Ok(highest) = u32::try_from(highest) {
                self.level.highest_cleared = highest;
            }
        }
        if let Some(gold) = prefs.get_int(keys::GOLD) {
            if let Ok(gold) = u64::try_from(gold) {
                self.wallet = Wallet::new(gold);
            }
        }
        if let Some(name) = prefs.get_text(keys::SPEED) {
            if let Some(speed) = GameSpeed::from_name(name) {
                self.speed = speed;
            }
        }
        if let Some(list) = prefs.get_text(keys::CUTSCENES) {
            for part in list.split(',').filter(|s| !s.is_empty()) {
                if let Ok(id) = part.parse() {
                    self.cutscenes.mark_seen(id);
                }
            }
        }
    }
}

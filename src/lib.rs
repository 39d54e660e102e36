//! # Match Three
//!
//! Core library for a match-3 game: a grid of typed pieces, match detection
//! over straight runs of three or more, and the session state that surrounds
//! the board (level progression, gold, speed, cutscenes, save/load).
//!
//! ## Modules
//!
//! - [`board`] — Grid, piece kinds, and the match detector
//! - [`session`] — Explicitly-owned game session: swap/settle loop, level,
//!   gold, speed, and cutscene tracking
//! - [`events`] — Publish/subscribe registry for game notifications
//! - [`save`] — Flat key/value preference storage with a JSON file store
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types
//!
//! ## Quick start
//!
//! ```
//! use match_three::board::{Grid, MatchDetector, PieceKind};
//!
//! let mut grid = Grid::new(5, 5);
//! for x in 0..3 {
//!     grid.spawn(x, 0, PieceKind::Red).unwrap();
//! }
//!
//! let matches = MatchDetector::new(&grid).find_all_matches();
//! assert_eq!(matches.len(), 3);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod save;
pub mod session;

//! Match-3 board: piece kinds, the grid of piece slots, and match detection.

mod grid;
mod kind;
mod matcher;

pub use grid::{Grid, GridError, Piece, PieceId};
pub use kind::{KindInfo, PieceKind};
pub use matcher::{MatchDetector, MIN_RUN};

use std::collections::HashSet;

use rand::Rng;

use super::kind::PieceKind;

/// Opaque piece identity. Distinct pieces never share an id, even when they
/// share a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u64);

/// A piece occupying one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds,
    Occupied,
}

/// Rectangular grid of piece slots, (0, 0) at one corner.
///
/// The grid is owned and mutated by the caller (session); detection is a
/// read-only query over it. Ids are minted here so a piece can never occupy
/// two cells at once.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Piece>>,
    next_id: u64,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![None; width * height],
            next_id: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Get the piece at a position. Out-of-range coordinates are treated as
    /// empty, never a panic.
    pub fn get(&self, x: usize, y: usize) -> Option<Piece> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Create a new piece in an empty cell, minting a fresh id
    pub fn spawn(&mut self, x: usize, y: usize, kind: PieceKind) -> Result<PieceId, GridError> {
        let i = self.index(x, y).ok_or(GridError::OutOfBounds)?;
        if self.cells[i].is_some() {
            return Err(GridError::Occupied);
        }
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.cells[i] = Some(Piece { id, kind });
        Ok(id)
    }

    /// Remove and return the piece at a position, if any
    pub fn remove(&mut self, x: usize, y: usize) -> Option<Piece> {
        self.index(x, y).and_then(|i| self.cells[i].take())
    }

    /// Swap the contents of two cells. Either or both may be empty.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<(), GridError> {
        let ia = self.index(a.0, a.1).ok_or(GridError::OutOfBounds)?;
        let ib = self.index(b.0, b.1).ok_or(GridError::OutOfBounds)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Remove every piece whose id is in `ids`, returning the removed pieces
    pub fn take_matching(&mut self, ids: &HashSet<PieceId>) -> Vec<Piece> {
        let mut removed = Vec::with_capacity(ids.len());
        for cell in self.cells.iter_mut() {
            if let Some(piece) = cell {
                if ids.contains(&piece.id) {
                    removed.push(*piece);
                    *cell = None;
                }
            }
        }
        removed
    }

    /// Let pieces fall toward y = 0 within each column, preserving order.
    /// Returns the number of pieces that moved.
    pub fn collapse(&mut self) -> usize {
        let mut moved = 0;
        for x in 0..self.width {
            let mut write_y = 0;
            for y in 0..self.height {
                let from = y * self.width + x;
                if self.cells[from].is_some() {
                    if y != write_y {
                        let to = write_y * self.width + x;
                        self.cells[to] = self.cells[from].take();
                        moved += 1;
                    }
                    write_y += 1;
                }
            }
        }
        moved
    }

    /// Fill every empty cell with a randomly-kinded new piece.
    /// Returns the number of pieces created.
    pub fn refill<R: Rng>(&mut self, rng: &mut R) -> usize {
        let mut created = 0;
        for i in 0..self.cells.len() {
            if self.cells[i].is_none() {
                let kind = PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())];
                let id = PieceId(self.next_id);
                self.next_id += 1;
                self.cells[i] = Some(Piece { id, kind });
                created += 1;
            }
        }
        created
    }

    /// Number of occupied cells
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Check if no cell holds a piece
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Iterate over occupied cells as (x, y, piece)
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|piece| (i % self.width, i / self.width, piece))
        })
    }
}

//! Match detection over a grid snapshot.
//!
//! A match is any straight run of three or more same-kinded, gap-free pieces,
//! horizontal or vertical. Detection is a pure query: membership is recomputed
//! from current grid contents on every call and the grid is never mutated.

use std::collections::HashSet;

use super::grid::{Grid, PieceId};
use super::kind::PieceKind;

/// Minimum run length that qualifies as a match.
pub const MIN_RUN: usize = 3;

/// Read-only match queries over a borrowed grid.
///
/// Construct one fresh after each grid mutation; it holds no state of its own
/// beyond the borrow and the minimum run length.
pub struct MatchDetector<'a> {
    grid: &'a Grid,
    min_run: usize,
}

impl<'a> MatchDetector<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        MatchDetector {
            grid,
            min_run: MIN_RUN,
        }
    }

    /// Find every piece that belongs to a qualifying run.
    ///
    /// Scans the maximal forward run starting at each cell, along +x and then
    /// +y. Sub-runs of an already-found run re-insert the same ids, so the
    /// set collapses overlaps; a piece at a horizontal/vertical intersection
    /// appears once.
    pub fn find_all_matches(&self) -> HashSet<PieceId> {
        let mut matched = HashSet::new();
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                self.collect_run(x, y, 1, 0, &mut matched);
                self.collect_run(x, y, 0, 1, &mut matched);
            }
        }
        matched
    }

    /// Check whether a qualifying run *starts* at (x, y).
    ///
    /// Runs are scanned forward only (+x and +y), mirroring the scan in
    /// [`find_all_matches`](Self::find_all_matches). A cell in the interior
    /// or at the tail of a run therefore reports `false` even though it is
    /// part of a match; callers wanting full membership should intersect with
    /// `find_all_matches` instead. Out-of-range or empty cells are `false`.
    pub fn has_match_at(&self, x: usize, y: usize) -> bool {
        self.run_length(x, y, 1, 0) >= self.min_run || self.run_length(x, y, 0, 1) >= self.min_run
    }

    fn kind_at(&self, x: usize, y: usize) -> Option<PieceKind> {
        self.grid.get(x, y).map(|piece| piece.kind)
    }

    /// Length of the same-kind run starting at (x, y) and extending along
    /// (dx, dy). Zero for an empty or out-of-range start.
    fn run_length(&self, x: usize, y: usize, dx: usize, dy: usize) -> usize {
        let Some(kind) = self.kind_at(x, y) else {
            return 0;
        };
        let mut len = 1;
        while self.kind_at(x + len * dx, y + len * dy) == Some(kind) {
            len += 1;
        }
        len
    }

    fn collect_run(&self, x: usize, y: usize, dx: usize, dy: usize, out: &mut HashSet<PieceId>) {
        let len = self.run_length(x, y, dx, dy);
        if len < self.min_run {
            return;
        }
        for step in 0..len {
            if let Some(piece) = self.grid.get(x + step * dx, y + step * dy) {
                out.insert(piece.id);
            }
        }
    }
}

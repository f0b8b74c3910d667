use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{piece::Piece, shape::ShapeKind};

/// Number of cell columns in the playfield.
pub const FIELD_WIDTH: usize = 16;

/// Number of cell rows in the playfield.
pub const FIELD_HEIGHT: usize = 24;

/// A single playfield cell.
///
/// Filled cells carry the shape identifier of the piece that produced them.
/// The identifier only drives rendering (color lookup); gameplay logic cares
/// about empty versus filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Cell {
    /// No piece material.
    #[default]
    Empty,
    /// Landed piece material of the given shape.
    Filled(ShapeKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// One playfield row.
pub type FieldRow = [Cell; FIELD_WIDTH];

const EMPTY_ROW: FieldRow = [Cell::Empty; FIELD_WIDTH];

/// The persistent playfield.
///
/// Between ticks the field holds landed piece material only. The falling
/// piece is overlaid transiently with [`commit`](Self::commit) and removed
/// again with [`erase`](Self::erase); it becomes permanent the tick it
/// lands, after which [`clear_full_rows`](Self::clear_full_rows) compacts
/// any completed rows.
///
/// Coordinates: `(x, y)` with `x` as the column growing rightward and `y`
/// as the row growing downward, `(0, 0)` at the top-left.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Playfield {
    pub(crate) rows: [FieldRow; FIELD_HEIGHT],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

impl Playfield {
    /// Creates an empty playfield.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; FIELD_HEIGHT],
        }
    }

    /// Returns the cell at `(x, y)`, or `None` outside the field.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < FIELD_WIDTH && y < FIELD_HEIGHT).then(|| self.rows[y][x])
    }

    /// True if `(x, y)` is inside the field and holds piece material.
    #[must_use]
    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(|cell| !cell.is_empty())
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &FieldRow> {
        self.rows.iter()
    }

    /// Writes the piece's shape identifier into every occupied cell that
    /// lies within the field.
    ///
    /// Cells the piece occupies above the top edge are skipped; the caller
    /// guarantees the piece does not overlap existing material.
    pub fn commit(&mut self, piece: &Piece) {
        self.fill(piece, Cell::Filled(piece.shape()));
    }

    /// Inverse of [`commit`](Self::commit): clears every in-field cell the
    /// piece currently occupies.
    pub fn erase(&mut self, piece: &Piece) {
        self.fill(piece, Cell::Empty);
    }

    fn fill(&mut self, piece: &Piece, cell: Cell) {
        for (x, y) in piece.occupied_cells() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < FIELD_WIDTH
                && y < FIELD_HEIGHT
            {
                self.rows[y][x] = cell;
            }
        }
    }

    /// Clears every full row and compacts the field.
    ///
    /// Rows are scanned bottom to top and a row is full when no cell is
    /// empty. Rows below a cleared row are unaffected; rows above shift
    /// downward by the number of cleared rows below them, also when the
    /// cleared rows are not contiguous; exposed rows at the top are
    /// zero-filled.
    ///
    /// Returns the number of rows cleared. The count is the sole trigger
    /// for score, level, and audio reactions.
    pub fn clear_full_rows(&mut self) -> usize {
        let full_rows: ArrayVec<usize, FIELD_HEIGHT> = (0..FIELD_HEIGHT)
            .rev()
            .filter(|&y| self.rows[y].iter().all(|cell| !cell.is_empty()))
            .collect();
        if full_rows.is_empty() {
            return 0;
        }

        // Walk destinations bottom-up, pulling each surviving row past the
        // cleared rows below it.
        let mut survivors = (0..FIELD_HEIGHT).rev().filter(|y| !full_rows.contains(y));
        for dst in (0..FIELD_HEIGHT).rev() {
            self.rows[dst] = match survivors.next() {
                Some(src) => self.rows[src],
                None => EMPTY_ROW,
            };
        }
        full_rows.len()
    }
}

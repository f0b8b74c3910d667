use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Side length of the square occupancy matrix every shape fits in.
pub const SHAPE_SIZE: usize = 4;

/// Occupancy matrix of a shape in piece-local coordinates.
///
/// `matrix[row][column]` is `true` where the shape fills the cell. Row 0 is
/// the top of the bounding box.
pub type ShapeMatrix = [[bool; SHAPE_SIZE]; SHAPE_SIZE];

/// Identifier of one of the seven shapes.
///
/// Discriminants start at 1 so a filled playfield cell can carry the
/// identifier directly; 0 stays reserved for empty cells in exported grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-shape (vertical bar).
    I = 1,
    /// J-shape.
    J = 2,
    /// L-shape.
    L = 3,
    /// O-shape (square).
    O = 4,
    /// S-shape.
    S = 5,
    /// T-shape.
    T = 6,
    /// Z-shape.
    Z = 7,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        match rng.random_range(0..ShapeKind::LEN) {
            0 => ShapeKind::I,
            1 => ShapeKind::J,
            2 => ShapeKind::L,
            3 => ShapeKind::O,
            4 => ShapeKind::S,
            5 => ShapeKind::T,
            _ => ShapeKind::Z,
        }
    }
}

impl ShapeKind {
    /// Number of shapes in the catalog (7).
    pub const LEN: usize = 7;

    /// Canonical spawn-orientation matrix for this shape.
    ///
    /// The catalog is immutable; callers copy the matrix into their own
    /// state before mutating it.
    #[must_use]
    pub const fn matrix(self) -> ShapeMatrix {
        CATALOG[self as usize - 1]
    }
}

const CATALOG: [ShapeMatrix; ShapeKind::LEN] = {
    const C: bool = true;
    const E: bool = false;

    [
        // I-shape
        [
            [E, C, E, E],
            [E, C, E, E],
            [E, C, E, E],
            [E, C, E, E],
        ],
        // J-shape
        [
            [E, E, C, E],
            [E, E, C, E],
            [E, C, C, E],
            [E, E, E, E],
        ],
        // L-shape
        [
            [E, C, E, E],
            [E, C, E, E],
            [E, C, C, E],
            [E, E, E, E],
        ],
        // O-shape
        [
            [E, E, E, E],
            [E, C, C, E],
            [E, C, C, E],
            [E, E, E, E],
        ],
        // S-shape
        [
            [E, E, E, E],
            [E, C, C, E],
            [C, C, E, E],
            [E, E, E, E],
        ],
        // T-shape
        [
            [E, E, E, E],
            [E, C, E, E],
            [C, C, C, E],
            [E, E, E, E],
        ],
        // Z-shape
        [
            [E, E, E, E],
            [C, C, E, E],
            [E, C, C, E],
            [E, E, E, E],
        ],
    ]
};

use serde::{Deserialize, Serialize};

use super::{
    playfield::{FIELD_HEIGHT, FIELD_WIDTH, Playfield},
    shape::{SHAPE_SIZE, ShapeKind, ShapeMatrix},
};

/// Column of the spawn anchor, placing the matrix near the top-center.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const SPAWN_X: i32 = (FIELD_WIDTH / 2 - 2) as i32;

/// Row of the spawn anchor.
pub const SPAWN_Y: i32 = 0;

/// The falling, player-controlled piece.
///
/// A piece is the transient counterpart of the persistent [`Playfield`]: a
/// shape identifier, the anchor position of its 4×4 occupancy matrix in
/// grid coordinates, a velocity in cells per tick, and a `landed` flag.
/// The matrix is the piece's own mutable copy of the catalog entry, so
/// rotation never touches the catalog.
///
/// # Coordinate System
///
/// - The anchor `(x, y)` is the top-left corner of the matrix
/// - `x` grows rightward, `y` grows downward
/// - The anchor may lie outside the field as long as every occupied cell
///   stays within column bounds; occupied cells above row 0 are legal
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, Playfield, ShapeKind};
///
/// let field = Playfield::new();
/// let mut piece = Piece::new(ShapeKind::T);
/// piece.steer(1);
/// piece.advance(&field);
/// assert!(!piece.is_landed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Piece {
    shape: ShapeKind,
    x: i32,
    y: i32,
    vel_x: i32,
    vel_y: i32,
    matrix: ShapeMatrix,
    landed: bool,
}

impl Piece {
    /// Creates a fresh piece of the given shape at the spawn anchor with
    /// zero velocity.
    #[must_use]
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            x: SPAWN_X,
            y: SPAWN_Y,
            vel_x: 0,
            vel_y: 0,
            matrix: shape.matrix(),
            landed: false,
        }
    }

    #[must_use]
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn velocity(&self) -> (i32, i32) {
        (self.vel_x, self.vel_y)
    }

    #[must_use]
    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn is_landed(&self) -> bool {
        self.landed
    }

    /// Returns an iterator over the occupied cells in grid coordinates.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.matrix.iter().enumerate().flat_map(move |(dy, row)| {
            row.iter().enumerate().filter_map(move |(dx, &occupied)| {
                occupied.then(|| (self.x + dx as i32, self.y + dy as i32))
            })
        })
    }

    /// True iff the piece overlaps field material or leaves the playable
    /// area.
    ///
    /// An occupied cell collides when it falls outside the column bounds,
    /// at or below the bottom row, or on a filled field cell. Cells above
    /// row 0 never collide, so a freshly spawned piece may hang partially
    /// off the top. Movement, rotation, and landing detection all go
    /// through this single predicate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn collides(&self, field: &Playfield) -> bool {
        self.occupied_cells().any(|(x, y)| {
            x < 0 || x >= FIELD_WIDTH as i32 || y >= FIELD_HEIGHT as i32 || field.is_filled(x, y)
        })
    }

    /// Applies the piece's velocity against `field`, one axis at a time.
    ///
    /// The whole horizontal displacement is reverted if it would collide;
    /// it is never clamped cell by cell. The vertical displacement is then
    /// resolved independently, so a piece can still slide sideways in the
    /// tick its descent is rejected. A rejected descent marks the piece as
    /// landed; nothing else does.
    pub fn advance(&mut self, field: &Playfield) {
        self.x += self.vel_x;
        if self.collides(field) {
            self.x -= self.vel_x;
        }
        self.y += self.vel_y;
        if self.collides(field) {
            self.y -= self.vel_y;
            self.landed = true;
        }
    }

    /// One synthetic one-cell descent: a full [`advance`](Self::advance)
    /// with the vertical velocity raised by one for its duration.
    pub fn gravity_step(&mut self, field: &Playfield) {
        self.vel_y += 1;
        self.advance(field);
        self.vel_y -= 1;
    }

    /// Adds to the horizontal velocity.
    ///
    /// Press and release of a direction contribute opposite deltas, so
    /// holding both directions at once cancels to zero net motion.
    pub fn steer(&mut self, delta: i32) {
        self.vel_x += delta;
    }

    /// Starts a soft drop: raises the vertical velocity by one.
    pub fn press_soft_drop(&mut self) {
        self.vel_y += 1;
    }

    /// Ends a soft drop, clamping so the piece never moves upward.
    pub fn release_soft_drop(&mut self) {
        self.vel_y = (self.vel_y - 1).max(0);
    }

    /// Attempts a clockwise rotation.
    ///
    /// The candidate matrix is tested against the field first and a
    /// rotation that would collide leaves the piece untouched. Returns
    /// whether the rotation took effect. No wall kicks are attempted.
    pub fn try_rotate_cw(&mut self, field: &Playfield) -> bool {
        self.try_matrix(self.rotated_cw(), field)
    }

    /// Counter-clockwise counterpart of [`try_rotate_cw`](Self::try_rotate_cw).
    pub fn try_rotate_ccw(&mut self, field: &Playfield) -> bool {
        self.try_matrix(self.rotated_ccw(), field)
    }

    fn try_matrix(&mut self, matrix: ShapeMatrix, field: &Playfield) -> bool {
        let candidate = Self { matrix, ..*self };
        if candidate.collides(field) {
            return false;
        }
        *self = candidate;
        true
    }

    fn rotated_cw(&self) -> ShapeMatrix {
        let mut next = [[false; SHAPE_SIZE]; SHAPE_SIZE];
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                next[j][SHAPE_SIZE - 1 - i] = cell;
            }
        }
        next
    }

    fn rotated_ccw(&self) -> ShapeMatrix {
        let mut next = [[false; SHAPE_SIZE]; SHAPE_SIZE];
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                next[SHAPE_SIZE - 1 - j][i] = cell;
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::playfield::Cell;

    fn piece_at(shape: ShapeKind, x: i32, y: i32) -> Piece {
        Piece {
            x,
            y,
            ..Piece::new(shape)
        }
    }

    #[test]
    fn test_spawned_piece_is_clear_of_empty_field() {
        let field = Playfield::new();
        for shape in [
            ShapeKind::I,
            ShapeKind::J,
            ShapeKind::L,
            ShapeKind::O,
            ShapeKind::S,
            ShapeKind::T,
            ShapeKind::Z,
        ] {
            let piece = Piece::new(shape);
            assert!(!piece.collides(&field), "{shape:?} collides at spawn");
            assert!(!piece.is_landed());
            assert_eq!(piece.velocity(), (0, 0));
            assert_eq!(piece.position(), (SPAWN_X, SPAWN_Y));
        }
    }

    #[test]
    fn test_collides_outside_column_bounds() {
        let field = Playfield::new();
        // O-shape occupies matrix columns 1-2; anchor -2 puts its left
        // column at -1.
        assert!(piece_at(ShapeKind::O, -2, 5).collides(&field));
        // Anchor -1 keeps all occupied cells at columns 0-1.
        assert!(!piece_at(ShapeKind::O, -1, 5).collides(&field));
        assert!(piece_at(ShapeKind::O, FIELD_WIDTH as i32 - 2, 5).collides(&field));
        assert!(!piece_at(ShapeKind::O, FIELD_WIDTH as i32 - 3, 5).collides(&field));
    }

    #[test]
    fn test_collides_at_bottom_bound() {
        let field = Playfield::new();
        // O-shape occupies matrix rows 1-2; the lowest legal anchor keeps
        // its bottom row on the last field row.
        assert!(!piece_at(ShapeKind::O, 5, FIELD_HEIGHT as i32 - 3).collides(&field));
        assert!(piece_at(ShapeKind::O, 5, FIELD_HEIGHT as i32 - 2).collides(&field));
    }

    #[test]
    fn test_cells_above_top_never_collide() {
        let field = Playfield::new();
        // Anchor above the field: occupied cells at negative rows.
        assert!(!piece_at(ShapeKind::O, 5, -2).collides(&field));
    }

    #[test]
    fn test_collides_with_field_material() {
        let mut field = Playfield::new();
        let piece = piece_at(ShapeKind::O, 5, 5);
        assert!(!piece.collides(&field));

        field.commit(&piece);
        assert!(piece.collides(&field));
    }

    #[test]
    fn test_advance_with_zero_velocity_is_idempotent() {
        let field = Playfield::new();
        let mut piece = piece_at(ShapeKind::T, 5, 5);
        let before = piece;

        piece.advance(&field);
        piece.advance(&field);
        assert_eq!(piece, before);
    }

    #[test]
    fn test_horizontal_displacement_is_rejected_atomically() {
        let field = Playfield::new();
        // Two cells of room to the left, velocity of three.
        let mut piece = piece_at(ShapeKind::O, -1, 5);
        let x_before = piece.position().0;
        piece.steer(-3);

        piece.advance(&field);
        // Not clamped to the wall; the whole displacement is reverted.
        assert_eq!(piece.position().0, x_before);
        assert!(!piece.is_landed());
    }

    #[test]
    fn test_rejected_descent_lands_the_piece() {
        let field = Playfield::new();
        let mut piece = piece_at(ShapeKind::O, 5, FIELD_HEIGHT as i32 - 3);
        piece.press_soft_drop();

        piece.advance(&field);
        assert_eq!(piece.position(), (5, FIELD_HEIGHT as i32 - 3));
        assert!(piece.is_landed());
    }

    #[test]
    fn test_sideways_slide_survives_rejected_descent() {
        let field = Playfield::new();
        let mut piece = piece_at(ShapeKind::O, 5, FIELD_HEIGHT as i32 - 3);
        piece.steer(1);
        piece.press_soft_drop();

        piece.advance(&field);
        assert_eq!(piece.position().0, 6);
        assert!(piece.is_landed());
    }

    #[test]
    fn test_gravity_step_descends_one_cell() {
        let field = Playfield::new();
        let mut piece = piece_at(ShapeKind::T, 5, 5);

        piece.gravity_step(&field);
        assert_eq!(piece.position(), (5, 6));
        assert_eq!(piece.velocity(), (0, 0));
    }

    #[test]
    fn test_opposing_steers_cancel() {
        let field = Playfield::new();
        let mut piece = piece_at(ShapeKind::T, 5, 5);
        piece.steer(-1);
        piece.steer(1);

        piece.advance(&field);
        assert_eq!(piece.position(), (5, 5));
    }

    #[test]
    fn test_release_soft_drop_never_goes_negative() {
        let mut piece = Piece::new(ShapeKind::T);
        piece.release_soft_drop();
        assert_eq!(piece.velocity().1, 0);

        piece.press_soft_drop();
        piece.press_soft_drop();
        piece.release_soft_drop();
        assert_eq!(piece.velocity().1, 1);
    }

    #[test]
    fn test_rotation_roundtrip_restores_matrix() {
        let field = Playfield::new();
        for shape in [
            ShapeKind::I,
            ShapeKind::J,
            ShapeKind::L,
            ShapeKind::O,
            ShapeKind::S,
            ShapeKind::T,
            ShapeKind::Z,
        ] {
            let mut piece = piece_at(shape, 5, 5);
            let original = *piece.matrix();

            assert!(piece.try_rotate_cw(&field));
            assert!(piece.try_rotate_ccw(&field));
            assert_eq!(*piece.matrix(), original, "{shape:?} cw/ccw roundtrip");

            assert!(piece.try_rotate_ccw(&field));
            assert!(piece.try_rotate_cw(&field));
            assert_eq!(*piece.matrix(), original, "{shape:?} ccw/cw roundtrip");
        }
    }

    #[test]
    fn test_four_clockwise_rotations_are_identity() {
        let field = Playfield::new();
        let mut piece = piece_at(ShapeKind::S, 5, 5);
        let original = *piece.matrix();

        for _ in 0..4 {
            assert!(piece.try_rotate_cw(&field));
        }
        assert_eq!(*piece.matrix(), original);
    }

    #[test]
    fn test_clockwise_rotation_mapping() {
        let field = Playfield::new();
        let mut piece = piece_at(ShapeKind::I, 5, 5);

        assert!(piece.try_rotate_cw(&field));
        // The vertical bar in column 1 becomes the horizontal bar in row 1.
        let expected: ShapeMatrix = [
            [false, false, false, false],
            [true, true, true, true],
            [false, false, false, false],
            [false, false, false, false],
        ];
        assert_eq!(*piece.matrix(), expected);
    }

    #[test]
    fn test_blocked_rotation_is_a_no_op() {
        let mut field = Playfield::new();
        // Wall of material in the column right of a vertical I-piece.
        for y in 0..FIELD_HEIGHT {
            field.rows[y][7] = Cell::Filled(ShapeKind::Z);
        }
        let mut piece = piece_at(ShapeKind::I, 5, 5);
        let before = piece;

        assert!(!piece.try_rotate_cw(&field));
        assert_eq!(piece, before);
    }
}

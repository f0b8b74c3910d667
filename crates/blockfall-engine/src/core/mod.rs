pub use self::{piece::*, playfield::*, shape::*};

pub(crate) mod piece;
pub(crate) mod playfield;
pub(crate) mod shape;

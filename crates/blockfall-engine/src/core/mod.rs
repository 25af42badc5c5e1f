pub use self::{coord::*, grid::*, legality::*, piece::*};

pub(crate) mod coord;
pub(crate) mod grid;
pub(crate) mod legality;
pub(crate) mod piece;

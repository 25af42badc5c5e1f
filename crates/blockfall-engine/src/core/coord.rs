use serde::{Deserialize, Serialize};

/// A cell coordinate: `col` grows rightward, `row` grows downward.
///
/// Rows above the visible grid are negative; a spawning piece starts there.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("({col}, {row})")]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            col: self.col + dx,
            row: self.row + dy,
        }
    }

    /// The coordinate directly beneath this one.
    #[must_use]
    pub const fn below(self) -> Self {
        self.offset(0, 1)
    }
}

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// Number of cells in every piece group.
pub const PIECE_SIZE: usize = 4;

/// The falling shape: a fixed set of [`PIECE_SIZE`] cells plus the kind they were spawned as.
///
/// Movement and rotation mutate the group in place and never check legality; callers probe
/// a disposable copy first (see [`can_place`](super::legality::can_place)). Every operation
/// moves all cells together.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Coord, PieceGroup, PieceKind};
///
/// let mut group = PieceGroup::spawn(PieceKind::O, 10);
/// assert!(group.cells().iter().all(|cell| cell.row < 0));
///
/// group.translate(-1, 2);
/// assert!(group.cells().contains(&Coord::new(3, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceGroup {
    kind: PieceKind,
    cells: [Coord; PIECE_SIZE],
}

impl PieceGroup {
    /// Creates a group of `kind` at the spawn position of a grid `grid_width` columns wide.
    #[must_use]
    pub fn spawn(kind: PieceKind, grid_width: usize) -> Self {
        let mut group = Self {
            kind,
            cells: [Coord::default(); PIECE_SIZE],
        };
        group.reset(kind, grid_width);
        group
    }

    /// Creates a group from explicit cells.
    ///
    /// The cells must be listed in the shape's canonical order for [`rotate`](Self::rotate)
    /// to turn around the right pivot.
    #[must_use]
    pub const fn from_cells(kind: PieceKind, cells: [Coord; PIECE_SIZE]) -> Self {
        Self { kind, cells }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn cells(&self) -> &[Coord; PIECE_SIZE] {
        &self.cells
    }

    /// Reinitializes the group to a fresh `kind` at the spawn position.
    ///
    /// The shape is centred horizontally and its lowest cells sit on row `-1`, so a freshly
    /// spawned group is entirely above the visible grid.
    pub fn reset(&mut self, kind: PieceKind, grid_width: usize) {
        let shape = kind.shape();
        let (width, height) = shape.extent();
        let col0 = spawn_column(grid_width, width);
        for (cell, offset) in self.cells.iter_mut().zip(shape.cells) {
            *cell = offset.offset(col0, -height);
        }
        self.kind = kind;
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for cell in &mut self.cells {
            *cell = cell.offset(dx, dy);
        }
    }

    /// Rotates the group a quarter turn clockwise around its pivot cell.
    ///
    /// The O shape has no pivot and is left untouched. Four rotations restore the original
    /// cells exactly.
    pub fn rotate(&mut self) {
        let Some(pivot) = self.kind.shape().pivot else {
            return;
        };
        let center = self.cells[pivot];
        for cell in &mut self.cells {
            let dc = cell.col - center.col;
            let dr = cell.row - center.row;
            *cell = Coord::new(center.col - dr, center.row + dc);
        }
    }

    /// Overwrites this group with a copy of `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.kind = other.kind;
        self.cells = other.cells;
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn spawn_column(grid_width: usize, shape_width: i32) -> i32 {
    (grid_width as i32 - shape_width) / 2
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    fn shape(self) -> &'static Shape {
        &SHAPES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single (upper-case) character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Cell offsets of a shape in its spawn orientation, with the index of the cell it rotates
/// around.
#[derive(Debug)]
struct Shape {
    cells: [Coord; PIECE_SIZE],
    pivot: Option<usize>,
}

impl Shape {
    fn extent(&self) -> (i32, i32) {
        let width = self.cells.iter().map(|c| c.col).max().unwrap_or(0) + 1;
        let height = self.cells.iter().map(|c| c.row).max().unwrap_or(0) + 1;
        (width, height)
    }
}

const SHAPES: [Shape; PieceKind::LEN] = {
    const fn c(col: i32, row: i32) -> Coord {
        Coord::new(col, row)
    }

    [
        // I-piece: ####
        Shape {
            cells: [c(0, 0), c(1, 0), c(2, 0), c(3, 0)],
            pivot: Some(1),
        },
        // O-piece
        Shape {
            cells: [c(0, 0), c(1, 0), c(0, 1), c(1, 1)],
            pivot: None,
        },
        // S-piece
        Shape {
            cells: [c(1, 0), c(2, 0), c(0, 1), c(1, 1)],
            pivot: Some(3),
        },
        // Z-piece
        Shape {
            cells: [c(0, 0), c(1, 0), c(1, 1), c(2, 1)],
            pivot: Some(2),
        },
        // J-piece
        Shape {
            cells: [c(0, 0), c(0, 1), c(1, 1), c(2, 1)],
            pivot: Some(2),
        },
        // L-piece
        Shape {
            cells: [c(2, 0), c(0, 1), c(1, 1), c(2, 1)],
            pivot: Some(2),
        },
        // T-piece
        Shape {
            cells: [c(1, 0), c(0, 1), c(1, 1), c(2, 1)],
            pivot: Some(2),
        },
    ]
};

use std::iter;

use blockfall_engine::GameSnapshot;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{BlockDisplay, BoardCell};

/// Locked cells with the visible part of the falling piece on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    snapshot: &'a GameSnapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot) -> Self {
        Self {
            snapshot,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells_to_u16(self.snapshot.grid.width()) * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(self.snapshot.grid.height()) * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Resolves every grid position to what it shows, row by row from the top.
pub fn board_cells(snapshot: &GameSnapshot) -> Vec<Vec<BoardCell>> {
    let mut rows: Vec<Vec<BoardCell>> = snapshot
        .grid
        .rows()
        .map(|row| {
            row.iter()
                .map(|&locked| {
                    if locked {
                        BoardCell::Locked
                    } else {
                        BoardCell::Empty
                    }
                })
                .collect()
        })
        .collect();

    let kind = snapshot.falling.kind();
    for cell in snapshot.visible_falling_cells() {
        if let (Ok(col), Ok(row)) = (usize::try_from(cell.col), usize::try_from(cell.row))
            && let Some(slot) = rows.get_mut(row).and_then(|row| row.get_mut(col))
        {
            *slot = BoardCell::Piece(kind);
        }
    }
    rows
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let grid = &self.snapshot.grid;
        let col_constraints = (0..grid.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..grid.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, board_cells(self.snapshot)) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                BlockDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}

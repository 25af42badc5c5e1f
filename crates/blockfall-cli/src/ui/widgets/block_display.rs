use blockfall_engine::PieceKind;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// What a single grid position shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCell {
    Empty,
    Locked,
    Piece(PieceKind),
}

#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: BoardCell, show_dots: bool) -> Self {
        match cell {
            BoardCell::Empty => {
                if show_dots {
                    Self::new(style::EMPTY_DOT, ".")
                } else {
                    Self::new(style::EMPTY, "")
                }
            }
            BoardCell::Locked => Self::new(style::LOCKED, ""),
            BoardCell::Piece(kind) => {
                let style = match kind {
                    PieceKind::I => style::I_BLOCK,
                    PieceKind::O => style::O_BLOCK,
                    PieceKind::S => style::S_BLOCK,
                    PieceKind::Z => style::Z_BLOCK,
                    PieceKind::J => style::J_BLOCK,
                    PieceKind::L => style::L_BLOCK,
                    PieceKind::T => style::T_BLOCK,
                };
                Self::new(style, "")
            }
        }
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

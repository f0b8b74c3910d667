use blockfall_engine::{FIELD_HEIGHT, FIELD_WIDTH, Playfield};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Draws the playfield grid cell by cell.
///
/// The field passed in is expected to carry the falling piece already
/// overlaid, the way session snapshots are emitted.
#[derive(Debug)]
pub struct FieldDisplay<'a> {
    playfield: &'a Playfield,
    block: Option<BlockWidget<'a>>,
}

impl<'a> FieldDisplay<'a> {
    pub fn new(playfield: &'a Playfield) -> Self {
        Self {
            playfield,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        FIELD_WIDTH as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        FIELD_HEIGHT as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for FieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &FieldDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let cell_width = CellDisplay::width();
        let cell_height = CellDisplay::height();
        for (y, row) in self.playfield.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let cell_area = Rect::new(
                    area.x + x as u16 * cell_width,
                    area.y + y as u16 * cell_height,
                    cell_width,
                    cell_height,
                )
                .intersection(area);
                if cell_area.is_empty() {
                    continue;
                }
                CellDisplay::from_cell(*cell).render(cell_area, buf);
            }
        }
    }
}

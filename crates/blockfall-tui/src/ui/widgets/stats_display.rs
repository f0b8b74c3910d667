use blockfall_engine::Snapshot;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget},
};

use crate::ui::widgets::style;

/// Score, level, and total-row readout beside the playfield.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    snapshot: &'a Snapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
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
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        3 + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(format!("Score: {}", self.snapshot.score)),
            Line::from(format!("Level: {}", self.snapshot.level)),
            Line::from(format!("Total rows: {}", self.snapshot.total_rows_cleared)),
        ];
        let paragraph = Paragraph::new(lines).style(style::DEFAULT);
        let paragraph = match &self.block {
            Some(block) => paragraph.block(block.clone()),
            None => paragraph,
        };
        paragraph.render(area, buf);
    }
}

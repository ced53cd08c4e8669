use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer, Shape};

/// No-op renderer used by tests and headless chart usage.
///
/// It still validates frame content so tests catch invalid geometry
/// without a drawing backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_node_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_node_count = frame.nodes.len();
        self.last_text_count = frame.count_shapes(|shape| matches!(shape, Shape::Text(_)));
        Ok(())
    }
}

mod element_id;
mod frame;
mod null_renderer;
mod primitives;
mod scene;

pub use element_id::{TokenRegistry, child_id, element_id, is_within};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    ArcPrimitive, CirclePrimitive, Color, LinePrimitive, PolylinePrimitive, RectPrimitive, Shape,
    TextHAlign, TextPrimitive,
};
pub use scene::{
    DEFAULT_TRANSITION_MS, DatumField, Easing, OpacityTransition, Scene, SceneNode,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from data shaping and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

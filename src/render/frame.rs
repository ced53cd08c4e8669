use serde::{Deserialize, Serialize};

use crate::core::Size;
use crate::error::{ChartError, ChartResult};
use crate::render::{SceneNode, Shape};

/// Backend-agnostic scene for one draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub size: Size,
    pub nodes: Vec<SceneNode>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(size: Size, nodes: Vec<SceneNode>) -> Self {
        Self { size, nodes }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(self.size.width > 0.0) || !(self.size.height > 0.0) {
            return Err(ChartError::InvalidFrame {
                frame: "render",
                width: self.size.width,
                height: self.size.height,
            });
        }

        for node in &self.nodes {
            if !(0.0..=1.0).contains(&node.opacity) {
                return Err(ChartError::InvalidData(format!(
                    "node `{}` opacity must be in [0, 1]",
                    node.id
                )));
            }
            node.shape.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn count_shapes(&self, matches: impl Fn(&Shape) -> bool) -> usize {
        self.nodes.iter().filter(|node| matches(&node.shape)).count()
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{Role, Size, Value};
use crate::render::{RenderFrame, Shape, is_within};

/// Default hover transition length, in milliseconds.
pub const DEFAULT_TRANSITION_MS: f64 = 200.0;

/// One labeled field carried by a scene node for tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatumField {
    pub role: Role,
    pub value: Value,
}

/// Element of the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    /// Namespace that owns the node; `clear` removes by scope.
    pub scope: String,
    pub class: String,
    pub shape: Shape,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub datum: SmallVec<[DatumField; 3]>,
}

impl SceneNode {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        scope: impl Into<String>,
        class: impl Into<String>,
        shape: Shape,
    ) -> Self {
        Self {
            id: id.into(),
            scope: scope.into(),
            class: class.into(),
            shape,
            opacity: 1.0,
            datum: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_datum(mut self, datum: Vec<DatumField>) -> Self {
        self.datum = SmallVec::from_vec(datum);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// Request to tween a node's opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpacityTransition {
    pub target: String,
    pub to: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl OpacityTransition {
    #[must_use]
    pub fn new(target: impl Into<String>, to: f64) -> Self {
        Self {
            target: target.into(),
            to,
            duration_ms: DEFAULT_TRANSITION_MS,
            easing: Easing::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveTransition {
    request: OpacityTransition,
    from: f64,
    elapsed_ms: f64,
}

/// In-memory element tree shared by a chart and its overlays.
///
/// Nodes are kept in insertion order, which is also paint order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: IndexMap<String, SceneNode>,
    transitions: Vec<ActiveTransition>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, replacing any node with the same id in place.
    pub fn insert(&mut self, node: SceneNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    pub fn nodes_in_scope<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a SceneNode> {
        self.nodes.values().filter(move |node| node.scope == scope)
    }

    pub fn nodes_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a SceneNode> {
        self.nodes.values().filter(move |node| node.id.starts_with(prefix))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every node owned by `scope` and their pending transitions.
    ///
    /// Removing an empty scope is a no-op.
    pub fn remove_scope(&mut self, scope: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, node| node.scope != scope);
        let nodes = &self.nodes;
        self.transitions
            .retain(|active| nodes.contains_key(&active.request.target));
        let removed = before - self.nodes.len();
        trace!(scope, removed, "removed scene scope");
        removed
    }

    /// Starts a transition, replacing any running one on the same node.
    ///
    /// Returns `false` when the target node does not exist.
    pub fn start_transition(&mut self, request: OpacityTransition) -> bool {
        let Some(node) = self.nodes.get_mut(&request.target) else {
            return false;
        };
        self.transitions
            .retain(|active| active.request.target != request.target);
        if request.duration_ms <= 0.0 {
            node.opacity = request.to;
            return true;
        }
        self.transitions.push(ActiveTransition {
            from: node.opacity,
            request,
            elapsed_ms: 0.0,
        });
        true
    }

    /// Starts the transition on `request.target` and every node nested under it.
    ///
    /// Returns how many nodes were targeted.
    pub fn start_group_transition(&mut self, request: &OpacityTransition) -> usize {
        let targets: Vec<String> = self
            .nodes
            .keys()
            .filter(|id| is_within(id, &request.target))
            .cloned()
            .collect();
        for target in &targets {
            self.start_transition(OpacityTransition {
                target: target.clone(),
                ..request.clone()
            });
        }
        trace!(target = %request.target, nodes = targets.len(), to = request.to, "group transition");
        targets.len()
    }

    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Advances running transitions by `elapsed_ms` and drops finished ones.
    pub fn advance(&mut self, elapsed_ms: f64) {
        let nodes = &mut self.nodes;
        self.transitions.retain_mut(|active| {
            active.elapsed_ms += elapsed_ms.max(0.0);
            let t = active.elapsed_ms / active.request.duration_ms;
            let eased = active.request.easing.apply(t);
            if let Some(node) = nodes.get_mut(&active.request.target) {
                node.opacity = active.from + (active.request.to - active.from) * eased;
            }
            t < 1.0
        });
    }

    /// Snapshot of the current tree for a renderer.
    #[must_use]
    pub fn to_frame(&self, size: Size) -> RenderFrame {
        RenderFrame::new(size, self.nodes.values().cloned().collect())
    }
}

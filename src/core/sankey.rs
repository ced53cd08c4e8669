use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::accessor::Role;
use crate::core::frame::Rect;
use crate::core::mapper::RecordSet;
use crate::core::value::{Value, ValueKey};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub name: Value,
}

/// Flow between two nodes, by index into [`SankeyGraph::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SankeyIssue {
    /// A record whose source or target cannot name a node; the link is skipped.
    DanglingLink {
        record: usize,
        source: String,
        target: String,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SankeyGraph {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
    pub issues: Vec<SankeyIssue>,
}

impl SankeyGraph {
    #[must_use]
    pub fn node_index(&self, name: &Value) -> Option<usize> {
        let key = name.key()?;
        self.nodes
            .iter()
            .position(|node| node.name.key().as_ref() == Some(&key))
    }
}

/// Builds the node and link lists from `source`/`target`/`value` records.
///
/// Nodes are the distinct sources and targets in first-occurrence order
/// (source before target within a record). Cycles are kept.
#[must_use]
pub fn build_sankey(records: &RecordSet) -> SankeyGraph {
    let mut nodes: IndexMap<ValueKey, Value> = IndexMap::new();
    let mut links = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for (index, record) in records.records().iter().enumerate() {
        let source = records.value(record, Role::Source);
        let target = records.value(record, Role::Target);
        let source_key = source.and_then(Value::key);
        let target_key = target.and_then(Value::key);
        let (Some(source), Some(target), Some(source_key), Some(target_key)) =
            (source, target, source_key, target_key)
        else {
            let describe = |v: Option<&Value>| v.map_or_else(|| "undefined".to_owned(), ToString::to_string);
            issues.push(SankeyIssue::DanglingLink {
                record: index,
                source: describe(source),
                target: describe(target),
            });
            continue;
        };

        let (source_index, _) = nodes.insert_full(source_key, source.clone());
        let (target_index, _) = nodes.insert_full(target_key, target.clone());
        let value = records
            .value(record, Role::Value)
            .map_or(f64::NAN, Value::number_or_nan);
        links.push(SankeyLink {
            source: source_index,
            target: target_index,
            value: if value.is_finite() { value } else { 0.0 },
        });
    }

    if !issues.is_empty() {
        warn!(skipped = issues.len(), "sankey records with dangling references");
    }
    debug!(nodes = nodes.len(), links = links.len(), "built sankey graph");

    SankeyGraph {
        nodes: nodes.into_values().map(|name| SankeyNode { name }).collect(),
        links,
        issues,
    }
}

/// Horizontal node placement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAlign {
    Left,
    Right,
    Center,
    #[default]
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn compare(self, a: f64, b: f64) -> std::cmp::Ordering {
        match self {
            Self::Ascending => a.total_cmp(&b),
            Self::Descending => b.total_cmp(&a),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SankeyLayoutConfig {
    pub node_width: f64,
    pub node_padding: f64,
    pub align: NodeAlign,
    pub node_sort: Option<SortDirection>,
    pub link_sort: Option<SortDirection>,
}

impl Default for SankeyLayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 24.0,
            node_padding: 8.0,
            align: NodeAlign::Justify,
            node_sort: None,
            link_sort: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub name: Value,
    pub value: f64,
    pub depth: usize,
    pub height: usize,
    pub layer: usize,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkLayout {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub width: f64,
    /// Vertical center of the band where it leaves the source node.
    pub y0: f64,
    /// Vertical center of the band where it enters the target node.
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SankeyLayout {
    pub nodes: Vec<NodeLayout>,
    pub links: Vec<LinkLayout>,
}

/// Positions nodes in columns and stacks link bands inside `extent`.
///
/// Fails with [`ChartError::CircularLink`] when the graph has a cycle.
pub fn layout_sankey(
    graph: &SankeyGraph,
    extent: Rect,
    config: SankeyLayoutConfig,
) -> ChartResult<SankeyLayout> {
    if !config.node_width.is_finite() || config.node_width <= 0.0 {
        return Err(ChartError::InvalidConfig(
            "sankey node width must be finite and > 0".to_owned(),
        ));
    }
    if !config.node_padding.is_finite() || config.node_padding < 0.0 {
        return Err(ChartError::InvalidConfig(
            "sankey node padding must be finite and >= 0".to_owned(),
        ));
    }

    let n = graph.nodes.len();
    if n == 0 {
        return Ok(SankeyLayout::default());
    }

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, link) in graph.links.iter().enumerate() {
        outgoing[link.source].push(i);
        incoming[link.target].push(i);
    }

    let values: Vec<f64> = (0..n)
        .map(|node| {
            let out: f64 = outgoing[node].iter().map(|&l| graph.links[l].value).sum();
            let inc: f64 = incoming[node].iter().map(|&l| graph.links[l].value).sum();
            out.max(inc)
        })
        .collect();

    let depths = propagate_levels(graph, n, |link| (link.source, link.target))?;
    let heights = propagate_levels(graph, n, |link| (link.target, link.source))?;

    let columns_count = depths.iter().copied().max().unwrap_or(0) + 1;
    let layers: Vec<usize> = (0..n)
        .map(|node| {
            let raw = match config.align {
                NodeAlign::Left => depths[node],
                NodeAlign::Right => columns_count.saturating_sub(1 + heights[node]),
                NodeAlign::Justify => {
                    if outgoing[node].is_empty() {
                        columns_count - 1
                    } else {
                        depths[node]
                    }
                }
                NodeAlign::Center => {
                    if !incoming[node].is_empty() {
                        depths[node]
                    } else if !outgoing[node].is_empty() {
                        outgoing[node]
                            .iter()
                            .map(|&l| depths[graph.links[l].target])
                            .min()
                            .unwrap_or(1)
                            .saturating_sub(1)
                    } else {
                        0
                    }
                }
            };
            raw.min(columns_count - 1)
        })
        .collect();

    let kx = if columns_count > 1 {
        (extent.width - config.node_width) / (columns_count - 1) as f64
    } else {
        0.0
    };

    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); columns_count];
    for (node, &layer) in layers.iter().enumerate() {
        columns[layer].push(node);
    }
    if let Some(direction) = config.node_sort {
        for column in &mut columns {
            column.sort_by(|&a, &b| direction.compare(values[a], values[b]));
        }
    }

    let ky = columns
        .iter()
        .filter_map(|column| {
            let total: f64 = column.iter().map(|&node| values[node]).sum();
            if total <= 0.0 {
                return None;
            }
            let free = extent.height - (column.len().saturating_sub(1)) as f64 * config.node_padding;
            Some(free / total)
        })
        .fold(f64::INFINITY, f64::min);
    let ky = if ky.is_finite() { ky.max(0.0) } else { 0.0 };

    let mut nodes: Vec<NodeLayout> = (0..n)
        .map(|node| {
            let x0 = extent.left + layers[node] as f64 * kx;
            NodeLayout {
                name: graph.nodes[node].name.clone(),
                value: values[node],
                depth: depths[node],
                height: heights[node],
                layer: layers[node],
                x0,
                x1: x0 + config.node_width,
                y0: 0.0,
                y1: 0.0,
            }
        })
        .collect();

    for column in &columns {
        let mut y = extent.top;
        for &node in column {
            nodes[node].y0 = y;
            nodes[node].y1 = y + values[node] * ky;
            y = nodes[node].y1 + config.node_padding;
        }
        // Spread leftover space evenly between the nodes of the column.
        let spare = (extent.bottom - y + config.node_padding) / (column.len() + 1) as f64;
        for (i, &node) in column.iter().enumerate() {
            let shift = spare * (i + 1) as f64;
            nodes[node].y0 += shift;
            nodes[node].y1 += shift;
        }
    }

    let mut links: Vec<LinkLayout> = graph
        .links
        .iter()
        .map(|link| LinkLayout {
            source: link.source,
            target: link.target,
            value: link.value,
            width: link.value * ky,
            y0: 0.0,
            y1: 0.0,
        })
        .collect();

    for node in 0..n {
        let mut out = outgoing[node].clone();
        let mut inc = incoming[node].clone();
        match config.link_sort {
            Some(direction) => {
                out.sort_by(|&a, &b| direction.compare(links[a].value, links[b].value));
                inc.sort_by(|&a, &b| direction.compare(links[a].value, links[b].value));
            }
            None => {
                out.sort_by(|&a, &b| nodes[links[a].target].y0.total_cmp(&nodes[links[b].target].y0));
                inc.sort_by(|&a, &b| nodes[links[a].source].y0.total_cmp(&nodes[links[b].source].y0));
            }
        }

        let mut y0 = nodes[node].y0;
        for l in out {
            links[l].y0 = y0 + links[l].width * 0.5;
            y0 += links[l].width;
        }
        let mut y1 = nodes[node].y0;
        for l in inc {
            links[l].y1 = y1 + links[l].width * 0.5;
            y1 += links[l].width;
        }
    }

    debug!(columns = columns_count, ky, "laid out sankey graph");
    Ok(SankeyLayout { nodes, links })
}

/// Breadth-first level assignment following `edge(link) = (from, to)`.
fn propagate_levels(
    graph: &SankeyGraph,
    n: usize,
    edge: impl Fn(&SankeyLink) -> (usize, usize),
) -> ChartResult<Vec<usize>> {
    let mut next_of: Vec<Vec<usize>> = vec![Vec::new(); n];
    for link in &graph.links {
        let (from, to) = edge(link);
        next_of[from].push(to);
    }

    let mut levels = vec![0; n];
    let mut current: VecDeque<usize> = (0..n).collect();
    let mut level = 0;
    while !current.is_empty() {
        let mut next = VecDeque::new();
        let mut queued = vec![false; n];
        for node in current {
            levels[node] = level;
            for &to in &next_of[node] {
                if !queued[to] {
                    queued[to] = true;
                    next.push_back(to);
                }
            }
        }
        level += 1;
        if level > n {
            let name = next
                .front()
                .map_or_else(String::new, |&node| graph.nodes[node].name.to_string());
            return Err(ChartError::CircularLink(name));
        }
        current = next;
    }
    Ok(levels)
}

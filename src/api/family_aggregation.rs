use serde::{Deserialize, Serialize};

use crate::core::{
    Frames, LineAggregation, PieAggregation, RecordSet, SankeyGraph, SankeyLayout,
    StackedAggregation, Value, aggregate_line, aggregate_pie, aggregate_stacked, build_sankey,
    layout_sankey,
};
use crate::error::ChartResult;

use super::{ChartConfig, ChartFamily};

/// Aggregated series of one chart family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum FamilyAggregation {
    StackedBar(StackedAggregation),
    Line(LineAggregation),
    Doughnut(PieAggregation),
    Sankey {
        graph: SankeyGraph,
        layout: SankeyLayout,
    },
}

impl FamilyAggregation {
    /// Runs the family's aggregation over already-filtered records.
    pub fn compute(config: &ChartConfig, records: &RecordSet, frames: &Frames) -> ChartResult<Self> {
        Ok(match config.family {
            ChartFamily::StackedBar => Self::StackedBar(aggregate_stacked(records, config.order)),
            ChartFamily::Line => Self::Line(aggregate_line(records)),
            ChartFamily::Doughnut => Self::Doughnut(aggregate_pie(records)),
            ChartFamily::Sankey => {
                let graph = build_sankey(records);
                let layout = layout_sankey(&graph, frames.data, config.sankey.layout_config())?;
                Self::Sankey { graph, layout }
            }
        })
    }

    #[must_use]
    pub fn family(&self) -> ChartFamily {
        match self {
            Self::StackedBar(_) => ChartFamily::StackedBar,
            Self::Line(_) => ChartFamily::Line,
            Self::Doughnut(_) => ChartFamily::Doughnut,
            Self::Sankey { .. } => ChartFamily::Sankey,
        }
    }

    /// Values bound to palette colors and legend entries, in domain order.
    #[must_use]
    pub fn color_domain(&self) -> Vec<Value> {
        match self {
            Self::StackedBar(stacked) => stacked.subgroups.values().to_vec(),
            Self::Line(line) => line.subgroups.values().to_vec(),
            Self::Doughnut(pie) => pie.groups.values().to_vec(),
            Self::Sankey { graph, .. } => graph.nodes.iter().map(|node| node.name.clone()).collect(),
        }
    }
}

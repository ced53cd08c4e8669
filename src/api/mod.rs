mod chart;
mod chart_config;
mod chart_snapshot;
mod config_registry;
mod doughnut_scene_builder;
mod family_aggregation;
mod json_contract;
mod line_scene_builder;
mod namespace;
mod sankey_scene_builder;
mod scene_context;
mod stacked_bar_scene_builder;

pub use chart::Chart;
pub use chart_config::{
    ChartConfig, ChartFamily, DoughnutConfig, SankeyConfig, SankeyLinkConfig, SankeyNodeConfig,
};
pub use chart_snapshot::ChartSnapshot;
pub use config_registry::ConfigRegistry;
pub use family_aggregation::FamilyAggregation;
pub use json_contract::{CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshotJsonContractV1};
pub use namespace::NamespaceAllocator;

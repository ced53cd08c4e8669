//! dashchart: configuration-driven chart data pipeline.
//!
//! Raw rows are mapped through typed accessors, aggregated per chart family
//! (stacked bar, line, doughnut, sankey), laid out inside nested frames and
//! bound to a backend-agnostic scene with legend, tooltip and filter overlays.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod store;
pub mod telemetry;

pub use api::{Chart, ChartConfig, ChartFamily, NamespaceAllocator};
pub use error::{ChartError, ChartResult};

pub mod accessor;
pub mod frame;
pub mod grouping;
pub mod kernel;
pub mod line;
pub mod mapper;
pub mod pie;
pub mod sankey;
pub mod scale;
pub mod stack_order;
pub mod stacked;
pub mod value;

pub use accessor::{Accessor, AccessorSpec, Role};
pub use frame::{Frames, Insets, Rect, Size, compute_frames};
pub use grouping::{
    Extent, ExtentAccumulator, FILTER_ALL, SubgroupFilter, UniqueValues, unique_values,
};
pub use kernel::{KernelDensity, KernelMethod};
pub use line::{LineAggregation, LinePoint, LineSeries, aggregate_line};
pub use mapper::{IssueKind, MappedRecord, RecordIssue, RecordKeying, RecordSet, Row, map_rows};
pub use pie::{PieAggregation, PieSlice, aggregate_pie};
pub use sankey::{
    LinkLayout, NodeAlign, NodeLayout, SankeyGraph, SankeyIssue, SankeyLayout,
    SankeyLayoutConfig, SankeyLink, SankeyNode, SortDirection, build_sankey, layout_sankey,
};
pub use scale::{BandScale, LinearScale, OrdinalScale};
pub use stack_order::StackOrder;
pub use stacked::{GroupTotals, StackCell, StackLayer, StackedAggregation, aggregate_stacked};
pub use value::{FieldType, Value, ValueKey, format_number, tokenize};

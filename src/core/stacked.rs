use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::accessor::Role;
use crate::core::grouping::{Extent, ExtentAccumulator, UniqueValues, unique_values};
use crate::core::mapper::RecordSet;
use crate::core::stack_order::StackOrder;
use crate::core::value::Value;

/// One subgroup segment of one group's stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackCell {
    pub group: Value,
    pub subgroup: Value,
    pub value: f64,
    pub from: f64,
    pub to: f64,
    /// `false` when no record carried this (group, subgroup) pair.
    pub present: bool,
}

/// All cells of one subgroup across groups, in group order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackLayer {
    pub subgroup: Value,
    pub cells: Vec<StackCell>,
}

/// Per-group sum (`max`) and smallest segment (`min`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub group: Value,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedAggregation {
    pub groups: UniqueValues,
    pub subgroups: UniqueValues,
    /// Subgroup indices in stacking order, bottom first.
    pub order: Vec<usize>,
    /// One layer per subgroup, in stacking order.
    pub layers: Vec<StackLayer>,
    pub totals: Vec<GroupTotals>,
    pub extent: Extent,
}

impl StackedAggregation {
    #[must_use]
    pub fn cell(&self, group: &Value, subgroup: &Value) -> Option<&StackCell> {
        let g = self.groups.position(group)?;
        let layer = self
            .layers
            .iter()
            .find(|layer| layer.subgroup.key() == subgroup.key())?;
        layer.cells.get(g)
    }

    #[must_use]
    pub fn totals_for(&self, group: &Value) -> Option<&GroupTotals> {
        self.groups.position(group).and_then(|g| self.totals.get(g))
    }
}

/// Groups records by `group`/`subgroup`, sums `value` per cell and stacks
/// cells per group in the order chosen by `order`.
///
/// Repeated (group, subgroup) pairs are summed. Non-finite values stack as 0.
#[must_use]
pub fn aggregate_stacked(records: &RecordSet, order: StackOrder) -> StackedAggregation {
    let groups = unique_values(records, Role::Group);
    let subgroups = unique_values(records, Role::Subgroup);

    let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; groups.len()]; subgroups.len()];
    for record in records.records() {
        let (Some(group), Some(subgroup)) = (
            records.value(record, Role::Group),
            records.value(record, Role::Subgroup),
        ) else {
            continue;
        };
        let (Some(g), Some(k)) = (groups.position(group), subgroups.position(subgroup)) else {
            continue;
        };
        let value = records
            .value(record, Role::Value)
            .map_or(f64::NAN, Value::number_or_nan);
        let value = if value.is_finite() { value } else { 0.0 };
        let cell = &mut cells[k][g];
        *cell = Some(cell.unwrap_or(0.0) + value);
    }

    let series: Vec<Vec<f64>> = cells
        .iter()
        .map(|row| row.iter().map(|c| c.unwrap_or(0.0)).collect())
        .collect();
    let stack_order = order.order(&series);

    let mut layers: Vec<StackLayer> = stack_order
        .iter()
        .map(|&k| StackLayer {
            subgroup: subgroups.values()[k].clone(),
            cells: Vec::with_capacity(groups.len()),
        })
        .collect();
    let mut totals = Vec::with_capacity(groups.len());
    let mut extent = ExtentAccumulator::default();

    for (g, group) in groups.values().iter().enumerate() {
        let mut offset = 0.0;
        let mut group_min = f64::INFINITY;
        for (layer, &k) in layers.iter_mut().zip(&stack_order) {
            let present = cells[k][g].is_some();
            let value = series[k][g];
            if present {
                group_min = group_min.min(value);
                extent.push_min(value);
            }
            layer.cells.push(StackCell {
                group: group.clone(),
                subgroup: layer.subgroup.clone(),
                value,
                from: offset,
                to: offset + value,
                present,
            });
            offset += value;
        }
        extent.push_max(offset);
        let min = if group_min.is_finite() { group_min } else { 0.0 };
        totals.push(GroupTotals {
            group: group.clone(),
            max: offset,
            min,
        });
    }

    debug!(
        groups = groups.len(),
        subgroups = subgroups.len(),
        ?order,
        "aggregated stacked series"
    );

    StackedAggregation {
        groups,
        subgroups,
        order: stack_order,
        layers,
        totals,
        extent: extent.finish(),
    }
}

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::accessor::Role;
use crate::core::grouping::{UniqueValues, unique_values};
use crate::core::mapper::RecordSet;
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: Value,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + (self.end_angle - self.start_angle) * 0.5
    }

    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieAggregation {
    pub groups: UniqueValues,
    pub slices: Vec<PieSlice>,
    pub total: f64,
}

/// Sums `value` per group and lays slices out contiguously from angle 0,
/// in group order. Values that are not positive take no angle.
#[must_use]
pub fn aggregate_pie(records: &RecordSet) -> PieAggregation {
    let groups = unique_values(records, Role::Group);
    let mut sums = vec![0.0_f64; groups.len()];
    for record in records.records() {
        let Some(g) = records
            .value(record, Role::Group)
            .and_then(|group| groups.position(group))
        else {
            continue;
        };
        let value = records
            .value(record, Role::Value)
            .map_or(f64::NAN, Value::number_or_nan);
        if value.is_finite() {
            sums[g] += value;
        }
    }

    let total: f64 = sums.iter().filter(|v| **v > 0.0).sum();
    let mut angle = 0.0;
    let slices = groups
        .values()
        .iter()
        .zip(&sums)
        .map(|(group, &value)| {
            let sweep = if total > 0.0 && value > 0.0 {
                value / total * TAU
            } else {
                0.0
            };
            let slice = PieSlice {
                label: group.clone(),
                value,
                start_angle: angle,
                end_angle: angle + sweep,
            };
            angle += sweep;
            slice
        })
        .collect::<Vec<_>>();

    debug!(slices = slices.len(), total, "aggregated pie slices");

    PieAggregation {
        groups,
        slices,
        total,
    }
}

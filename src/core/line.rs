use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::accessor::Role;
use crate::core::grouping::{Extent, ExtentAccumulator, UniqueValues, unique_values};
use crate::core::mapper::RecordSet;
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: Value,
    pub y: f64,
}

impl LinePoint {
    /// Numeric x position (epoch milliseconds for dates).
    #[must_use]
    pub fn x_position(&self) -> f64 {
        self.x.number_or_nan()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub subgroup: Value,
    /// Points ordered by x; points with an unusable x sort last.
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAggregation {
    pub subgroups: UniqueValues,
    pub series: Vec<LineSeries>,
    pub y_extent: Extent,
    /// Smallest and largest finite x, if any.
    pub x_domain: Option<(f64, f64)>,
}

/// Splits records into one x-ordered series per subgroup.
#[must_use]
pub fn aggregate_line(records: &RecordSet) -> LineAggregation {
    let subgroups = unique_values(records, Role::Subgroup);
    let mut series: Vec<LineSeries> = subgroups
        .values()
        .iter()
        .map(|subgroup| LineSeries {
            subgroup: subgroup.clone(),
            points: Vec::new(),
        })
        .collect();

    let mut y_extent = ExtentAccumulator::default();
    let mut x_domain: Option<(f64, f64)> = None;
    for record in records.records() {
        let Some(k) = records
            .value(record, Role::Subgroup)
            .and_then(|subgroup| subgroups.position(subgroup))
        else {
            continue;
        };
        let Some(x) = records.value(record, Role::X) else {
            continue;
        };
        let y = records
            .value(record, Role::Y)
            .map_or(f64::NAN, Value::number_or_nan);
        y_extent.push(y);

        let x_pos = x.number_or_nan();
        if x_pos.is_finite() {
            x_domain = Some(match x_domain {
                Some((lo, hi)) => (lo.min(x_pos), hi.max(x_pos)),
                None => (x_pos, x_pos),
            });
        }
        series[k].points.push(LinePoint { x: x.clone(), y });
    }

    for line in &mut series {
        // Stable: equal x keep input order.
        line.points.sort_by(|a, b| {
            let (ax, bx) = (a.x_position(), b.x_position());
            match (ax.is_nan(), bx.is_nan()) {
                (false, false) => ax.total_cmp(&bx),
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (true, true) => std::cmp::Ordering::Equal,
            }
        });
    }

    debug!(series = series.len(), "aggregated line series");

    LineAggregation {
        subgroups,
        series,
        y_extent: y_extent.finish(),
        x_domain,
    }
}

use serde::{Deserialize, Serialize};

/// Subgroup stacking order policy.
///
/// Every policy is a total order over subgroup keys; ties keep
/// first-occurrence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackOrder {
    /// Earliest peak (group index of the largest value) first.
    Appearance,
    /// Smallest series sum first.
    Ascending,
    /// Largest series sum first.
    Descending,
    /// Largest-peak series in the middle, alternating outwards.
    InsideOut,
    /// Reverse of first-occurrence order.
    Reverse,
    /// First-occurrence order.
    #[default]
    None,
}

impl StackOrder {
    /// Computes the stacking order for `series`, where `series[k][g]` is the
    /// value of subgroup `k` in group `g`. Returns subgroup indices,
    /// bottom of the stack first.
    #[must_use]
    pub fn order(self, series: &[Vec<f64>]) -> Vec<usize> {
        let natural: Vec<usize> = (0..series.len()).collect();
        match self {
            Self::None => natural,
            Self::Reverse => natural.into_iter().rev().collect(),
            Self::Ascending => {
                let sums: Vec<f64> = series.iter().map(|s| series_sum(s)).collect();
                let mut order = natural;
                order.sort_by(|&a, &b| sums[a].total_cmp(&sums[b]));
                order
            }
            Self::Descending => {
                let sums: Vec<f64> = series.iter().map(|s| series_sum(s)).collect();
                let mut order = natural;
                order.sort_by(|&a, &b| sums[b].total_cmp(&sums[a]));
                order
            }
            Self::Appearance => appearance(series),
            Self::InsideOut => inside_out(series),
        }
    }
}

fn series_sum(values: &[f64]) -> f64 {
    values.iter().filter(|v| v.is_finite()).sum()
}

fn peak_index(values: &[f64]) -> usize {
    let mut best = f64::NEG_INFINITY;
    let mut index = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best = v;
            index = i;
        }
    }
    index
}

fn appearance(series: &[Vec<f64>]) -> Vec<usize> {
    let peaks: Vec<usize> = series.iter().map(|s| peak_index(s)).collect();
    let mut order: Vec<usize> = (0..series.len()).collect();
    order.sort_by_key(|&k| peaks[k]);
    order
}

fn inside_out(series: &[Vec<f64>]) -> Vec<usize> {
    let sums: Vec<f64> = series.iter().map(|s| series_sum(s)).collect();
    let mut top = 0.0;
    let mut bottom = 0.0;
    let mut tops = Vec::new();
    let mut bottoms = Vec::new();
    for k in appearance(series) {
        if top < bottom {
            top += sums[k];
            tops.push(k);
        } else {
            bottom += sums[k];
            bottoms.push(k);
        }
    }
    bottoms.reverse();
    bottoms.extend(tops);
    bottoms
}

use indexmap::IndexMap;

use crate::core::value::{Value, ValueKey};
use crate::error::{ChartError, ChartResult};

/// Continuous `domain -> range` mapping.
///
/// Also used for time axes, with the domain in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps a domain value to the range. A collapsed domain maps to the range midpoint.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return (self.range_start + self.range_end) * 0.5;
        }
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Round tick values (1, 2 or 5 times a power of ten) covering the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (mut lo, mut hi) = self.domain();
        if count == 0 || lo == hi {
            return if count == 0 { Vec::new() } else { vec![lo] };
        }
        let reversed = hi < lo;
        if reversed {
            std::mem::swap(&mut lo, &mut hi);
        }

        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        let mut ticks: Vec<f64> = (first..=last).map(|i| i as f64 * step).collect();
        if reversed {
            ticks.reverse();
        }
        ticks
    }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10_f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50_f64.sqrt() {
        10.0
    } else if error >= 10_f64.sqrt() {
        5.0
    } else if error >= 2_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Discrete domain mapped to evenly spaced bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<ValueKey>,
    range_start: f64,
    range_end: f64,
    padding_inner: f64,
}

impl BandScale {
    pub fn new(domain: &[Value], range: (f64, f64), padding_inner: f64) -> ChartResult<Self> {
        if !(0.0..=1.0).contains(&padding_inner) {
            return Err(ChartError::InvalidConfig(
                "band padding must be in [0, 1]".to_owned(),
            ));
        }
        Ok(Self {
            domain: domain.iter().filter_map(Value::key).collect(),
            range_start: range.0,
            range_end: range.1,
            padding_inner,
        })
    }

    fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let extent = self.range_end - self.range_start;
        // No outer padding: n bands and n-1 inner gaps fill the range.
        extent / (n - self.padding_inner).max(1.0)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        (self.step() * (1.0 - self.padding_inner)).abs()
    }

    /// Start of the band for `value`, if it is in the domain.
    #[must_use]
    pub fn position(&self, value: &Value) -> Option<f64> {
        let key = value.key()?;
        let index = self.domain.iter().position(|k| *k == key)?;
        let step = self.step();
        let start = self.range_start + index as f64 * step;
        // Reversed ranges place bands from the end, keeping `position` the low edge.
        if step < 0.0 {
            Some(start + step * (1.0 - self.padding_inner))
        } else {
            Some(start)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }
}

/// Discrete domain mapped onto a palette.
///
/// Unknown values are appended to the domain on first use and colors wrap
/// when the domain outgrows the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalScale {
    domain: IndexMap<ValueKey, usize>,
    palette: Vec<String>,
}

impl OrdinalScale {
    #[must_use]
    pub fn new(domain: &[Value], palette: Vec<String>) -> Self {
        let mut scale = Self {
            domain: IndexMap::new(),
            palette,
        };
        for value in domain {
            scale.register(value);
        }
        scale
    }

    fn register(&mut self, value: &Value) -> Option<usize> {
        let key = value.key()?;
        let next = self.domain.len();
        Some(*self.domain.entry(key).or_insert(next))
    }

    /// Palette entry for `value`; `None` for an empty palette or an unkeyable value.
    pub fn color(&mut self, value: &Value) -> Option<&str> {
        if self.palette.is_empty() {
            return None;
        }
        let index = self.register(value)?;
        self.palette
            .get(index % self.palette.len())
            .map(String::as_str)
    }

    /// Looks a color up without extending the domain.
    #[must_use]
    pub fn peek(&self, value: &Value) -> Option<&str> {
        if self.palette.is_empty() {
            return None;
        }
        let index = *self.domain.get(&value.key()?)?;
        self.palette
            .get(index % self.palette.len())
            .map(String::as_str)
    }

    #[must_use]
    pub fn domain_len(&self) -> usize {
        self.domain.len()
    }
}

use serde::Serialize;
use std::fmt;

/// Streaming summary of a sequence of observations.
///
/// Only the running count, sum, sum of squares and extrema are kept, so the
/// accumulator stays O(1) in space however many values are folded in.
/// Values are never rounded here; see [`CumulativeStatistics::summary`] for
/// the display form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CumulativeStatistics {
    count: u64,
    sum: f64,
    sum_of_squares: f64,
    min: f64,
    max: f64,
}

impl CumulativeStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, value: f64) {
        if self.count == 0 || value > self.max {
            self.max = value;
        }
        if self.count == 0 || value < self.min {
            self.min = value;
        }
        self.sum += value;
        self.sum_of_squares += value * value;
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Population standard deviation, floored at zero when cancellation
    /// leaves a slightly negative variance.
    pub fn standard_deviation(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self.sum_of_squares / self.count as f64 - mean * mean;
        variance.max(0.0).sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn summary(&self) -> StatisticsSummary {
        StatisticsSummary {
            count: self.count,
            mean: round2(self.mean()),
            standard_deviation: round2(self.standard_deviation()),
            min: round2(self.min),
            max: round2(self.max),
        }
    }
}

impl fmt::Display for CumulativeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[N={}, min={:.2}, max={:.2}, mean={:.2}, sigma={:.2}]",
            self.count,
            self.min,
            self.max,
            self.mean(),
            self.standard_deviation()
        )
    }
}

/// Rounded, serializable view of a [`CumulativeStatistics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub count: u64,
    pub mean: f64,
    pub standard_deviation: f64,
    pub min: f64,
    pub max: f64,
}

/// Round half-up to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

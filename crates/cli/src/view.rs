use batchlens_core::history::CumulativeStatistics;
use tabled::Tabled;

/// One statistic of a step history, rounded for display.
#[derive(Tabled)]
pub struct StatisticsRow {
    #[tabled(rename = "Statistic")]
    pub name: String,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Mean")]
    pub mean: f64,
    #[tabled(rename = "Std Dev")]
    pub standard_deviation: f64,
    #[tabled(rename = "Min")]
    pub min: f64,
    #[tabled(rename = "Max")]
    pub max: f64,
}

impl StatisticsRow {
    pub fn new(name: &str, stats: &CumulativeStatistics) -> Self {
        let summary = stats.summary();
        Self {
            name: name.to_string(),
            count: summary.count,
            mean: summary.mean,
            standard_deviation: summary.standard_deviation,
            min: summary.min,
            max: summary.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_rounded() {
        let mut stats = CumulativeStatistics::new();
        stats.append(1.0);
        stats.append(2.0);
        stats.append(2.0);
        let row = StatisticsRow::new("duration", &stats);
        assert_eq!(row.count, 3);
        assert_eq!(row.mean, 1.67);
        assert_eq!(row.min, 1.0);
        assert_eq!(row.max, 2.0);
    }
}

use hearth_core::{Confidence, Frequency, Transaction};

use crate::group::CandidateSeries;

/// Inclusive median-interval bands in days. Medians between bands are not classified.
pub const DAILY_BAND: (f64, f64) = (0.5, 2.0);
pub const WEEKLY_BAND: (f64, f64) = (4.0, 10.0);
pub const MONTHLY_BAND: (f64, f64) = (20.0, 45.0);
pub const YEARLY_BAND: (f64, f64) = (300.0, 400.0);

/// Interval standard deviation (days) below which a series counts as regular.
pub const REGULAR_STD_DEV_DAYS: f64 = 4.0;

pub const MIN_OCCURRENCES: usize = 2;
const ESTABLISHED_OCCURRENCES: usize = 3;

/// A candidate series with its cadence and confidence.
#[derive(Debug, Clone)]
pub struct ClassifiedSeries {
    pub series: CandidateSeries,
    pub intervals: Vec<f64>,
    pub median_interval: f64,
    pub std_dev: f64,
    pub frequency: Frequency,
    pub confidence: Confidence,
}

/// Day gaps between consecutive transactions. Out-of-order input yields negative gaps.
pub fn intervals(transactions: &[Transaction]) -> Vec<f64> {
    transactions
        .windows(2)
        .map(|w| (w[1].value_date - w[0].value_date).num_days() as f64)
        .collect()
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation; 0 for fewer than two values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn in_band(value: f64, (low, high): (f64, f64)) -> bool {
    value >= low && value <= high
}

pub fn frequency_for_median(median_interval: f64) -> Option<Frequency> {
    if in_band(median_interval, DAILY_BAND) {
        Some(Frequency::Daily)
    } else if in_band(median_interval, WEEKLY_BAND) {
        Some(Frequency::Weekly)
    } else if in_band(median_interval, MONTHLY_BAND) {
        Some(Frequency::Monthly)
    } else if in_band(median_interval, YEARLY_BAND) {
        Some(Frequency::Yearly)
    } else {
        None
    }
}

/// Three or more occurrences always reach `Medium`; two only when the gap is tight.
pub fn score_confidence(occurrences: usize, std_dev: f64) -> Confidence {
    let regular = std_dev < REGULAR_STD_DEV_DAYS;
    match occurrences {
        n if n >= ESTABLISHED_OCCURRENCES && regular => Confidence::High,
        n if n >= ESTABLISHED_OCCURRENCES => Confidence::Medium,
        2 if regular => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// Classifies one series, or `None` when it is too short or its median falls
/// outside every band.
pub fn classify_series(series: CandidateSeries) -> Option<ClassifiedSeries> {
    if series.occurrences() < MIN_OCCURRENCES {
        return None;
    }

    let intervals = intervals(&series.transactions);
    let median_interval = median(&intervals);
    let frequency = frequency_for_median(median_interval)?;
    let std_dev = population_std_dev(&intervals);
    let confidence = score_confidence(series.occurrences(), std_dev);

    Some(ClassifiedSeries {
        series,
        intervals,
        median_interval,
        std_dev,
        frequency,
        confidence,
    })
}

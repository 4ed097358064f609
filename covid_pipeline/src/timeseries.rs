//! National time-series normalization
//!
//! Turns a raw date → cumulative-count timeline into an ordered, gap-free daily
//! record set with daily deltas, centered 7-day rolling averages and the
//! fatality rate.

use crate::data::{DatedCounts, RawTimeline};
use crate::error::{PipelineError, Result};
use crate::utils::{date_parser, guarded_rate};
use chrono::NaiveDate;
use eda_math::centered_rolling_mean;
use serde::Serialize;
use std::collections::BTreeMap;

/// Width of the centered rolling average, in days
pub const ROLLING_WINDOW_DAYS: usize = 7;

/// One day of the national series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRecord {
    pub date: NaiveDate,
    pub cumulative_cases: u64,
    pub cumulative_deaths: u64,
    /// Present only when the raw timeline carried a recovered series
    pub cumulative_recovered: Option<u64>,
    pub daily_new_cases: i64,
    pub daily_new_deaths: i64,
    pub daily_new_recovered: Option<i64>,
    /// Centered 7-day mean of `daily_new_cases`; `None` near either end
    pub cases_7day_avg: Option<f64>,
    /// Centered 7-day mean of `daily_new_deaths`; `None` near either end
    pub deaths_7day_avg: Option<f64>,
    pub fatality_rate_pct: f64,
}

/// Ordered national series produced by [`normalize_timeline`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NationalTimeSeries {
    records: Vec<TimeSeriesRecord>,
    has_recovered: bool,
}

impl NationalTimeSeries {
    /// Records in ascending date order
    pub fn records(&self) -> &[TimeSeriesRecord] {
        &self.records
    }

    /// Whether the recovered columns are populated
    pub fn has_recovered(&self) -> bool {
        self.has_recovered
    }

    /// Number of days in the series
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records in date order
    pub fn iter(&self) -> std::slice::Iter<'_, TimeSeriesRecord> {
        self.records.iter()
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&TimeSeriesRecord> {
        self.records.last()
    }

    /// First and last date covered
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    /// Day with the largest number of new cases (earliest on ties)
    pub fn peak_daily_cases(&self) -> Option<&TimeSeriesRecord> {
        self.records.iter().reduce(|best, r| {
            if r.daily_new_cases > best.daily_new_cases {
                r
            } else {
                best
            }
        })
    }

    /// The most recent `n` days, or the whole series when it is shorter
    pub fn last_days(&self, n: usize) -> &[TimeSeriesRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    /// Records from the first day whose cumulative cases exceed `threshold` onwards.
    ///
    /// Empty when no day crosses the threshold.
    pub fn since_cases_above(&self, threshold: u64) -> &[TimeSeriesRecord] {
        let start = self
            .records
            .iter()
            .position(|r| r.cumulative_cases > threshold)
            .unwrap_or(self.records.len());
        &self.records[start..]
    }
}

impl<'a> IntoIterator for &'a NationalTimeSeries {
    type Item = &'a TimeSeriesRecord;
    type IntoIter = std::slice::Iter<'a, TimeSeriesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Cumulative counts for one parsed date
#[derive(Debug, Clone, Copy)]
struct DayCounts {
    cases: u64,
    deaths: u64,
    recovered: Option<u64>,
}

/// Normalize a raw timeline into a [`NationalTimeSeries`].
///
/// An empty timeline yields an empty series. Unparseable dates, mismatched key sets
/// between the series, two keys naming the same day, and missing days inside the
/// range are rejected as [`PipelineError::MalformedInput`].
pub fn normalize_timeline(raw: &RawTimeline) -> Result<NationalTimeSeries> {
    if raw.is_empty() {
        return Ok(NationalTimeSeries::default());
    }

    let days = parse_days(raw)?;
    ensure_contiguous(&days)?;

    let has_recovered = raw.recovered.is_some();
    let daily_cases = successive_differences("cases", days.values().map(|d| d.cases))?;
    let daily_deaths = successive_differences("deaths", days.values().map(|d| d.deaths))?;
    let daily_recovered = if has_recovered {
        Some(successive_differences(
            "recovered",
            days.values().map(|d| d.recovered.unwrap_or_default()),
        )?)
    } else {
        None
    };

    let cases_avg = centered_rolling_mean(&as_f64(&daily_cases), ROLLING_WINDOW_DAYS)?;
    let deaths_avg = centered_rolling_mean(&as_f64(&daily_deaths), ROLLING_WINDOW_DAYS)?;

    let records = days
        .iter()
        .enumerate()
        .map(|(i, (&date, counts))| TimeSeriesRecord {
            date,
            cumulative_cases: counts.cases,
            cumulative_deaths: counts.deaths,
            cumulative_recovered: counts.recovered,
            daily_new_cases: daily_cases[i],
            daily_new_deaths: daily_deaths[i],
            daily_new_recovered: daily_recovered.as_ref().map(|d| d[i]),
            cases_7day_avg: cases_avg[i],
            deaths_7day_avg: deaths_avg[i],
            fatality_rate_pct: guarded_rate(counts.deaths as f64, counts.cases as f64, 100.0),
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Normalized national timeline: {} days, recovered {}",
        records.len(),
        if has_recovered { "present" } else { "absent" }
    );

    Ok(NationalTimeSeries {
        records,
        has_recovered,
    })
}

/// Parse every date key and join the series on it, sorted by date
fn parse_days(raw: &RawTimeline) -> Result<BTreeMap<NaiveDate, DayCounts>> {
    ensure_same_length("deaths", &raw.cases, &raw.deaths)?;
    if let Some(recovered) = &raw.recovered {
        ensure_same_length("recovered", &raw.cases, recovered)?;
    }

    let mut days = BTreeMap::new();
    for (key, &cases) in &raw.cases {
        let date = date_parser::parse_date(key)?;
        let deaths = lookup("deaths", &raw.deaths, key)?;
        let recovered = match &raw.recovered {
            Some(series) => Some(lookup("recovered", series, key)?),
            None => None,
        };

        let counts = DayCounts {
            cases,
            deaths,
            recovered,
        };
        if days.insert(date, counts).is_some() {
            return Err(PipelineError::MalformedInput(format!(
                "Date {} appears more than once (key '{}')",
                date, key
            )));
        }
    }

    Ok(days)
}

fn ensure_same_length(name: &str, cases: &DatedCounts, other: &DatedCounts) -> Result<()> {
    if cases.len() != other.len() {
        return Err(PipelineError::MalformedInput(format!(
            "Series 'cases' has {} dates but '{}' has {}",
            cases.len(),
            name,
            other.len()
        )));
    }
    Ok(())
}

fn lookup(name: &str, series: &DatedCounts, key: &str) -> Result<u64> {
    series.get(key).copied().ok_or_else(|| {
        PipelineError::MalformedInput(format!(
            "Date '{}' is present in 'cases' but missing from '{}'",
            key, name
        ))
    })
}

fn ensure_contiguous(days: &BTreeMap<NaiveDate, DayCounts>) -> Result<()> {
    let dates: Vec<&NaiveDate> = days.keys().collect();
    for pair in dates.windows(2) {
        let (prev, next) = (*pair[0], *pair[1]);
        if prev.succ_opt() != Some(next) {
            return Err(PipelineError::MalformedInput(format!(
                "Timeline has a gap between {} and {}",
                prev, next
            )));
        }
    }
    Ok(())
}

/// Day-over-day differences; the first element is defined as 0.
///
/// Counts above `i64::MAX` have no signed delta and are rejected.
fn successive_differences(
    series: &str,
    cumulative: impl Iterator<Item = u64>,
) -> Result<Vec<i64>> {
    let mut previous: Option<i64> = None;
    let mut deltas = Vec::new();

    for value in cumulative {
        let value = i64::try_from(value).map_err(|_| {
            PipelineError::MalformedInput(format!(
                "Cumulative {} count {} is out of range",
                series, value
            ))
        })?;
        // Both operands are non-negative, so the difference cannot overflow
        deltas.push(previous.map_or(0, |p| value - p));
        previous = Some(value);
    }

    Ok(deltas)
}

fn as_f64(values: &[i64]) -> Vec<f64> {
    values.iter().map(|&v| v as f64).collect()
}

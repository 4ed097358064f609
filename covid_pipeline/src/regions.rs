//! Regional snapshot normalization
//!
//! Converts raw per-region records into a cleaned table of [`RegionSnapshot`]s
//! with per-capita and fatality rates. Rows that cannot produce valid rates are
//! removed from the working set instead of being carried as zeros.

use crate::data::RawRegionRecord;
use crate::error::{PipelineError, Result};
use crate::utils::guarded_rate;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Per-capita rates are expressed per this many residents
pub const PER_CAPITA_SCALE: f64 = 100_000.0;

/// Scale of the per-million rates
pub const PER_MILLION_SCALE: f64 = 1_000_000.0;

/// One cleaned region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSnapshot {
    pub region_name: String,
    pub population: u64,
    pub cumulative_cases: u64,
    pub cumulative_deaths: u64,
    pub cases_per_100k: f64,
    pub deaths_per_100k: f64,
    pub cases_per_million: f64,
    pub deaths_per_million: f64,
    pub fatality_rate_pct: f64,
}

impl RegionSnapshot {
    /// Value of a numeric column for this region
    pub fn value(&self, column: RegionColumn) -> f64 {
        match column {
            RegionColumn::Population => self.population as f64,
            RegionColumn::CumulativeCases => self.cumulative_cases as f64,
            RegionColumn::CumulativeDeaths => self.cumulative_deaths as f64,
            RegionColumn::CasesPer100k => self.cases_per_100k,
            RegionColumn::DeathsPer100k => self.deaths_per_100k,
            RegionColumn::CasesPerMillion => self.cases_per_million,
            RegionColumn::DeathsPerMillion => self.deaths_per_million,
            RegionColumn::FatalityRatePct => self.fatality_rate_pct,
        }
    }

    fn derived_rates_are_finite(&self) -> bool {
        [
            self.cases_per_100k,
            self.deaths_per_100k,
            self.cases_per_million,
            self.deaths_per_million,
            self.fatality_rate_pct,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Numeric columns of a [`RegionTable`], addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionColumn {
    Population,
    CumulativeCases,
    CumulativeDeaths,
    CasesPer100k,
    DeathsPer100k,
    CasesPerMillion,
    DeathsPerMillion,
    FatalityRatePct,
}

impl RegionColumn {
    /// Every numeric column, in export order
    pub const ALL: [RegionColumn; 8] = [
        RegionColumn::Population,
        RegionColumn::CumulativeCases,
        RegionColumn::CumulativeDeaths,
        RegionColumn::CasesPer100k,
        RegionColumn::DeathsPer100k,
        RegionColumn::CasesPerMillion,
        RegionColumn::DeathsPerMillion,
        RegionColumn::FatalityRatePct,
    ];

    /// Canonical column name
    pub fn name(&self) -> &'static str {
        match self {
            RegionColumn::Population => "population",
            RegionColumn::CumulativeCases => "cumulative_cases",
            RegionColumn::CumulativeDeaths => "cumulative_deaths",
            RegionColumn::CasesPer100k => "cases_per_100k",
            RegionColumn::DeathsPer100k => "deaths_per_100k",
            RegionColumn::CasesPerMillion => "cases_per_million",
            RegionColumn::DeathsPerMillion => "deaths_per_million",
            RegionColumn::FatalityRatePct => "fatality_rate_pct",
        }
    }
}

impl fmt::Display for RegionColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegionColumn {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "population" => Ok(RegionColumn::Population),
            "cumulative_cases" | "cases" => Ok(RegionColumn::CumulativeCases),
            "cumulative_deaths" | "deaths" => Ok(RegionColumn::CumulativeDeaths),
            "cases_per_100k" => Ok(RegionColumn::CasesPer100k),
            "deaths_per_100k" => Ok(RegionColumn::DeathsPer100k),
            "cases_per_million" => Ok(RegionColumn::CasesPerMillion),
            "deaths_per_million" => Ok(RegionColumn::DeathsPerMillion),
            "fatality_rate_pct" | "fatality_rate" => Ok(RegionColumn::FatalityRatePct),
            other => Err(PipelineError::UnknownColumn(other.to_string())),
        }
    }
}

/// Cleaned regional table, unique by region name, in first-seen input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTable {
    rows: Vec<RegionSnapshot>,
}

impl RegionTable {
    /// Rows of the table
    pub fn rows(&self) -> &[RegionSnapshot] {
        &self.rows
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the regions
    pub fn iter(&self) -> std::slice::Iter<'_, RegionSnapshot> {
        self.rows.iter()
    }

    /// Find a region by name
    pub fn get(&self, region_name: &str) -> Option<&RegionSnapshot> {
        self.rows.iter().find(|r| r.region_name == region_name)
    }

    /// Values of a column by name, failing with `UnknownColumn` for a bad name
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.column_values(name.parse()?))
    }

    /// Values of a typed column, in row order
    pub fn column_values(&self, column: RegionColumn) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a RegionSnapshot;
    type IntoIter = std::slice::Iter<'a, RegionSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Why a raw record did not make it into the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    EmptyName,
    MissingCounts,
    NegativeCounts,
    InvalidPopulation,
    NonFiniteRate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::EmptyName => "empty region name",
            Rejection::MissingCounts => "missing cases or deaths",
            Rejection::NegativeCounts => "negative cases or deaths",
            Rejection::InvalidPopulation => "missing or non-positive population",
            Rejection::NonFiniteRate => "non-finite derived rate",
        };
        f.write_str(reason)
    }
}

/// Normalize raw regional records into a [`RegionTable`].
///
/// Empty input gives an empty table. Records without a usable name, counts or
/// population, and records whose derived rates are not finite, are dropped. When a
/// region name repeats, the first record wins.
pub fn normalize_regions(records: &[RawRegionRecord]) -> RegionTable {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let snapshot = match derive_snapshot(record) {
            Ok(snapshot) => snapshot,
            Err(reason) => {
                log::debug!("Dropping region '{}': {}", record.region_name, reason);
                continue;
            }
        };

        if !seen.insert(snapshot.region_name.clone()) {
            log::warn!(
                "Duplicate region '{}' ignored; keeping the first record",
                snapshot.region_name
            );
            continue;
        }

        rows.push(snapshot);
    }

    log::debug!(
        "Normalized regional snapshot: {} of {} records kept",
        rows.len(),
        records.len()
    );

    RegionTable { rows }
}

fn derive_snapshot(record: &RawRegionRecord) -> std::result::Result<RegionSnapshot, Rejection> {
    let region_name = record.region_name.trim();
    if region_name.is_empty() {
        return Err(Rejection::EmptyName);
    }

    let (cases, deaths) = match (record.cases, record.deaths) {
        (Some(cases), Some(deaths)) => (cases, deaths),
        _ => return Err(Rejection::MissingCounts),
    };
    let cases = u64::try_from(cases).map_err(|_| Rejection::NegativeCounts)?;
    let deaths = u64::try_from(deaths).map_err(|_| Rejection::NegativeCounts)?;

    let population = match record.population {
        Some(p) if p > 0 => p as u64,
        _ => return Err(Rejection::InvalidPopulation),
    };

    let snapshot = RegionSnapshot {
        region_name: region_name.to_string(),
        population,
        cumulative_cases: cases,
        cumulative_deaths: deaths,
        cases_per_100k: cases as f64 / population as f64 * PER_CAPITA_SCALE,
        deaths_per_100k: deaths as f64 / population as f64 * PER_CAPITA_SCALE,
        cases_per_million: cases as f64 / population as f64 * PER_MILLION_SCALE,
        deaths_per_million: deaths as f64 / population as f64 * PER_MILLION_SCALE,
        fatality_rate_pct: guarded_rate(deaths as f64, cases as f64, 100.0),
    };

    // Final scrub for anything the explicit guards above did not anticipate
    if !snapshot.derived_rates_are_finite() {
        return Err(Rejection::NonFiniteRate);
    }

    Ok(snapshot)
}

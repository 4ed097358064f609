//! Descriptive metrics for the cleaned tables

use crate::error::Result;
use crate::regions::{RegionColumn, RegionSnapshot, RegionTable};
use crate::timeseries::NationalTimeSeries;
use chrono::NaiveDate;
use eda_math::{finite_values, pearson, Summary};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Summary statistics of one regional column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: RegionColumn,
    pub summary: Summary,
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.column)?;
        write!(f, "{}", self.summary)
    }
}

/// Describe a column: count, mean, median, std-dev, min, max and quartiles
pub fn describe(table: &RegionTable, column: &str) -> Result<ColumnSummary> {
    let column: RegionColumn = column.parse()?;
    let values = finite_values(&table.column_values(column));

    Ok(ColumnSummary {
        column,
        summary: Summary::of(&values)?,
    })
}

/// Pairwise Pearson coefficients between regional columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<RegionColumn>,
    /// Row-major coefficients; `None` where the coefficient is undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two columns, if both are in the matrix and it is defined
    pub fn get(&self, a: RegionColumn, b: RegionColumn) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>20}", "")?;
        for column in &self.columns {
            write!(f, " {:>18}", column.name())?;
        }
        writeln!(f)?;
        for (column, row) in self.columns.iter().zip(&self.values) {
            write!(f, "{:>20}", column.name())?;
            for value in row {
                match value {
                    Some(r) => write!(f, " {:>18.3}", r)?,
                    None => write!(f, " {:>18}", "n/a")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Correlation matrix over the named columns
pub fn correlation_matrix(table: &RegionTable, columns: &[&str]) -> Result<CorrelationMatrix> {
    let columns = columns
        .iter()
        .map(|name| name.parse::<RegionColumn>())
        .collect::<Result<Vec<_>>>()?;
    let data: Vec<Vec<f64>> = columns.iter().map(|c| table.column_values(*c)).collect();

    let values = data
        .iter()
        .map(|x| data.iter().map(|y| pearson(x, y).ok()).collect())
        .collect();

    Ok(CorrelationMatrix { columns, values })
}

/// The `n` regions with the largest values in `column`, ties broken by name
pub fn top_n<'a>(
    table: &'a RegionTable,
    column: &str,
    n: usize,
) -> Result<Vec<&'a RegionSnapshot>> {
    let column: RegionColumn = column.parse()?;
    let mut rows: Vec<&RegionSnapshot> = table.iter().collect();

    rows.sort_by(|a, b| {
        b.value(column)
            .partial_cmp(&a.value(column))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.region_name.cmp(&b.region_name))
    });
    rows.truncate(n);

    Ok(rows)
}

/// Headline figures for the executive report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub days_analyzed: usize,
    pub total_cases: Option<u64>,
    pub total_deaths: Option<u64>,
    pub total_recovered: Option<u64>,
    pub final_fatality_rate_pct: Option<f64>,
    pub peak_daily_cases: Option<(NaiveDate, i64)>,
    pub regions_analyzed: usize,
    pub most_affected_region: Option<String>,
    pub most_affected_region_cases: Option<u64>,
}

impl ExecutiveSummary {
    /// Build the summary from the normalized national series and regional table
    pub fn build(series: &NationalTimeSeries, regions: &RegionTable) -> Self {
        let latest = series.latest();
        let period = series.period();
        let most_affected = regions.iter().reduce(|best, r| {
            if r.cumulative_cases > best.cumulative_cases {
                r
            } else {
                best
            }
        });

        Self {
            period_start: period.map(|(start, _)| start),
            period_end: period.map(|(_, end)| end),
            days_analyzed: series.len(),
            total_cases: latest.map(|r| r.cumulative_cases),
            total_deaths: latest.map(|r| r.cumulative_deaths),
            total_recovered: latest.and_then(|r| r.cumulative_recovered),
            final_fatality_rate_pct: latest.map(|r| r.fatality_rate_pct),
            peak_daily_cases: series
                .peak_daily_cases()
                .map(|r| (r.date, r.daily_new_cases)),
            regions_analyzed: regions.len(),
            most_affected_region: most_affected.map(|r| r.region_name.clone()),
            most_affected_region_cases: most_affected.map(|r| r.cumulative_cases),
        }
    }
}

impl fmt::Display for ExecutiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Executive Summary:")?;
        if let (Some(start), Some(end)) = (self.period_start, self.period_end) {
            writeln!(f, "  Period:            {} to {} ({} days)", start, end, self.days_analyzed)?;
        }
        if let Some(cases) = self.total_cases {
            writeln!(f, "  Total cases:       {}", cases)?;
        }
        if let Some(deaths) = self.total_deaths {
            writeln!(f, "  Total deaths:      {}", deaths)?;
        }
        if let Some(recovered) = self.total_recovered {
            writeln!(f, "  Total recovered:   {}", recovered)?;
        }
        if let Some(rate) = self.final_fatality_rate_pct {
            writeln!(f, "  Fatality rate:     {:.2}%", rate)?;
        }
        if let Some((date, cases)) = self.peak_daily_cases {
            writeln!(f, "  Peak daily cases:  {} on {}", cases, date)?;
        }
        writeln!(f, "  Regions analyzed:  {}", self.regions_analyzed)?;
        if let (Some(region), Some(cases)) =
            (&self.most_affected_region, self.most_affected_region_cases)
        {
            writeln!(f, "  Most affected:     {} ({} cases)", region, cases)?;
        }
        Ok(())
    }
}

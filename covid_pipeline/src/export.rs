//! Flat snapshots of the normalized tables
//!
//! CSV files with a header row of column names, one row per date or region, and
//! polars `DataFrame` views for rendering collaborators. Absent optional values are
//! written as empty fields; the recovered columns only appear when the series has
//! them.

use crate::error::Result;
use crate::regions::{RegionColumn, RegionTable};
use crate::timeseries::{NationalTimeSeries, TimeSeriesRecord};
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Time-series column names, in export order
pub fn time_series_columns(has_recovered: bool) -> Vec<&'static str> {
    let mut columns = vec!["date", "cumulative_cases", "cumulative_deaths"];
    if has_recovered {
        columns.push("cumulative_recovered");
    }
    columns.extend(["daily_new_cases", "daily_new_deaths"]);
    if has_recovered {
        columns.push("daily_new_recovered");
    }
    columns.extend(["cases_7day_avg", "deaths_7day_avg", "fatality_rate_pct"]);
    columns
}

/// Regional column names, in export order
pub fn region_columns() -> Vec<&'static str> {
    let mut columns = vec!["region_name"];
    columns.extend(RegionColumn::ALL.iter().map(|c| c.name()));
    columns
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn time_series_row(record: &TimeSeriesRecord, has_recovered: bool) -> Vec<String> {
    let mut row = vec![
        record.date.format("%Y-%m-%d").to_string(),
        record.cumulative_cases.to_string(),
        record.cumulative_deaths.to_string(),
    ];
    if has_recovered {
        row.push(optional(record.cumulative_recovered));
    }
    row.push(record.daily_new_cases.to_string());
    row.push(record.daily_new_deaths.to_string());
    if has_recovered {
        row.push(optional(record.daily_new_recovered));
    }
    row.push(optional(record.cases_7day_avg));
    row.push(optional(record.deaths_7day_avg));
    row.push(record.fatality_rate_pct.to_string());
    row
}

/// Write the national series as CSV to any writer
pub fn write_time_series<W: Write>(series: &NationalTimeSeries, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(time_series_columns(series.has_recovered()))?;
    for record in series {
        csv_writer.write_record(time_series_row(record, series.has_recovered()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the national series to a CSV file
pub fn write_time_series_csv<P: AsRef<Path>>(series: &NationalTimeSeries, path: P) -> Result<()> {
    write_time_series(series, File::create(path)?)
}

/// Write the regional table as CSV to any writer
pub fn write_regions<W: Write>(table: &RegionTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(region_columns())?;
    for row in table {
        let mut record = vec![row.region_name.clone()];
        record.extend(RegionColumn::ALL.iter().map(|c| match c {
            RegionColumn::Population => row.population.to_string(),
            RegionColumn::CumulativeCases => row.cumulative_cases.to_string(),
            RegionColumn::CumulativeDeaths => row.cumulative_deaths.to_string(),
            _ => row.value(*c).to_string(),
        }));
        csv_writer.write_record(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the regional table to a CSV file
pub fn write_regions_csv<P: AsRef<Path>>(table: &RegionTable, path: P) -> Result<()> {
    write_regions(table, File::create(path)?)
}

fn column_of<R, T>(rows: &[R], field: impl Fn(&R) -> T) -> Vec<T> {
    rows.iter().map(field).collect()
}

/// Render the national series as a polars DataFrame
pub fn time_series_to_dataframe(series: &NationalTimeSeries) -> Result<DataFrame> {
    let records = series.records();
    let mut columns = vec![
        Series::new("date", column_of(records, |r| r.date)),
        Series::new(
            "cumulative_cases",
            column_of(records, |r| r.cumulative_cases),
        ),
        Series::new(
            "cumulative_deaths",
            column_of(records, |r| r.cumulative_deaths),
        ),
    ];
    if series.has_recovered() {
        columns.push(Series::new(
            "cumulative_recovered",
            column_of(records, |r| r.cumulative_recovered),
        ));
    }
    columns.push(Series::new(
        "daily_new_cases",
        column_of(records, |r| r.daily_new_cases),
    ));
    columns.push(Series::new(
        "daily_new_deaths",
        column_of(records, |r| r.daily_new_deaths),
    ));
    if series.has_recovered() {
        columns.push(Series::new(
            "daily_new_recovered",
            column_of(records, |r| r.daily_new_recovered),
        ));
    }
    columns.push(Series::new(
        "cases_7day_avg",
        column_of(records, |r| r.cases_7day_avg),
    ));
    columns.push(Series::new(
        "deaths_7day_avg",
        column_of(records, |r| r.deaths_7day_avg),
    ));
    columns.push(Series::new(
        "fatality_rate_pct",
        column_of(records, |r| r.fatality_rate_pct),
    ));

    Ok(DataFrame::new(columns)?)
}

/// Render the regional table as a polars DataFrame, columns in export order
pub fn regions_to_dataframe(table: &RegionTable) -> Result<DataFrame> {
    let rows = table.rows();
    let names: Vec<&str> = rows.iter().map(|r| r.region_name.as_str()).collect();
    let mut columns = vec![Series::new("region_name", names)];
    for column in RegionColumn::ALL {
        let name = column.name();
        columns.push(match column {
            RegionColumn::Population => Series::new(name, column_of(rows, |r| r.population)),
            RegionColumn::CumulativeCases => {
                Series::new(name, column_of(rows, |r| r.cumulative_cases))
            }
            RegionColumn::CumulativeDeaths => {
                Series::new(name, column_of(rows, |r| r.cumulative_deaths))
            }
            _ => Series::new(name, table.column_values(column)),
        });
    }

    Ok(DataFrame::new(columns)?)
}

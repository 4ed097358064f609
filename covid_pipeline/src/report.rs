//! Assembly of every analysis the presentation layer consumes

use crate::config::ReportConfig;
use crate::error::Result;
use crate::metrics::{
    correlation_matrix, describe, top_n, ColumnSummary, CorrelationMatrix, ExecutiveSummary,
};
use crate::outliers::{
    detect_outliers_iqr_with, detect_outliers_zscore_with, skewness_report, OutlierReport,
    SkewnessReport,
};
use crate::regions::{RegionColumn, RegionTable};
use crate::timeseries::NationalTimeSeries;
use serde::Serialize;
use std::fmt;

/// Analyses of one regional column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAnalysis {
    pub summary: ColumnSummary,
    pub iqr: OutlierReport,
    pub zscore: OutlierReport,
    pub skewness: SkewnessReport,
}

/// A region in the top ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRegion {
    pub region_name: String,
    pub value: f64,
}

/// Everything derived from one pair of normalized tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: ExecutiveSummary,
    pub columns: Vec<ColumnAnalysis>,
    pub correlations: Option<CorrelationMatrix>,
    /// Top regions by the first analysis column
    pub ranking: Vec<RankedRegion>,
}

impl AnalysisReport {
    /// Run the configured analyses. The column analyses need at least one region;
    /// with an empty table only the executive summary is filled in.
    pub fn build(
        series: &NationalTimeSeries,
        table: &RegionTable,
        config: &ReportConfig,
    ) -> Result<Self> {
        config.validate()?;
        let summary = ExecutiveSummary::build(series, table);

        if table.is_empty() {
            log::warn!("Regional table is empty; skipping column analyses");
            return Ok(Self {
                summary,
                columns: Vec::new(),
                correlations: None,
                ranking: Vec::new(),
            });
        }

        let names: Vec<&str> = config.analysis_columns.iter().map(String::as_str).collect();
        let columns = names
            .iter()
            .map(|name| {
                Ok(ColumnAnalysis {
                    summary: describe(table, name)?,
                    iqr: detect_outliers_iqr_with(table, name, config.iqr_multiplier)?,
                    zscore: detect_outliers_zscore_with(table, name, config.zscore_threshold)?,
                    skewness: skewness_report(table, name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let correlations = if names.len() >= 2 {
            Some(correlation_matrix(table, &names)?)
        } else {
            None
        };

        let ranking = match config.columns()?.first() {
            Some(&column) => ranking(table, column, config.top_n)?,
            None => Vec::new(),
        };

        Ok(Self {
            summary,
            columns,
            correlations,
            ranking,
        })
    }
}

fn ranking(table: &RegionTable, column: RegionColumn, n: usize) -> Result<Vec<RankedRegion>> {
    Ok(top_n(table, column.name(), n)?
        .into_iter()
        .map(|row| RankedRegion {
            region_name: row.region_name.clone(),
            value: row.value(column),
        })
        .collect())
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        for analysis in &self.columns {
            writeln!(f)?;
            write!(f, "{}", analysis.summary)?;
            writeln!(f, "  {}", analysis.skewness)?;
            write!(f, "{}", analysis.iqr)?;
            write!(f, "{}", analysis.zscore)?;
        }
        if let Some(correlations) = &self.correlations {
            writeln!(f)?;
            writeln!(f, "Correlations:")?;
            write!(f, "{}", correlations)?;
        }
        if !self.ranking.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top {} regions:", self.ranking.len())?;
            for (i, region) in self.ranking.iter().enumerate() {
                writeln!(f, "  {:>2}. {} ({:.2})", i + 1, region.region_name, region.value)?;
            }
        }
        Ok(())
    }
}

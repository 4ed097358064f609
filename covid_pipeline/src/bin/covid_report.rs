//! Batch job: load saved API responses, normalize them, write cleaned CSV
//! snapshots and log the analysis report.

use clap::Parser;
use covid_pipeline::export::{write_regions_csv, write_time_series_csv};
use covid_pipeline::{
    normalize_regions, normalize_timeline, AnalysisReport, DataLoader, NationalTimeSeries,
    PipelineError, RegionTable, ReportConfig,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "covid_report", about = "Clean COVID-19 API data and report outliers")]
struct Cli {
    /// Saved response of the national historical endpoint
    #[arg(long)]
    historical: Option<PathBuf>,
    /// Saved response of the regional snapshot endpoint
    #[arg(long)]
    regions: Option<PathBuf>,
    /// Directory for the cleaned CSV snapshots
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// TOML configuration file; flags take precedence over its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Absolute z-score above which a region is an outlier
    #[arg(long)]
    zscore_threshold: Option<f64>,
    /// Number of regions in the ranking
    #[arg(long)]
    top: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<ReportConfig, PipelineError> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => ReportConfig::default(),
        };

        if let Some(path) = self.historical {
            config.historical_path = Some(path);
        }
        if let Some(path) = self.regions {
            config.regions_path = Some(path);
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(threshold) = self.zscore_threshold {
            config.zscore_threshold = threshold;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_series(config: &ReportConfig) -> Result<NationalTimeSeries, PipelineError> {
    let Some(path) = &config.historical_path else {
        log::warn!("No historical data configured; national series will be empty");
        return Ok(NationalTimeSeries::default());
    };

    log::info!("Loading national timeline from {}", path.display());
    let raw = DataLoader::timeline_from_file(path)?;
    normalize_timeline(&raw)
}

fn load_regions(config: &ReportConfig) -> Result<RegionTable, PipelineError> {
    let Some(path) = &config.regions_path else {
        log::warn!("No regional data configured; regional table will be empty");
        return Ok(RegionTable::default());
    };

    log::info!("Loading regional snapshot from {}", path.display());
    let records = DataLoader::regions_from_file(path)?;
    let table = normalize_regions(&records);
    if table.len() < records.len() {
        log::info!(
            "Dropped {} of {} regional records during cleaning",
            records.len() - table.len(),
            records.len()
        );
    }
    Ok(table)
}

fn run(config: &ReportConfig) -> Result<(), PipelineError> {
    let series = load_series(config)?;
    let table = load_regions(config)?;

    fs::create_dir_all(&config.output_dir)?;
    if !series.is_empty() {
        let path = config.output_dir.join("national_timeseries_clean.csv");
        write_time_series_csv(&series, &path)?;
        log::info!("Wrote {} days to {}", series.len(), path.display());
    }
    if !table.is_empty() {
        let path = config.output_dir.join("regions_clean.csv");
        write_regions_csv(&table, &path)?;
        log::info!("Wrote {} regions to {}", table.len(), path.display());
    }

    let report = AnalysisReport::build(&series, &table, config)?;
    for line in report.to_string().lines() {
        log::info!("{}", line);
    }

    Ok(())
}

fn main() -> ExitCode {
    // Report lines are logged at info, so make that the default level
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Report failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

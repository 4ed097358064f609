use covid_pipeline::export::{write_regions_csv, write_time_series_csv};
use covid_pipeline::{
    detect_outliers_iqr, detect_outliers_zscore, normalize_regions, normalize_timeline,
    skewness_report, AnalysisReport, DataLoader, ReportConfig,
};
use eda_math::SkewClass;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

// A national timeline of twelve days with a reporting correction on day nine
fn create_historical_file() -> NamedTempFile {
    let cases: [u64; 12] = [1, 3, 7, 12, 20, 31, 45, 60, 58, 80, 101, 130];
    let deaths: [u64; 12] = [0, 0, 0, 1, 1, 1, 2, 3, 3, 4, 5, 6];
    let series = |values: &[u64]| {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("\"3/{}/20\": {}", i + 1, v))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"country": "USA", "timeline": {{"cases": {{{}}}, "deaths": {{{}}}}}}}"#,
        series(&cases),
        series(&deaths)
    )
    .unwrap();
    file
}

// Ten regions with similar rates, one extreme, and two rows that cannot be cleaned
fn create_regions_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"[
        {{"state": "A", "cases": 1000, "deaths": 10, "population": 100000}},
        {{"state": "B", "cases": 1100, "deaths": 12, "population": 100000}},
        {{"state": "C", "cases": 1200, "deaths": 11, "population": 100000}},
        {{"state": "D", "cases": 1150, "deaths": 13, "population": 100000}},
        {{"state": "E", "cases": 1050, "deaths": 12, "population": 100000}},
        {{"state": "F", "cases": 1250, "deaths": 14, "population": 100000}},
        {{"state": "G", "cases": 1120, "deaths": 10, "population": 100000}},
        {{"state": "H", "cases": 1180, "deaths": 12, "population": 100000}},
        {{"state": "I", "cases": 1080, "deaths": 11, "population": 100000}},
        {{"state": "Hotspot", "cases": 9000, "deaths": 300, "population": 100000}},
        {{"state": "Cruise Ship", "cases": 700, "deaths": 12}},
        {{"state": "Territory", "cases": 10, "deaths": 0, "population": 0}}
    ]"#
    )
    .unwrap();
    file
}

#[test]
fn test_full_cleaning_workflow() {
    let historical = create_historical_file();
    let regions = create_regions_file();

    // 1. Load and normalize
    let raw = DataLoader::timeline_from_file(historical.path()).unwrap();
    let series = normalize_timeline(&raw).unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series.records()[8].daily_new_cases, -2);
    assert!(series.records()[3].cases_7day_avg.is_some());
    assert!(series.records()[9].cases_7day_avg.is_none());

    let records = DataLoader::regions_from_file(regions.path()).unwrap();
    assert_eq!(records.len(), 12);
    let table = normalize_regions(&records);
    assert_eq!(table.len(), 10);

    // 2. Outlier detection and skewness
    let iqr = detect_outliers_iqr(&table, "cases_per_100k").unwrap();
    assert_eq!(iqr.region_names(), vec!["Hotspot"]);

    let zscore = detect_outliers_zscore(&table, "cases_per_100k").unwrap();
    assert_eq!(zscore.region_names(), vec!["Hotspot"]);

    let skew = skewness_report(&table, "cases_per_100k").unwrap();
    assert_eq!(skew.class, SkewClass::RightSkewed);

    // 3. Snapshots
    let dir = tempfile::tempdir().unwrap();
    let series_path = dir.path().join("national_timeseries_clean.csv");
    let regions_path = dir.path().join("regions_clean.csv");
    write_time_series_csv(&series, &series_path).unwrap();
    write_regions_csv(&table, &regions_path).unwrap();

    assert_eq!(fs::read_to_string(&series_path).unwrap().lines().count(), 13);
    assert_eq!(fs::read_to_string(&regions_path).unwrap().lines().count(), 11);
}

#[test]
fn test_analysis_report() {
    let historical = create_historical_file();
    let regions = create_regions_file();
    let series =
        normalize_timeline(&DataLoader::timeline_from_file(historical.path()).unwrap()).unwrap();
    let table = normalize_regions(&DataLoader::regions_from_file(regions.path()).unwrap());

    let config = ReportConfig {
        top_n: 3,
        ..ReportConfig::default()
    };
    let report = AnalysisReport::build(&series, &table, &config).unwrap();

    assert_eq!(report.summary.total_cases, Some(130));
    assert_eq!(report.summary.most_affected_region.as_deref(), Some("Hotspot"));
    assert_eq!(report.columns.len(), 3);
    assert_eq!(report.correlations.as_ref().unwrap().columns.len(), 3);
    let ranked: Vec<&str> = report.ranking.iter().map(|r| r.region_name.as_str()).collect();
    assert_eq!(ranked, vec!["Hotspot", "F", "C"]);

    let text = report.to_string();
    assert!(text.contains("Executive Summary"));
    assert!(text.contains("Hotspot"));
    assert!(text.contains("Top 3 regions"));
}

#[test]
fn test_analysis_report_with_empty_regions() {
    let config = ReportConfig::default();
    let report = AnalysisReport::build(&Default::default(), &Default::default(), &config).unwrap();

    assert!(report.columns.is_empty());
    assert!(report.correlations.is_none());
    assert!(report.ranking.is_empty());
}

#[test]
fn test_report_binary_writes_snapshots() {
    let historical = create_historical_file();
    let regions = create_regions_file();
    let output = tempfile::tempdir().unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_covid_report"))
        .arg("--historical")
        .arg(historical.path())
        .arg("--regions")
        .arg(regions.path())
        .arg("--output-dir")
        .arg(output.path())
        .arg("--top")
        .arg("5")
        .status()
        .unwrap();

    assert!(status.success());
    assert!(output.path().join("national_timeseries_clean.csv").exists());
    assert!(output.path().join("regions_clean.csv").exists());
}

#[test]
fn test_report_binary_rejects_bad_threshold() {
    let status = Command::new(env!("CARGO_BIN_EXE_covid_report"))
        .arg("--zscore-threshold")
        .arg("0")
        .status()
        .unwrap();

    assert!(!status.success());
}

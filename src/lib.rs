//! # COVID EDA
//!
//! Umbrella crate for the COVID-19 data cleaning workspace. It re-exports the
//! statistics crate and the pipeline crate, and offers a one-call path from raw API
//! payloads to cleaned tables.
//!
//! ## Example
//!
//! ```
//! use covid_eda_workspace::clean_payloads;
//!
//! let (series, regions) = clean_payloads(
//!     r#"{"cases": {"3/1/20": 10, "3/2/20": 14}, "deaths": {"3/1/20": 0, "3/2/20": 1}}"#,
//!     r#"[{"state": "Maine", "cases": 14, "deaths": 1, "population": 1300000}]"#,
//! )?;
//! assert_eq!(series.records()[1].daily_new_cases, 4);
//! assert_eq!(regions.len(), 1);
//! # Ok::<(), covid_eda_workspace::covid_pipeline::PipelineError>(())
//! ```

pub use covid_pipeline;
pub use eda_math;

use covid_pipeline::{
    normalize_regions, normalize_timeline, DataLoader, NationalTimeSeries, RegionTable, Result,
};

/// Load and normalize a national timeline payload and a regional snapshot payload.
///
/// Either payload may be empty, which yields an empty table.
pub fn clean_payloads(
    timeline_json: &str,
    regions_json: &str,
) -> Result<(NationalTimeSeries, RegionTable)> {
    let series = normalize_timeline(&DataLoader::timeline_from_str(timeline_json)?)?;
    let regions = normalize_regions(&DataLoader::regions_from_str(regions_json)?);
    Ok((series, regions))
}

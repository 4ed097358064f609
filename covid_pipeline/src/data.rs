//! Raw API payloads and their loading
//!
//! The API client itself lives outside this crate; [`DataLoader`] accepts the JSON it
//! returns as a string, a parsed [`Value`] or a saved response on disk. A payload that
//! carries no data at all (`null`, an empty document, an object without a timeline)
//! loads as an empty collection rather than an error.

use crate::error::{PipelineError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Cumulative counts keyed by the API's date strings
pub type DatedCounts = BTreeMap<String, u64>;

/// Raw national timeline: one cumulative series per metric
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTimeline {
    pub cases: DatedCounts,
    pub deaths: DatedCounts,
    #[serde(default)]
    pub recovered: Option<DatedCounts>,
}

impl RawTimeline {
    /// Whether the timeline holds no dates at all
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
            && self.deaths.is_empty()
            && self.recovered.iter().all(BTreeMap::is_empty)
    }
}

/// Raw per-region record as returned by the states/countries endpoints.
///
/// Only the fields needed for normalization are kept; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRegionRecord {
    #[serde(alias = "state", alias = "country")]
    pub region_name: String,
    #[serde(default)]
    pub cases: Option<i64>,
    #[serde(default)]
    pub deaths: Option<i64>,
    #[serde(default)]
    pub population: Option<i64>,
}

impl RawRegionRecord {
    /// Convenience constructor for a complete record
    pub fn new(region_name: &str, cases: i64, deaths: i64, population: Option<i64>) -> Self {
        Self {
            region_name: region_name.to_string(),
            cases: Some(cases),
            deaths: Some(deaths),
            population,
        }
    }
}

/// Loader for raw API payloads
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a national timeline from a JSON string
    pub fn timeline_from_str(json: &str) -> Result<RawTimeline> {
        if json.trim().is_empty() {
            return Ok(RawTimeline::default());
        }
        Self::timeline_from_value(serde_json::from_str(json)?)
    }

    /// Load a national timeline from a saved API response
    pub fn timeline_from_file<P: AsRef<Path>>(path: P) -> Result<RawTimeline> {
        let json = fs::read_to_string(path)?;
        Self::timeline_from_str(&json)
    }

    /// Load a national timeline from parsed JSON.
    ///
    /// Accepts either the bare `{cases, deaths, recovered}` object or one wrapped in a
    /// `timeline` key, as the per-country historical endpoint returns it.
    pub fn timeline_from_value(value: Value) -> Result<RawTimeline> {
        match value {
            Value::Null => Ok(RawTimeline::default()),
            Value::Object(mut map) => {
                if let Some(inner) = map.remove("timeline") {
                    return Self::timeline_from_value(inner);
                }
                if map.contains_key("cases") || map.contains_key("deaths") {
                    return Ok(serde_json::from_value(Value::Object(map))?);
                }
                if !map.is_empty() {
                    log::warn!(
                        "Payload has no timeline (keys: {}); treating it as empty",
                        map.keys().cloned().collect::<Vec<_>>().join(", ")
                    );
                }
                Ok(RawTimeline::default())
            }
            other => Err(PipelineError::MalformedInput(format!(
                "Expected a timeline object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Load regional records from a JSON string
    pub fn regions_from_str(json: &str) -> Result<Vec<RawRegionRecord>> {
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        Self::regions_from_value(serde_json::from_str(json)?)
    }

    /// Load regional records from a saved API response
    pub fn regions_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawRegionRecord>> {
        let json = fs::read_to_string(path)?;
        Self::regions_from_str(&json)
    }

    /// Load regional records from parsed JSON: an array of records, or a single record
    pub fn regions_from_value(value: Value) -> Result<Vec<RawRegionRecord>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => Ok(serde_json::from_value(value)?),
            Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
            other => Err(PipelineError::MalformedInput(format!(
                "Expected an array of region records, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

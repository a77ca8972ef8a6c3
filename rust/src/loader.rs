//! Reading input documents.
//!
//! The document is a JSON object with a `config` time range, a `machines`
//! object and a `jobs` object. Object order is kept: it is the processing
//! order of jobs and the chart order of machines.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::TimeRangeRecord;
use crate::models::{Problem, ProblemRecord};
use crate::validation::{validate, ConfigurationError};

/// Errors that can occur while loading an input document.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid input document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid entry {key:?} in section {section}: {source}")]
    Record {
        section: &'static str,
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Deserialize)]
struct Document {
    config: TimeRangeRecord,
    machines: Map<String, Value>,
    jobs: Map<String, Value>,
}

fn records<T: DeserializeOwned>(
    section: &'static str,
    entries: Map<String, Value>,
) -> Result<Vec<(String, T)>, LoadError> {
    entries
        .into_iter()
        .map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Ok((key, record)),
            Err(source) => Err(LoadError::Record {
                section,
                key,
                source,
            }),
        })
        .collect()
}

/// Parse an input document without validating it.
pub fn parse_record(text: &str) -> Result<ProblemRecord, LoadError> {
    let document: Document = serde_json::from_str(text)?;
    Ok(ProblemRecord {
        config: document.config,
        machines: records("machines", document.machines)?,
        jobs: records("jobs", document.jobs)?,
    })
}

/// Parse and validate an input document.
pub fn parse_problem(text: &str) -> Result<Problem, LoadError> {
    let record = parse_record(text)?;
    Ok(validate(&record)?)
}

/// Read, parse and validate an input file.
pub fn load_problem(path: &Path) -> Result<Problem, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let problem = parse_problem(&text)?;
    log::debug!(
        "Loaded {} machines and {} jobs from {}",
        problem.machines.len(),
        problem.jobs.len(),
        path.display()
    );
    Ok(problem)
}

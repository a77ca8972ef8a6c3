//! Core data types for the allocation system.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{TimeRange, TimeRangeRecord};

/// One discrete step of the time axis.
pub type TimeStep = i64;

/// Index of a core within its machine.
pub type CoreIndex = u32;

/// A machine with a fixed number of cores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    pub key: String,
    pub cores: u32,
}

impl Machine {
    pub fn new(key: impl Into<String>, cores: u32) -> Self {
        Self {
            key: key.into(),
            cores,
        }
    }
}

/// A job with fixed timing and a core demand.
///
/// `cores` is empty until the allocator assigns exactly `demand` core indices
/// of `machine` to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: String,
    pub start_time: TimeStep,
    /// Inclusive: the job occupies its cores at `finish_time` too
    pub finish_time: TimeStep,
    pub machine: String,
    pub demand: u32,
    pub cores: Vec<CoreIndex>,
    /// Set once the allocator has placed the job (a zero demand leaves `cores` empty)
    #[serde(skip)]
    pub allocated: bool,
}

impl Job {
    pub fn new(
        id: impl Into<String>,
        start_time: TimeStep,
        finish_time: TimeStep,
        machine: impl Into<String>,
        demand: u32,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            finish_time,
            machine: machine.into(),
            demand,
            cores: Vec::new(),
            allocated: false,
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Whether both jobs hold their cores at some common step.
    pub fn overlaps(&self, other: &Job) -> bool {
        self.start_time <= other.finish_time && other.start_time <= self.finish_time
    }
}

/// A validated allocation problem: time range, machines and jobs in input order.
#[derive(Clone, Debug)]
pub struct Problem {
    pub time_range: TimeRange,
    pub machines: Vec<Machine>,
    pub jobs: Vec<Job>,
}

/// Machine reference inside a job record.
///
/// Files write it as a number (`"machine": 0`) while machine keys are strings,
/// so both spellings are accepted.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MachineRef {
    Number(i64),
    Key(String),
}

impl fmt::Display for MachineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineRef::Number(n) => write!(f, "{}", n),
            MachineRef::Key(k) => write!(f, "{}", k),
        }
    }
}

/// A machine declaration as written in the input file.
#[derive(Clone, Debug, Deserialize)]
pub struct MachineRecord {
    pub cores: i64,
}

/// A job declaration as written in the input file.
#[derive(Clone, Debug, Deserialize)]
pub struct JobRecord {
    pub start_time: TimeStep,
    pub finish_time: TimeStep,
    pub machine: MachineRef,
    pub cores: i64,
}

/// An input document before validation, sections in file order.
#[derive(Clone, Debug)]
pub struct ProblemRecord {
    pub config: TimeRangeRecord,
    pub machines: Vec<(String, MachineRecord)>,
    pub jobs: Vec<(String, JobRecord)>,
}

//! Input validation for allocation problems.
//!
//! Converts the records of an input document into typed values and rejects
//! malformed data before any allocation starts:
//! - Inverted or unindexable time ranges
//! - Negative core counts and demands
//! - Duplicate machine keys
//! - Jobs referencing undeclared machines
//! - Jobs finishing before they start or lying outside the time range
//!
//! A demand larger than the machine is not rejected here; the allocator
//! reports it as a scheduling conflict.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::TimeRange;
use crate::models::{Job, Machine, MachineRef, Problem, ProblemRecord, TimeStep};

/// Malformed or missing time range, machine or job data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid time range: min_time {min_time} is greater than max_time {max_time}")]
    InvertedTimeRange {
        min_time: TimeStep,
        max_time: TimeStep,
    },
    #[error("Time range [{min_time}, {max_time}] is too large")]
    TimeRangeTooLarge {
        min_time: TimeStep,
        max_time: TimeStep,
    },
    #[error("Machine {machine} declares an invalid core count {cores}")]
    InvalidMachineCores { machine: String, cores: i64 },
    #[error("Machine {0} is declared more than once")]
    DuplicateMachine(String),
    #[error("Job {job} references undeclared machine {machine}")]
    UnknownMachine { job: String, machine: String },
    #[error("Job {job} demands an invalid number of cores {demand}")]
    InvalidDemand { job: String, demand: i64 },
    #[error("Job {job} finishes at {finish_time} before it starts at {start_time}")]
    InvertedInterval {
        job: String,
        start_time: TimeStep,
        finish_time: TimeStep,
    },
    #[error("Job {job} uses time {time} outside of the range [{min_time}, {max_time}]")]
    OutOfRange {
        job: String,
        time: TimeStep,
        min_time: TimeStep,
        max_time: TimeStep,
    },
}

/// Normalize a machine key so numeric spellings compare by value
/// (`"01"` and `"1"` name the same machine).
pub fn canonical_machine_key(key: &str) -> String {
    match key.trim().parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => key.to_string(),
    }
}

fn canonical_machine_ref(machine: &MachineRef) -> String {
    match machine {
        MachineRef::Number(n) => n.to_string(),
        MachineRef::Key(k) => canonical_machine_key(k),
    }
}

/// Check a whole input document and build the typed problem from it.
pub fn validate(record: &ProblemRecord) -> Result<Problem, ConfigurationError> {
    let time_range = TimeRange::new(record.config.min_time, record.config.max_time)?;

    let mut capacities: FxHashMap<String, u32> = FxHashMap::default();
    let mut machines = Vec::with_capacity(record.machines.len());
    for (key, machine) in &record.machines {
        let key = canonical_machine_key(key);
        let cores = u32::try_from(machine.cores).map_err(|_| {
            ConfigurationError::InvalidMachineCores {
                machine: key.clone(),
                cores: machine.cores,
            }
        })?;
        if capacities.insert(key.clone(), cores).is_some() {
            return Err(ConfigurationError::DuplicateMachine(key));
        }
        machines.push(Machine { key, cores });
    }

    let mut jobs = Vec::with_capacity(record.jobs.len());
    for (id, job) in &record.jobs {
        let machine = canonical_machine_ref(&job.machine);
        if !capacities.contains_key(&machine) {
            return Err(ConfigurationError::UnknownMachine {
                job: id.clone(),
                machine,
            });
        }
        let demand = u32::try_from(job.cores).map_err(|_| ConfigurationError::InvalidDemand {
            job: id.clone(),
            demand: job.cores,
        })?;
        if job.finish_time < job.start_time {
            return Err(ConfigurationError::InvertedInterval {
                job: id.clone(),
                start_time: job.start_time,
                finish_time: job.finish_time,
            });
        }
        for time in [job.start_time, job.finish_time] {
            if !time_range.contains(time) {
                return Err(ConfigurationError::OutOfRange {
                    job: id.clone(),
                    time,
                    min_time: time_range.min_time(),
                    max_time: time_range.max_time(),
                });
            }
        }
        jobs.push(Job::new(
            id.clone(),
            job.start_time,
            job.finish_time,
            machine,
            demand,
        ));
    }

    Ok(Problem {
        time_range,
        machines,
        jobs,
    })
}

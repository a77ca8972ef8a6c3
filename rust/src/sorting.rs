//! Job ordering strategies for the allocator.
//!
//! The order decides which job claims contested cores first:
//! - `input`: jobs in the order they are declared (first-fit-in-order)
//! - `start_time`: earliest start first, then earliest finish, ties keep input order

use std::fmt;
use std::str::FromStr;

use crate::models::Job;

/// Order in which jobs are handed to the allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JobOrder {
    #[default]
    Input,
    StartTime,
}

/// Errors that can occur while parsing an ordering strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortingError {
    UnknownOrder(String),
}

impl fmt::Display for SortingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOrder(s) => write!(
                f,
                "Unknown job order: {} (expected \"input\" or \"start-time\")",
                s
            ),
        }
    }
}

impl std::error::Error for SortingError {}

impl FromStr for JobOrder {
    type Err = SortingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(JobOrder::Input),
            "start-time" | "start_time" => Ok(JobOrder::StartTime),
            other => Err(SortingError::UnknownOrder(other.to_string())),
        }
    }
}

impl fmt::Display for JobOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOrder::Input => write!(f, "input"),
            JobOrder::StartTime => write!(f, "start-time"),
        }
    }
}

/// Indices into `jobs` in processing order.
///
/// The jobs themselves are left in place so results keep the input order.
pub fn processing_order(jobs: &[Job], order: JobOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..jobs.len()).collect();
    if order == JobOrder::StartTime {
        // sort_by_key is stable, so equal keys keep input order
        indices.sort_by_key(|&i| (jobs[i].start_time, jobs[i].finish_time));
    }
    indices
}

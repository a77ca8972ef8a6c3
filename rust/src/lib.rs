//! Core allocation and verification for pre-timed jobs.
//!
//! Jobs come with fixed start and finish times and a core demand on one
//! machine. This crate reconstructs which cores each job occupies, rejects
//! schedules that cannot be realized, and renders the result as a Gantt chart.

use std::path::Path;
use thiserror::Error;

pub mod allocator;
mod config;
mod interner;
pub mod loader;
pub mod logging;
mod models;
pub mod render;
pub mod sorting;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use allocator::{
    allocate, Allocation, Allocator, ResourceTimeline, SchedulerError, SlotLayout,
};
pub use config::{AllocationConfig, Hatch, RenderConfig, TimeRange, TimeRangeRecord};
pub use interner::{MachineIdx, MachineInterner};
pub use loader::{load_problem, parse_problem, LoadError};
pub use models::{
    CoreIndex, Job, JobRecord, Machine, MachineRecord, MachineRef, Problem, ProblemRecord,
    TimeStep,
};
pub use render::RenderError;
pub use sorting::JobOrder;
pub use validation::ConfigurationError;

/// Any failure between reading an input file and producing a chart.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Scheduling(#[from] SchedulerError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Load an input file and allocate cores to all of its jobs.
///
/// # Errors
/// * `Error::Load` if the file cannot be read, parsed or validated
/// * `Error::Scheduling` if some job cannot get its cores
pub fn allocate_file(path: &Path, config: &AllocationConfig) -> Result<Allocation, Error> {
    let problem = load_problem(path)?;
    Ok(allocate(problem, config)?)
}

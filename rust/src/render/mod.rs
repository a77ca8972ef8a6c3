//! Chart rendering of an allocation.
//!
//! Both renderers draw one mark per `(job, core)` on the slot the layout assigns
//! to that core. Jobs are styled by their position in the input.

pub mod svg;
pub mod text;

use thiserror::Error;

use crate::config::{Hatch, RenderConfig};
use crate::models::{CoreIndex, TimeStep};

pub use svg::{render_svg, write_svg};
pub use text::render_text;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot write chart: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot format chart: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("Job {job} uses core {core} of machine {machine}, which has no chart slot")]
    UnknownSlot {
        job: String,
        machine: String,
        core: CoreIndex,
    },
    #[error("Job {job} spans [{start_time}, {finish_time}], outside of the chart time range")]
    OutOfRange {
        job: String,
        start_time: TimeStep,
        finish_time: TimeStep,
    },
    #[error("Chart with {steps} time steps is too large to draw")]
    ChartTooLarge { steps: usize },
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),
}

/// Fill color and hatch of the job at position `sequence`.
///
/// Colors cycle with every job; the hatch advances each time the palette wraps.
pub fn job_style(config: &RenderConfig, sequence: usize) -> Result<(&str, Hatch), RenderError> {
    if config.palette.is_empty() || config.hatches.is_empty() {
        return Err(RenderError::InvalidConfig(
            "palette and hatches must not be empty".to_string(),
        ));
    }
    let color = &config.palette[sequence % config.palette.len()];
    let hatch = config.hatches[(sequence / config.palette.len()) % config.hatches.len()];
    Ok((color.as_str(), hatch))
}

//! Configuration types for allocation and rendering.

use serde::Deserialize;

use crate::logging::VERBOSITY_SILENT;
use crate::models::TimeStep;
use crate::sorting::JobOrder;
use crate::validation::ConfigurationError;

/// Inclusive discrete time bounds `[min_time, max_time]`.
///
/// Always valid once constructed: `min_time <= max_time` and the number of
/// steps fits into `usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    min_time: TimeStep,
    max_time: TimeStep,
}

impl TimeRange {
    pub fn new(min_time: TimeStep, max_time: TimeStep) -> Result<Self, ConfigurationError> {
        if min_time > max_time {
            return Err(ConfigurationError::InvertedTimeRange { min_time, max_time });
        }
        let span = max_time
            .checked_sub(min_time)
            .and_then(|span| usize::try_from(span).ok())
            .and_then(|span| span.checked_add(1));
        if span.is_none() {
            return Err(ConfigurationError::TimeRangeTooLarge { min_time, max_time });
        }
        Ok(Self { min_time, max_time })
    }

    #[inline]
    pub fn min_time(&self) -> TimeStep {
        self.min_time
    }

    #[inline]
    pub fn max_time(&self) -> TimeStep {
        self.max_time
    }

    /// Number of discrete steps in the range (both bounds included).
    #[inline]
    pub fn steps(&self) -> usize {
        (self.max_time - self.min_time) as usize + 1
    }

    #[inline]
    pub fn contains(&self, time: TimeStep) -> bool {
        self.min_time <= time && time <= self.max_time
    }

    /// Offset of `time` from `min_time`, or `None` when outside the range.
    #[inline]
    pub fn offset(&self, time: TimeStep) -> Option<usize> {
        if self.contains(time) {
            Some((time - self.min_time) as usize)
        } else {
            None
        }
    }
}

/// The `config` section of an input document, as written in the file.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TimeRangeRecord {
    pub min_time: TimeStep,
    pub max_time: TimeStep,
}

/// Configuration for the allocator.
#[derive(Clone, Debug)]
pub struct AllocationConfig {
    /// Order in which jobs claim cores
    pub order: JobOrder,
    /// Logging verbosity (see `logging`)
    pub verbosity: u8,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            order: JobOrder::Input,
            verbosity: VERBOSITY_SILENT,
        }
    }
}

/// Chart appearance.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Height of one core slot in chart units
    pub slot_height: u32,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Fill colors, cycled per job
    pub palette: Vec<String>,
    /// Hatch patterns, advanced each time the palette wraps
    pub hatches: Vec<Hatch>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            slot_height: 2,
            width: 2000,
            height: 2000,
            palette: [
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
                "#7f7f7f", "#bcbd22", "#17becf",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            hatches: vec![Hatch::Diagonal, Hatch::Vertical, Hatch::Cross],
        }
    }
}

/// Hatch pattern drawn over a job rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hatch {
    /// `/`
    Diagonal,
    /// `|`
    Vertical,
    /// `X`
    Cross,
}

impl Hatch {
    pub fn name(&self) -> &'static str {
        match self {
            Hatch::Diagonal => "diagonal",
            Hatch::Vertical => "vertical",
            Hatch::Cross => "cross",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_steps_and_offsets() {
        let range = TimeRange::new(5, 9).unwrap();
        assert_eq!(range.steps(), 5);
        assert_eq!(range.offset(5), Some(0));
        assert_eq!(range.offset(9), Some(4));
        assert_eq!(range.offset(4), None);
        assert_eq!(range.offset(10), None);
    }

    #[test]
    fn test_time_range_single_step() {
        let range = TimeRange::new(-3, -3).unwrap();
        assert_eq!(range.steps(), 1);
        assert!(range.contains(-3));
    }

    #[test]
    fn test_time_range_inverted() {
        assert!(matches!(
            TimeRange::new(3, 2),
            Err(ConfigurationError::InvertedTimeRange {
                min_time: 3,
                max_time: 2
            })
        ));
    }

    #[test]
    fn test_time_range_too_large() {
        assert!(matches!(
            TimeRange::new(TimeStep::MIN, TimeStep::MAX),
            Err(ConfigurationError::TimeRangeTooLarge { .. })
        ));
    }

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.slot_height, 2);
        assert_eq!(config.palette.len(), 10);
        assert_eq!(config.hatches.len(), 3);
    }
}

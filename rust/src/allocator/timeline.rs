//! Per-step, per-machine tracking of free core indices.

use rustc_hash::FxHashSet;
use std::ops::RangeInclusive;

use crate::config::TimeRange;
use crate::interner::{MachineIdx, MachineInterner};
use crate::models::{CoreIndex, Machine, TimeStep};
use crate::validation::ConfigurationError;

use super::layout::SlotLayout;

/// Intersection of two free sets, keeping the order of `cores_a`.
///
/// The order decides which cores are offered first, so allocation stays
/// deterministic.
pub fn intersect_free(cores_a: &[CoreIndex], cores_b: &[CoreIndex]) -> Vec<CoreIndex> {
    let members: FxHashSet<CoreIndex> = cores_b.iter().copied().collect();
    cores_a
        .iter()
        .copied()
        .filter(|core| members.contains(core))
        .collect()
}

/// Free cores of every machine at every step of the time range.
///
/// Invariant: the free set at `(t, m)` is all cores of `m` minus the cores
/// reserved by jobs covering `t` on `m`. Free sets stay in ascending order
/// because reservations only remove entries.
#[derive(Clone, Debug)]
pub struct ResourceTimeline {
    time_range: TimeRange,
    machines: MachineInterner,
    /// Row-major grid: `step_offset * machine_count + machine_idx`
    free: Vec<Vec<CoreIndex>>,
    layout: SlotLayout,
}

impl ResourceTimeline {
    /// Build a timeline where every core of every machine is free at every step.
    pub fn new(time_range: TimeRange, machines: &[Machine]) -> Result<Self, ConfigurationError> {
        let interner = MachineInterner::from_keys(machines.iter().map(|m| m.key.as_str()))
            .map_err(ConfigurationError::DuplicateMachine)?;

        let too_large = ConfigurationError::TimeRangeTooLarge {
            min_time: time_range.min_time(),
            max_time: time_range.max_time(),
        };
        let cells = time_range
            .steps()
            .checked_mul(machines.len())
            .ok_or_else(|| too_large.clone())?;
        let mut free: Vec<Vec<CoreIndex>> = Vec::new();
        free.try_reserve_exact(cells).map_err(|_| too_large)?;
        if !machines.is_empty() {
            for _ in 0..time_range.steps() {
                for machine in machines {
                    free.push((0..machine.cores).collect());
                }
            }
        }

        Ok(Self {
            time_range,
            machines: interner,
            free,
            layout: SlotLayout::new(machines),
        })
    }

    #[inline]
    fn cell(&self, offset: usize, machine: MachineIdx) -> usize {
        offset * self.machines.len() + machine as usize
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn machine_index(&self, key: &str) -> Option<MachineIdx> {
        self.machines.get(key)
    }

    pub fn machine_key(&self, machine: MachineIdx) -> Option<&str> {
        self.machines.resolve(machine)
    }

    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    pub fn into_layout(self) -> SlotLayout {
        self.layout
    }

    /// Free cores of `machine` at `time`, or `None` if either is unknown.
    pub fn free_cores(&self, machine: MachineIdx, time: TimeStep) -> Option<&[CoreIndex]> {
        if machine as usize >= self.machines.len() {
            return None;
        }
        let offset = self.time_range.offset(time)?;
        Some(&self.free[self.cell(offset, machine)])
    }

    /// Cores of `machine` free at every step offset of `steps`, in the order of
    /// the first step's free set.
    ///
    /// `steps` must be a non-empty range of offsets within the time range.
    pub fn free_over(&self, machine: MachineIdx, steps: RangeInclusive<usize>) -> Vec<CoreIndex> {
        let (first, last) = steps.into_inner();
        let mut available = self.free[self.cell(first, machine)].clone();
        for offset in first + 1..=last {
            if available.is_empty() {
                break;
            }
            available = intersect_free(&available, &self.free[self.cell(offset, machine)]);
        }
        available
    }

    /// Remove `cores` from the free sets of `machine` at every step offset of `steps`.
    ///
    /// The cores are expected to be free at all those steps.
    pub fn reserve(
        &mut self,
        machine: MachineIdx,
        steps: RangeInclusive<usize>,
        cores: &[CoreIndex],
    ) {
        if cores.is_empty() {
            return;
        }
        for offset in steps {
            let cell = self.cell(offset, machine);
            self.free[cell].retain(|core| !cores.contains(core));
        }
    }
}

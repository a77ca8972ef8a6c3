//! First-fit-in-order core allocator.

use std::ops::RangeInclusive;
use thiserror::Error;

use crate::config::{AllocationConfig, TimeRange};
use crate::interner::MachineIdx;
use crate::models::{Job, Machine, Problem, TimeStep};
use crate::sorting::processing_order;
use crate::validation::ConfigurationError;
use crate::{log_changes, log_checks, log_debug};

use super::layout::SlotLayout;
use super::timeline::ResourceTimeline;

/// Errors that can occur during allocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error(
        "Scheduling problem: machine {machine} does not have enough cores available for job {job} with {demand} demanded cores"
    )]
    SchedulingConflict {
        machine: String,
        job: String,
        demand: u32,
    },
    #[error("Job {0} has already been allocated")]
    AlreadyAllocated(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Result of a successful allocation, ready for rendering.
#[derive(Clone, Debug)]
pub struct Allocation {
    pub time_range: TimeRange,
    pub machines: Vec<Machine>,
    /// Jobs in input order, each holding exactly `demand` cores
    pub jobs: Vec<Job>,
    pub layout: SlotLayout,
}

/// Assigns cores to jobs against an owned resource timeline.
pub struct Allocator {
    timeline: ResourceTimeline,
    config: AllocationConfig,
}

impl Allocator {
    /// Create an allocator with every core free.
    pub fn new(
        time_range: TimeRange,
        machines: &[Machine],
        config: AllocationConfig,
    ) -> Result<Self, SchedulerError> {
        let timeline = ResourceTimeline::new(time_range, machines)?;
        Ok(Self { timeline, config })
    }

    pub fn timeline(&self) -> &ResourceTimeline {
        &self.timeline
    }

    pub fn into_layout(self) -> SlotLayout {
        self.timeline.into_layout()
    }

    /// Allocate all jobs in the configured order.
    ///
    /// Stops at the first job that cannot be placed; jobs processed before it
    /// keep their cores and reservations.
    pub fn allocate(&mut self, jobs: &mut [Job]) -> Result<(), SchedulerError> {
        let verbosity = self.config.verbosity;
        log_changes!(
            verbosity,
            "Allocating {} jobs in {} order",
            jobs.len(),
            self.config.order
        );
        for idx in processing_order(jobs, self.config.order) {
            self.allocate_job(&mut jobs[idx])?;
        }
        Ok(())
    }

    /// Pick the first `demand` cores free over the whole job interval and
    /// reserve them.
    ///
    /// On failure the timeline is left untouched.
    pub fn allocate_job(&mut self, job: &mut Job) -> Result<(), SchedulerError> {
        let verbosity = self.config.verbosity;
        if job.is_allocated() {
            return Err(SchedulerError::AlreadyAllocated(job.id.clone()));
        }
        let (machine, steps) = self.resolve(job)?;

        log_checks!(
            verbosity,
            "Considering job {} on machine {} at [{}, {}] (demand={})",
            job.id,
            job.machine,
            job.start_time,
            job.finish_time,
            job.demand
        );

        let available = self.timeline.free_over(machine, steps.clone());
        log_debug!(verbosity, "  Free over interval: {:?}", available);

        if available.len() < job.demand as usize {
            log_checks!(
                verbosity,
                "  Only {} cores free, {} demanded",
                available.len(),
                job.demand
            );
            return Err(SchedulerError::SchedulingConflict {
                machine: job.machine.clone(),
                job: job.id.clone(),
                demand: job.demand,
            });
        }

        job.cores = available[..job.demand as usize].to_vec();
        job.allocated = true;
        self.timeline.reserve(machine, steps, &job.cores);
        log_changes!(
            verbosity,
            "  Job {} gets cores {:?} of machine {}",
            job.id,
            job.cores,
            job.machine
        );
        Ok(())
    }

    /// Machine index and step offsets of a job, checked against the timeline.
    fn resolve(&self, job: &Job) -> Result<(MachineIdx, RangeInclusive<usize>), ConfigurationError> {
        let machine =
            self.timeline
                .machine_index(&job.machine)
                .ok_or_else(|| ConfigurationError::UnknownMachine {
                    job: job.id.clone(),
                    machine: job.machine.clone(),
                })?;
        if job.finish_time < job.start_time {
            return Err(ConfigurationError::InvertedInterval {
                job: job.id.clone(),
                start_time: job.start_time,
                finish_time: job.finish_time,
            });
        }
        let range = self.timeline.time_range();
        let offset = |time: TimeStep| {
            range.offset(time).ok_or_else(|| ConfigurationError::OutOfRange {
                job: job.id.clone(),
                time,
                min_time: range.min_time(),
                max_time: range.max_time(),
            })
        };
        Ok((machine, offset(job.start_time)?..=offset(job.finish_time)?))
    }
}

/// Allocate every job of a validated problem.
///
/// Any conflict aborts the whole run; no partial allocation is returned.
pub fn allocate(problem: Problem, config: &AllocationConfig) -> Result<Allocation, SchedulerError> {
    let Problem {
        time_range,
        machines,
        mut jobs,
    } = problem;

    let mut allocator = Allocator::new(time_range, &machines, config.clone())?;
    allocator.allocate(&mut jobs)?;

    Ok(Allocation {
        time_range,
        machines,
        jobs,
        layout: allocator.into_layout(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoreIndex;
    use crate::sorting::JobOrder;

    fn problem(machines: Vec<Machine>, jobs: Vec<Job>, min_time: i64, max_time: i64) -> Problem {
        Problem {
            time_range: TimeRange::new(min_time, max_time).unwrap(),
            machines,
            jobs,
        }
    }

    fn cores_of<'a>(allocation: &'a Allocation, id: &str) -> &'a [CoreIndex] {
        &allocation.jobs.iter().find(|j| j.id == id).unwrap().cores
    }

    fn assert_no_double_booking(allocation: &Allocation) {
        for (i, a) in allocation.jobs.iter().enumerate() {
            for b in &allocation.jobs[i + 1..] {
                if a.machine == b.machine && a.overlaps(b) {
                    assert!(
                        a.cores.iter().all(|c| !b.cores.contains(c)),
                        "jobs {} and {} share cores",
                        a.id,
                        b.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_conflict_when_overlap_exhausts_cores() {
        let result = allocate(
            problem(
                vec![Machine::new("0", 2)],
                vec![
                    Job::new("J1", 0, 1, "0", 1),
                    Job::new("J2", 0, 2, "0", 1),
                    Job::new("J3", 1, 2, "0", 2),
                ],
                0,
                2,
            ),
            &AllocationConfig::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            SchedulerError::SchedulingConflict {
                machine: "0".to_string(),
                job: "J3".to_string(),
                demand: 2
            }
        );
    }

    #[test]
    fn test_conflict_after_partial_release() {
        let result = allocate(
            problem(
                vec![Machine::new("0", 2)],
                vec![
                    Job::new("J1", 0, 1, "0", 1),
                    Job::new("J2", 0, 2, "0", 1),
                    Job::new("J3", 2, 2, "0", 2),
                ],
                0,
                2,
            ),
            &AllocationConfig::default(),
        );
        assert!(matches!(
            result,
            Err(SchedulerError::SchedulingConflict { ref job, demand: 2, .. }) if job == "J3"
        ));
    }

    #[test]
    fn test_first_fit_assignment() {
        let mut allocator = Allocator::new(
            TimeRange::new(0, 2).unwrap(),
            &[Machine::new("0", 2)],
            AllocationConfig::default(),
        )
        .unwrap();
        let mut jobs = vec![Job::new("J1", 0, 1, "0", 1), Job::new("J2", 0, 2, "0", 1)];
        allocator.allocate(&mut jobs).unwrap();

        assert_eq!(jobs[0].cores, vec![0]);
        assert_eq!(jobs[1].cores, vec![1]);
        assert_eq!(allocator.timeline().free_cores(0, 1), Some(&[][..]));
        // J1 releases core 0 after step 1
        assert_eq!(allocator.timeline().free_cores(0, 2), Some(&[0][..]));
    }

    #[test]
    fn test_released_cores_are_reused() {
        let allocation = allocate(
            problem(
                vec![Machine::new("0", 2)],
                vec![
                    Job::new("a", 0, 1, "0", 2),
                    Job::new("b", 2, 3, "0", 2),
                    Job::new("c", 4, 4, "0", 1),
                ],
                0,
                4,
            ),
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(cores_of(&allocation, "a"), &[0, 1]);
        assert_eq!(cores_of(&allocation, "b"), &[0, 1]);
        assert_eq!(cores_of(&allocation, "c"), &[0]);
    }

    #[test]
    fn test_intersection_skips_cores_busy_mid_interval() {
        let allocation = allocate(
            problem(
                vec![Machine::new("0", 3)],
                vec![
                    Job::new("mid", 2, 2, "0", 1),
                    Job::new("long", 0, 4, "0", 2),
                ],
                0,
                4,
            ),
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(cores_of(&allocation, "mid"), &[0]);
        assert_eq!(cores_of(&allocation, "long"), &[1, 2]);
        assert_no_double_booking(&allocation);
    }

    #[test]
    fn test_machines_are_independent() {
        let allocation = allocate(
            problem(
                vec![Machine::new("0", 1), Machine::new("1", 2)],
                vec![
                    Job::new("a", 0, 3, "0", 1),
                    Job::new("b", 0, 3, "1", 2),
                    Job::new("c", 4, 5, "0", 1),
                ],
                0,
                5,
            ),
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(cores_of(&allocation, "a"), &[0]);
        assert_eq!(cores_of(&allocation, "b"), &[0, 1]);
        assert_eq!(cores_of(&allocation, "c"), &[0]);
        assert_eq!(allocation.layout.slot("1", 1), Some(2));
    }

    #[test]
    fn test_demand_satisfaction_and_bounds() {
        let machines = vec![Machine::new("0", 4), Machine::new("1", 3)];
        let jobs = vec![
            Job::new("a", 0, 5, "0", 2),
            Job::new("b", 1, 3, "0", 2),
            Job::new("c", 0, 2, "1", 3),
            Job::new("d", 3, 9, "1", 1),
            Job::new("e", 4, 7, "0", 1),
            Job::new("f", 6, 9, "0", 3),
            Job::new("g", 3, 4, "1", 2),
        ];
        let allocation = allocate(
            problem(machines.clone(), jobs, 0, 9),
            &AllocationConfig::default(),
        )
        .unwrap();

        for job in &allocation.jobs {
            assert_eq!(job.cores.len(), job.demand as usize);
            let capacity = machines.iter().find(|m| m.key == job.machine).unwrap().cores;
            assert!(job.cores.iter().all(|&c| c < capacity));
        }
        assert_no_double_booking(&allocation);
    }

    #[test]
    fn test_order_determinism() {
        let build = || {
            problem(
                vec![Machine::new("0", 4)],
                vec![
                    Job::new("a", 0, 3, "0", 1),
                    Job::new("b", 1, 2, "0", 2),
                    Job::new("c", 2, 4, "0", 1),
                    Job::new("d", 3, 4, "0", 2),
                ],
                0,
                4,
            )
        };
        let first = allocate(build(), &AllocationConfig::default()).unwrap();
        let second = allocate(build(), &AllocationConfig::default()).unwrap();
        assert_eq!(first.jobs, second.jobs);
    }

    #[test]
    fn test_failed_job_leaves_timeline_untouched() {
        let mut allocator = Allocator::new(
            TimeRange::new(0, 3).unwrap(),
            &[Machine::new("0", 3)],
            AllocationConfig::default(),
        )
        .unwrap();
        let mut first = Job::new("first", 1, 2, "0", 2);
        allocator.allocate_job(&mut first).unwrap();

        let before: Vec<Vec<CoreIndex>> = (0..=3)
            .map(|t| allocator.timeline().free_cores(0, t).unwrap().to_vec())
            .collect();

        let mut greedy = Job::new("greedy", 0, 3, "0", 2);
        let err = allocator.allocate_job(&mut greedy).unwrap_err();
        assert!(matches!(err, SchedulerError::SchedulingConflict { .. }));
        assert!(greedy.cores.is_empty());

        let after: Vec<Vec<CoreIndex>> = (0..=3)
            .map(|t| allocator.timeline().free_cores(0, t).unwrap().to_vec())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sorted_input_succeeds_in_input_order() {
        // Already ordered by earliest start: input order must match start-time order
        let build = || {
            problem(
                vec![Machine::new("0", 2)],
                vec![
                    Job::new("a", 0, 1, "0", 1),
                    Job::new("b", 0, 3, "0", 1),
                    Job::new("c", 2, 3, "0", 1),
                    Job::new("d", 4, 5, "0", 2),
                ],
                0,
                5,
            )
        };
        let by_input = allocate(build(), &AllocationConfig::default()).unwrap();
        let by_start = allocate(
            build(),
            &AllocationConfig {
                order: JobOrder::StartTime,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(by_input.jobs, by_start.jobs);
    }

    #[test]
    fn test_start_time_order_changes_priority() {
        let build = || {
            problem(
                vec![Machine::new("0", 2)],
                vec![Job::new("late", 3, 4, "0", 1), Job::new("early", 0, 4, "0", 1)],
                0,
                4,
            )
        };
        let by_input = allocate(build(), &AllocationConfig::default()).unwrap();
        assert_eq!(cores_of(&by_input, "late"), &[0]);
        assert_eq!(cores_of(&by_input, "early"), &[1]);

        let by_start = allocate(
            build(),
            &AllocationConfig {
                order: JobOrder::StartTime,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cores_of(&by_start, "early"), &[0]);
        assert_eq!(cores_of(&by_start, "late"), &[1]);
        // Output keeps input order
        assert_eq!(by_start.jobs[0].id, "late");
    }

    #[test]
    fn test_demand_above_capacity_conflicts() {
        let result = allocate(
            problem(vec![Machine::new("7", 2)], vec![Job::new("big", 0, 0, "7", 3)], 0, 0),
            &AllocationConfig::default(),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Scheduling problem: machine 7 does not have enough cores available for job big with 3 demanded cores"
        );
    }

    #[test]
    fn test_zero_demand() {
        let allocation = allocate(
            problem(vec![Machine::new("0", 1)], vec![Job::new("idle", 0, 1, "0", 0)], 0, 1),
            &AllocationConfig::default(),
        )
        .unwrap();
        assert!(allocation.jobs[0].cores.is_empty());
    }

    #[test]
    fn test_zero_demand_job_allocated_only_once() {
        let mut allocator = Allocator::new(
            TimeRange::new(0, 1).unwrap(),
            &[Machine::new("0", 1)],
            AllocationConfig::default(),
        )
        .unwrap();
        let mut idle = Job::new("idle", 0, 1, "0", 0);
        allocator.allocate_job(&mut idle).unwrap();
        assert!(idle.is_allocated());
        assert!(idle.cores.is_empty());
        assert_eq!(
            allocator.allocate_job(&mut idle),
            Err(SchedulerError::AlreadyAllocated("idle".to_string()))
        );
    }

    #[test]
    fn test_unvalidated_jobs_are_rejected() {
        let mut allocator = Allocator::new(
            TimeRange::new(0, 3).unwrap(),
            &[Machine::new("0", 1)],
            AllocationConfig::default(),
        )
        .unwrap();

        let mut unknown = Job::new("u", 0, 1, "9", 1);
        assert!(matches!(
            allocator.allocate_job(&mut unknown),
            Err(SchedulerError::Configuration(
                ConfigurationError::UnknownMachine { .. }
            ))
        ));

        let mut outside = Job::new("o", 2, 4, "0", 1);
        assert!(matches!(
            allocator.allocate_job(&mut outside),
            Err(SchedulerError::Configuration(ConfigurationError::OutOfRange {
                time: 4,
                ..
            }))
        ));

        let mut inverted = Job::new("i", 2, 1, "0", 1);
        assert!(matches!(
            allocator.allocate_job(&mut inverted),
            Err(SchedulerError::Configuration(
                ConfigurationError::InvertedInterval { .. }
            ))
        ));
    }

    #[test]
    fn test_job_allocated_only_once() {
        let mut allocator = Allocator::new(
            TimeRange::new(0, 1).unwrap(),
            &[Machine::new("0", 2)],
            AllocationConfig::default(),
        )
        .unwrap();
        let mut job = Job::new("once", 0, 1, "0", 1);
        allocator.allocate_job(&mut job).unwrap();
        assert_eq!(
            allocator.allocate_job(&mut job),
            Err(SchedulerError::AlreadyAllocated("once".to_string()))
        );
        assert_eq!(allocator.timeline().free_cores(0, 0), Some(&[1][..]));
    }
}

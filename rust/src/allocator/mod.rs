//! Core allocation: reconstructs which cores every job occupies.
//!
//! The resource timeline tracks free cores per step and machine; the allocator
//! walks jobs in order and reserves first-fit cores for each of them.

mod core;
mod layout;
mod timeline;

pub use self::core::{allocate, Allocation, Allocator, SchedulerError};
pub use layout::{MachineBand, SlotLayout};
pub use timeline::{intersect_free, ResourceTimeline};

//! Vertical chart layout: one slot per `(machine, core)`.

use rustc_hash::FxHashMap;

use crate::models::{CoreIndex, Machine};

/// The consecutive slots occupied by one machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineBand {
    pub key: String,
    /// Slot of core 0
    pub first_slot: u32,
    pub cores: u32,
}

/// Mapping `(machine, core) -> slot`, grouped by machine in declaration order
/// and increasing with the core index inside each machine.
#[derive(Clone, Debug, Default)]
pub struct SlotLayout {
    bands: Vec<MachineBand>,
    by_key: FxHashMap<String, usize>,
}

impl SlotLayout {
    /// Lay out machines one after another. Keys are expected to be unique.
    pub fn new(machines: &[Machine]) -> Self {
        let mut bands = Vec::with_capacity(machines.len());
        let mut by_key = FxHashMap::with_capacity_and_hasher(machines.len(), Default::default());
        let mut next_slot = 0u32;
        for machine in machines {
            by_key.insert(machine.key.clone(), bands.len());
            bands.push(MachineBand {
                key: machine.key.clone(),
                first_slot: next_slot,
                cores: machine.cores,
            });
            next_slot += machine.cores;
        }
        Self { bands, by_key }
    }

    /// Slot of a core, or `None` for an unknown machine or a core beyond its capacity.
    pub fn slot(&self, machine: &str, core: CoreIndex) -> Option<u32> {
        let band = &self.bands[*self.by_key.get(machine)?];
        (core < band.cores).then(|| band.first_slot + core)
    }

    pub fn bands(&self) -> &[MachineBand] {
        &self.bands
    }

    pub fn total_slots(&self) -> u32 {
        self.bands.iter().map(|b| b.cores).sum()
    }

    /// All `(machine, core, slot)` triples in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, CoreIndex, u32)> + '_ {
        self.bands.iter().flat_map(|band| {
            (0..band.cores).map(move |core| (band.key.as_str(), core, band.first_slot + core))
        })
    }
}

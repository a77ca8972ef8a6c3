//! Dense indices for machine keys.
//!
//! The resource timeline is a flat `(step, machine)` grid, so machine keys are
//! mapped to consecutive integers in declaration order.

use rustc_hash::FxHashMap;

/// Interned machine index (u32 for compact storage and fast hashing).
pub type MachineIdx = u32;

/// Bidirectional mapping between machine keys and their indices.
#[derive(Debug, Clone, Default)]
pub struct MachineInterner {
    to_idx: FxHashMap<String, MachineIdx>,
    keys: Vec<String>,
}

impl MachineInterner {
    /// Index all keys in iteration order.
    ///
    /// Returns the first repeated key as the error.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let keys = keys.into_iter();
        let mut interner = Self {
            to_idx: FxHashMap::with_capacity_and_hasher(keys.size_hint().0, Default::default()),
            keys: Vec::with_capacity(keys.size_hint().0),
        };
        for key in keys {
            if interner.to_idx.contains_key(key) {
                return Err(key.to_string());
            }
            interner.to_idx.insert(key.to_string(), interner.keys.len() as MachineIdx);
            interner.keys.push(key.to_string());
        }
        Ok(interner)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<MachineIdx> {
        self.to_idx.get(key).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: MachineIdx) -> Option<&str> {
        self.keys.get(idx as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

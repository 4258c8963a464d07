use std::iter;

use crate::addr::{Address, Geometry, Slot};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u64,
}

impl CacheLine {
    fn apply(&mut self, slot: Slot) {
        self.valid = true;
        self.tag = slot.tag;
    }

    fn clear(&mut self) {
        *self = CacheLine::default();
    }

    fn holds(&self, slot: Slot) -> bool {
        self.valid && self.tag == slot.tag
    }
}

/// One direct-mapped tier of the hierarchy.
#[derive(Debug, Clone)]
pub struct CacheLevel {
    name: String,
    lines: Vec<CacheLine>,
    geometry: Geometry,
    latency: u64,
}

impl CacheLevel {
    pub(crate) fn new(name: String, geometry: Geometry, latency: u64) -> Self {
        CacheLevel {
            name,
            lines: iter::repeat_with(CacheLine::default)
                .take(geometry.num_lines())
                .collect(),
            geometry,
            latency,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn latency(&self) -> u64 {
        self.latency
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.lines.get(index).map_or(false, |l| l.valid)
    }

    pub fn contains(&self, address: Address) -> bool {
        let slot = self.geometry.decode(address);
        self.lines[slot.index].holds(slot)
    }

    /// Places the block of `address` in its slot and returns the base
    /// address of the block it displaced, if any. Re-installing the resident
    /// block is a no-op.
    pub fn install(&mut self, address: Address) -> Option<Address> {
        let geometry = self.geometry;
        let slot = geometry.decode(address);
        let line = &mut self.lines[slot.index];
        if line.holds(slot) {
            return None;
        }

        let evicted = line.valid.then(|| {
            geometry.encode(Slot {
                index: slot.index,
                tag: line.tag,
            })
        });
        line.apply(slot);
        evicted
    }

    /// Clears the slot of `address` if it holds that block. Returns whether
    /// anything was cleared.
    pub fn invalidate(&mut self, address: Address) -> bool {
        let slot = self.geometry.decode(address);
        let line = &mut self.lines[slot.index];
        if line.holds(slot) {
            line.clear();
            true
        } else {
            false
        }
    }

    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }
}

//! Address decomposition for direct-mapped levels.

use std::ops::Not;

pub type Address = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub tag: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BitSection {
    shift: u32,
    mask: u64,
}

impl BitSection {
    fn apply(&self, num: Address) -> u64 {
        (num >> self.shift) & self.mask
    }
}

/// Bit layout of one level: `| tag | index | offset |`.
///
/// Widths come from the position of the single set bit in the (power of two)
/// block size and line count, so no floating point is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    capacity: u64,
    block_size: u64,
    offset_bits: u32,
    index_bits: u32,
    index_sec: BitSection,
    tag_sec: BitSection,
}

impl Geometry {
    /// Both sizes must already be validated powers of two with
    /// `capacity >= block_size` (see `Config::validate`).
    pub(crate) fn new(capacity: u64, block_size: u64) -> Self {
        debug_assert!(block_size.is_power_of_two());
        debug_assert!(capacity.is_power_of_two() && capacity >= block_size);

        let offset_bits = block_size.trailing_zeros();
        let num_lines = capacity / block_size;
        let index_bits = num_lines.trailing_zeros();

        let index_sec = BitSection {
            shift: offset_bits,
            mask: num_lines - 1,
        };
        let tag_sec = BitSection {
            shift: offset_bits + index_bits,
            mask: 0u64.not(),
        };

        Geometry {
            capacity,
            block_size,
            offset_bits,
            index_bits,
            index_sec,
            tag_sec,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn num_lines(&self) -> usize {
        (self.capacity / self.block_size) as usize
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Remaining high bits of an `address_bits` wide address.
    pub fn tag_bits(&self, address_bits: u32) -> u32 {
        address_bits.saturating_sub(self.index_bits + self.offset_bits)
    }

    pub fn decode(&self, address: Address) -> Slot {
        Slot {
            index: self.index_sec.apply(address) as usize,
            tag: self.tag_sec.apply(address),
        }
    }

    /// Rebuilds the block-aligned base address; the in-block offset is lost.
    pub fn encode(&self, slot: Slot) -> Address {
        (slot.tag << self.tag_sec.shift) | ((slot.index as u64) << self.index_sec.shift)
    }
}

/// `address` with its in-block offset cleared.
pub fn block_base(address: Address, block_size: u64) -> Address {
    address & !(block_size - 1)
}

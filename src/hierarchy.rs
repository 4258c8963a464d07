use std::fmt;

use log::{debug, info, trace};

use crate::{
    addr::{block_base, Address, Geometry},
    cache::CacheLevel,
    config::Config,
    error::{AccessError, ConfigError},
    stats::{Stats, StatsCollector},
};

/// Where an access was satisfied, judged before the access moved anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitLevel {
    /// 0-based cache tier, `Cache(0)` is L1.
    Cache(usize),
    Dram,
}

impl HitLevel {
    pub fn is_hit(&self) -> bool {
        matches!(self, HitLevel::Cache(_))
    }
}

impl fmt::Display for HitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitLevel::Cache(level) => write!(f, "L{}", level + 1),
            HitLevel::Dram => f.write_str("DRAM"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessResult {
    pub hit_level: HitLevel,
    pub cycles: u64,
    /// Block pushed out of the last level by this access.
    pub retirement: Option<Address>,
}

/// Direct-mapped multi-level hierarchy with promotion to L1.
///
/// Every access is classified against the levels as they were before the
/// access, then the block is installed in L1 and displaced blocks cascade
/// one level down. Whatever falls out of the last level is retired to DRAM.
/// Finally stale copies of the accessed block in the lower levels are
/// invalidated, so a block lives in at most one level between accesses.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    levels: Vec<CacheLevel>,
    dram_latency: u64,
    address_bits: u32,
    block_size: u64,
    stats: StatsCollector,
}

impl Hierarchy {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let levels: Vec<CacheLevel> = config
            .levels
            .iter()
            .enumerate()
            .map(|(i, lc)| {
                CacheLevel::new(
                    config.level_name(i),
                    Geometry::new(lc.capacity, config.block_size),
                    lc.latency,
                )
            })
            .collect();

        for level in &levels {
            let geo = level.geometry();
            info!(
                "{}: {} bytes, {} lines, {} cycles",
                level.name(),
                geo.capacity(),
                geo.num_lines(),
                level.latency()
            );
        }

        Ok(Hierarchy {
            stats: StatsCollector::new(levels.len()),
            levels,
            dram_latency: config.dram_latency,
            address_bits: config.address_bits,
            block_size: config.block_size,
        })
    }

    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    pub fn stats(&self) -> Stats {
        self.stats.snapshot()
    }

    /// Levels currently holding the block of `address`, L1 first.
    pub fn resident_levels(&self, address: Address) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| level.contains(address))
            .map(|(i, _)| i)
            .collect()
    }

    fn check_address(&self, address: Address) -> Result<(), AccessError> {
        if self.address_bits < 64 && address >> self.address_bits != 0 {
            return Err(AccessError::InvalidAddress {
                address,
                address_bits: self.address_bits,
            });
        }
        Ok(())
    }

    pub fn access(&mut self, address: Address) -> Result<AccessResult, AccessError> {
        self.check_address(address)?;

        let hit_level = self.classify(address);
        let cycles = match hit_level {
            HitLevel::Cache(level) => self.levels[level].latency(),
            HitLevel::Dram => self.dram_latency,
        };
        let retirement = self.promote(address);
        self.cleanup(address);

        let result = AccessResult {
            hit_level,
            cycles,
            retirement,
        };
        debug!("{address:#010x}: {hit_level} ({cycles} cycles)");
        self.stats.record(&result);
        Ok(result)
    }

    /// Feeds every address in order and returns the resulting counters.
    pub fn run<I>(&mut self, addresses: I) -> Result<Stats, AccessError>
    where
        I: IntoIterator<Item = Address>,
    {
        for address in addresses {
            self.access(address)?;
        }
        Ok(self.stats())
    }

    fn classify(&self, address: Address) -> HitLevel {
        self.levels
            .iter()
            .position(|level| level.contains(address))
            .map_or(HitLevel::Dram, HitLevel::Cache)
    }

    fn promote(&mut self, address: Address) -> Option<Address> {
        let mut incoming = address;
        for level in &mut self.levels {
            match level.install(incoming) {
                Some(victim) => {
                    trace!("{}: {victim:#010x} displaced by {incoming:#010x}", level.name());
                    incoming = victim;
                }
                None => return None,
            }
        }

        // A stale lower copy of the accessed block can be pushed out here;
        // it already lives in L1, so it is not a retirement.
        if block_base(incoming, self.block_size) == block_base(address, self.block_size) {
            return None;
        }
        info!("{incoming:#010x} retired to DRAM");
        Some(incoming)
    }

    fn cleanup(&mut self, address: Address) {
        for level in self.levels.iter_mut().skip(1) {
            if level.invalidate(address) {
                trace!("{}: dropped stale copy of {address:#010x}", level.name());
            }
        }
    }
}

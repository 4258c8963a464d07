use serde::Serialize;

use crate::hierarchy::{AccessResult, HitLevel};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub cycles: u64,
    /// Hits per cache level, L1 first.
    pub level_hits: Vec<u64>,
    pub retirements: u64,
}

impl Stats {
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        self.hits as f64 / self.accesses as f64
    }

    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        self.misses as f64 / self.accesses as f64
    }
}

#[derive(Debug, Clone)]
pub struct StatsCollector {
    stats: Stats,
}

impl StatsCollector {
    pub fn new(n_levels: usize) -> Self {
        StatsCollector {
            stats: Stats {
                level_hits: vec![0; n_levels],
                ..Stats::default()
            },
        }
    }

    pub(crate) fn record(&mut self, result: &AccessResult) {
        let stats = &mut self.stats;
        stats.accesses += 1;
        stats.cycles += result.cycles;
        match result.hit_level {
            HitLevel::Cache(level) => {
                stats.hits += 1;
                stats.level_hits[level] += 1;
            }
            HitLevel::Dram => stats.misses += 1,
        }
        if result.retirement.is_some() {
            stats.retirements += 1;
        }
    }

    pub fn snapshot(&self) -> Stats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_without_accesses() {
        let stats = StatsCollector::new(3).snapshot();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 0.0);
        assert_eq!(stats.level_hits, vec![0, 0, 0]);
    }

    #[test]
    fn record_counts() {
        let mut collector = StatsCollector::new(3);
        collector.record(&AccessResult {
            hit_level: HitLevel::Dram,
            cycles: 200,
            retirement: None,
        });
        collector.record(&AccessResult {
            hit_level: HitLevel::Cache(2),
            cycles: 40,
            retirement: Some(0x40),
        });
        collector.record(&AccessResult {
            hit_level: HitLevel::Cache(0),
            cycles: 4,
            retirement: None,
        });

        let stats = collector.snapshot();
        assert_eq!(stats.accesses, 3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits + stats.misses, stats.accesses);
        assert_eq!(stats.cycles, 244);
        assert_eq!(stats.level_hits, vec![1, 0, 1]);
        assert_eq!(stats.retirements, 1);
        assert!((stats.miss_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn serializes_as_json() {
        let stats = StatsCollector::new(1).snapshot();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["accesses"], 0);
        assert_eq!(json["level_hits"], serde_json::json!([0]));
    }
}

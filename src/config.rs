use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on lines per level; line arrays are allocated eagerly.
pub const MAX_LINES: u64 = 1 << 26;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub capacity: u64,
    pub latency: u64,
}

impl LevelConfig {
    pub fn new(capacity: u64, latency: u64) -> Self {
        LevelConfig {
            name: None,
            capacity,
            latency,
        }
    }
}

/// Construction-time description of a hierarchy. Every field has a default,
/// so `{}` deserializes to the classic 16 KiB / 32 KiB / 2 MiB setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub block_size: u64,
    pub address_bits: u32,
    pub levels: Vec<LevelConfig>,
    pub dram_latency: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            block_size: 64,
            address_bits: 32,
            levels: vec![
                LevelConfig::new(16 * 1024, 4),
                LevelConfig::new(32 * 1024, 12),
                LevelConfig::new(2 * 1024 * 1024, 40),
            ],
            dram_latency: 200,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn level_name(&self, level: usize) -> String {
        self.levels
            .get(level)
            .and_then(|l| l.name.clone())
            .unwrap_or_else(|| format!("L{}", level + 1))
    }

    /// Reports the first violated constraint, checking levels in order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if !(1..=64).contains(&self.address_bits) {
            return Err(ConfigError::AddressBits(self.address_bits));
        }
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(self.block_size));
        }

        let mut previous: Option<u64> = None;
        for (i, level) in self.levels.iter().enumerate() {
            let capacity = level.capacity;
            if !capacity.is_power_of_two() {
                return Err(ConfigError::CapacityNotPowerOfTwo {
                    level: self.level_name(i),
                    capacity,
                });
            }
            if capacity < self.block_size {
                return Err(ConfigError::CapacityBelowBlockSize {
                    level: self.level_name(i),
                    capacity,
                    block_size: self.block_size,
                });
            }
            // offset + index bits may not exceed the address width
            if capacity.trailing_zeros() > self.address_bits {
                return Err(ConfigError::CapacityExceedsAddressSpace {
                    level: self.level_name(i),
                    capacity,
                    address_bits: self.address_bits,
                });
            }
            let lines = capacity / self.block_size;
            if lines > MAX_LINES {
                return Err(ConfigError::TooManyLines {
                    level: self.level_name(i),
                    lines,
                    max: MAX_LINES,
                });
            }
            if let Some(previous) = previous {
                if capacity <= previous {
                    return Err(ConfigError::CapacityNotIncreasing {
                        level: self.level_name(i),
                        capacity,
                        previous,
                    });
                }
            }
            previous = Some(capacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_json() {
        let config = Config::from_json(
            r#"{
                "block_size": 32,
                "levels": [
                    { "name": "I$", "capacity": 1024, "latency": 1 },
                    { "capacity": 4096, "latency": 10 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.block_size, 32);
        assert_eq!(config.address_bits, 32);
        assert_eq!(config.dram_latency, 200);
        assert_eq!(config.level_name(0), "I$");
        assert_eq!(config.level_name(1), "L2");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_non_power_of_two_block() {
        let config = Config {
            block_size: 48,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BlockSizeNotPowerOfTwo(48))
        );
    }

    #[test]
    fn rejects_non_power_of_two_capacity() {
        let mut config = Config::default();
        config.levels[1].capacity = 24 * 1024;
        assert_eq!(
            config.validate(),
            Err(ConfigError::CapacityNotPowerOfTwo {
                level: "L2".into(),
                capacity: 24 * 1024
            })
        );
    }

    #[test]
    fn rejects_capacity_below_block() {
        let config = Config {
            levels: vec![LevelConfig::new(32, 1)],
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityBelowBlockSize { capacity: 32, .. })
        ));
    }

    #[test]
    fn rejects_non_increasing() {
        let config = Config {
            levels: vec![LevelConfig::new(4096, 1), LevelConfig::new(4096, 2)],
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CapacityNotIncreasing {
                level: "L2".into(),
                capacity: 4096,
                previous: 4096
            })
        );
    }

    #[test]
    fn rejects_bad_address_width() {
        for bits in [0, 65] {
            let config = Config {
                address_bits: bits,
                ..Config::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::AddressBits(bits)));
        }
    }

    #[test]
    fn rejects_level_larger_than_address_space() {
        let config = Config {
            address_bits: 16,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityExceedsAddressSpace { capacity, .. }) if capacity == 2 * 1024 * 1024
        ));
    }

    #[test]
    fn rejects_huge_level() {
        let config = Config {
            address_bits: 64,
            levels: vec![LevelConfig::new(1 << 62, 1)],
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyLines {
                level: "L1".into(),
                lines: 1 << 56,
                max: MAX_LINES
            })
        );
    }

    #[test]
    fn accepts_level_at_line_limit() {
        let config = Config {
            levels: vec![LevelConfig::new(MAX_LINES * 64, 1)],
            ..Config::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_levels() {
        let config = Config {
            levels: vec![],
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoLevels));
    }
}

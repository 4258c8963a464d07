pub mod addr;
pub mod cache;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod report;
pub mod stats;
pub mod trace;

pub use addr::{Address, Geometry, Slot};
pub use cache::{CacheLevel, CacheLine};
pub use config::{Config, LevelConfig};
pub use error::{AccessError, ConfigError, Error, TraceError};
pub use hierarchy::{AccessResult, Hierarchy, HitLevel};
pub use stats::{Stats, StatsCollector};

use crate::addr::Address;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("hierarchy needs at least one cache level")]
    NoLevels,

    #[error("address width must be between 1 and 64 bits (got {0})")]
    AddressBits(u32),

    #[error("block size {0} is not a power of two")]
    BlockSizeNotPowerOfTwo(u64),

    #[error("{level}: capacity {capacity} is not a power of two")]
    CapacityNotPowerOfTwo { level: String, capacity: u64 },

    #[error("{level}: capacity {capacity} is smaller than the block size {block_size}")]
    CapacityBelowBlockSize {
        level: String,
        capacity: u64,
        block_size: u64,
    },

    #[error("{level}: capacity {capacity} does not fit a {address_bits}-bit address space")]
    CapacityExceedsAddressSpace {
        level: String,
        capacity: u64,
        address_bits: u32,
    },

    #[error("{level}: {lines} lines exceed the limit of {max} lines per level")]
    TooManyLines { level: String, lines: u64, max: u64 },

    #[error("{level}: capacity {capacity} must be larger than the previous level ({previous})")]
    CapacityNotIncreasing {
        level: String,
        capacity: u64,
        previous: u64,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("address {address:#x} does not fit in {address_bits} bits")]
    InvalidAddress { address: Address, address_bits: u32 },
}

#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: cannot parse address {text:?}")]
    Parse { line: usize, text: String },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Args(#[from] pico_args::Error),
}

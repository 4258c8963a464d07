use std::{
    fs,
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};

use crossbeam::channel::{Receiver, Sender};
use xz2::read::XzDecoder;

use crate::{addr::Address, error::TraceError};

pub const GOLDEN_A: Address = 0x1A2B3C00;
pub const GOLDEN_B: Address = 0xCA1B3C00;
pub const GOLDEN_C: Address = 0x3A2B3C00;
pub const GOLDEN_D: Address = 0x2A2B3C00;
pub const GOLDEN_E: Address = 0xCA1B2C00;

/// Five addresses that collide in L1 slot 240 (E in slot 176), replayed in a
/// fixed order. Used as a regression trace.
pub fn golden() -> Vec<Address> {
    let (a, b, c, d, e) = (GOLDEN_A, GOLDEN_B, GOLDEN_C, GOLDEN_D, GOLDEN_E);
    vec![
        b, a, c, e, d, b, a, d, e, c, a, d, e, c, b, e, c, a, d, b,
    ]
}

fn address_mask(address_bits: u32) -> Address {
    if address_bits >= 64 {
        Address::MAX
    } else {
        (1 << address_bits) - 1
    }
}

/// `len` uniformly random addresses of `address_bits` width.
pub fn random(seed: u64, len: usize, address_bits: u32) -> Vec<Address> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mask = address_mask(address_bits);
    (0..len).map(|_| rng.u64(..) & mask).collect()
}

/// Like [`random`], but drawn from `pool_size` distinct addresses so blocks
/// recur and fight over slots.
pub fn random_from_pool(seed: u64, len: usize, pool_size: usize, address_bits: u32) -> Vec<Address> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mask = address_mask(address_bits);
    let pool: Vec<Address> = (0..pool_size.max(1)).map(|_| rng.u64(..) & mask).collect();
    (0..len).map(|_| pool[rng.usize(..pool.len())]).collect()
}

/// Parses `0x`-prefixed hex or plain decimal. Blank lines and `#` comments
/// yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Address, std::num::ParseIntError>> {
    let text = line.split('#').next().unwrap_or("").trim();
    if text.is_empty() {
        return None;
    }
    let text = text.replace('_', "");
    Some(
        match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => Address::from_str_radix(hex, 16),
            None => text.parse(),
        },
    )
}

/// Address trace file read on a background thread and handed over in
/// batches. Files ending in `.xz` are decompressed on the fly.
pub struct Trace {
    pub rec: Receiver<Result<Vec<Address>, TraceError>>,
    _thread: JoinHandle<()>,
}

impl Trace {
    pub fn read(path: PathBuf, addrs_per_block: usize, blocks_per_queue: usize) -> io::Result<Trace> {
        let file = fs::File::open(&path)?;
        let stream: Box<dyn Read + Send> = if is_xz(&path) {
            Box::new(XzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Trace::from_reader(stream, addrs_per_block, blocks_per_queue))
    }

    pub fn from_reader<R>(stream: R, addrs_per_block: usize, blocks_per_queue: usize) -> Trace
    where
        R: Read + Send + 'static,
    {
        let (sender, receiver) = crossbeam::channel::bounded(blocks_per_queue.max(1));
        let addrs_per_block = addrs_per_block.max(1);
        let t = thread::spawn(move || Trace::run_thread(stream, addrs_per_block, sender));
        Trace {
            rec: receiver,
            _thread: t,
        }
    }

    fn run_thread<R: Read>(
        stream: R,
        addrs_per_block: usize,
        queue: Sender<Result<Vec<Address>, TraceError>>,
    ) {
        let mut buffer = Vec::with_capacity(addrs_per_block);
        for (idx, line) in BufReader::new(stream).lines().enumerate() {
            let parsed = match line {
                Ok(line) => match parse_line(&line) {
                    None => continue,
                    Some(Ok(address)) => Ok(address),
                    Some(Err(_)) => Err(TraceError::Parse {
                        line: idx + 1,
                        text: line.trim().to_string(),
                    }),
                },
                Err(err) => Err(TraceError::Io(err)),
            };

            match parsed {
                Ok(address) => {
                    buffer.push(address);
                    if buffer.len() == addrs_per_block {
                        let full = std::mem::replace(&mut buffer, Vec::with_capacity(addrs_per_block));
                        if queue.send(Ok(full)).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    if !buffer.is_empty() {
                        let _ = queue.send(Ok(std::mem::take(&mut buffer)));
                    }
                    let _ = queue.send(Err(err));
                    return;
                }
            }
        }
        if !buffer.is_empty() {
            let _ = queue.send(Ok(buffer));
        }
    }
}

impl Iterator for Trace {
    type Item = Result<Vec<Address>, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rec.recv().ok()
    }
}

fn is_xz(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "xz")
}

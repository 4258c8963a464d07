//! Human-readable views of a hierarchy. Nothing here mutates cache state.

use crate::{addr::Address, cache::CacheLevel, hierarchy::Hierarchy, stats::Stats};

pub fn geometry_summary(level: &CacheLevel, address_bits: u32) -> String {
    let geo = level.geometry();
    format!(
        "{}: {} Index Bits, {} Tag Bits, {} Offset Bits, 1 Valid Bit",
        level.name(),
        geo.index_bits(),
        geo.tag_bits(address_bits),
        geo.offset_bits()
    )
}

pub fn index_and_tag(level: &CacheLevel, address: Address) -> String {
    let slot = level.geometry().decode(address);
    format!(
        "{} Address {:08X}: Index = {}, Tag = {:08X}",
        level.name(),
        address,
        slot.index,
        slot.tag
    )
}

/// Table of the valid lines of `level`.
pub fn dump(level: &CacheLevel) -> String {
    let mut out = format!("{} Cache Contents:\nIndex | Valid | Tag\n", level.name());
    for (index, line) in level.lines().iter().enumerate().filter(|(_, l)| l.valid) {
        out.push_str(&format!(
            "{:5} | {:5} | {:08X}\n",
            index, line.valid as u8, line.tag
        ));
    }
    out
}

pub fn summary(hierarchy: &Hierarchy, stats: &Stats) -> String {
    let mut out = format!(
        "Accesses: {}  Hits: {}  Misses: {}  Cycles: {}  Retired: {}\n",
        stats.accesses, stats.hits, stats.misses, stats.cycles, stats.retirements
    );
    for (level, hits) in hierarchy.levels().iter().zip(&stats.level_hits) {
        out.push_str(&format!("  {} hits: {}\n", level.name(), hits));
    }
    out.push_str(&format!("  Miss rate: {:.2}%\n", stats.miss_rate() * 100.0));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn default_geometry_lines() {
        let h = Hierarchy::new(&Config::default()).unwrap();
        let lines: Vec<String> = h
            .levels()
            .iter()
            .map(|l| geometry_summary(l, h.address_bits()))
            .collect();
        assert_eq!(
            lines,
            vec![
                "L1: 8 Index Bits, 18 Tag Bits, 6 Offset Bits, 1 Valid Bit",
                "L2: 9 Index Bits, 17 Tag Bits, 6 Offset Bits, 1 Valid Bit",
                "L3: 15 Index Bits, 11 Tag Bits, 6 Offset Bits, 1 Valid Bit",
            ]
        );
    }

    #[test]
    fn index_and_tag_line() {
        let h = Hierarchy::new(&Config::default()).unwrap();
        assert_eq!(
            index_and_tag(&h.levels()[0], 0x1A2B3C4D),
            "L1 Address 1A2B3C4D: Index = 241, Tag = 000068AC"
        );
    }

    #[test]
    fn dump_lists_valid_lines() {
        let mut h = Hierarchy::new(&Config::default()).unwrap();
        h.access(0x1A2B3C4D).unwrap();
        let text = dump(&h.levels()[0]);
        assert_eq!(
            text,
            "L1 Cache Contents:\nIndex | Valid | Tag\n  241 |     1 | 000068AC\n"
        );
    }

    #[test]
    fn summary_lists_levels() {
        let mut h = Hierarchy::new(&Config::default()).unwrap();
        let stats = h.run([0x40, 0x40]).unwrap();
        assert_eq!(
            summary(&h, &stats),
            "Accesses: 2  Hits: 1  Misses: 1  Cycles: 204  Retired: 0\n  \
             L1 hits: 1\n  L2 hits: 0\n  L3 hits: 0\n  Miss rate: 50.00%\n"
        );
    }
}

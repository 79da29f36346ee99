use std::fmt;

/// Shape of the simulated cache: `2^s` sets of `E` lines, each line caching
/// a block of `2^b` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    pub set_bits: u32,        // s
    pub associativity: usize, // E, set to 1 for Direct-Mapped
    pub block_bits: u32,      // b
}

impl CacheGeometry {
    pub fn new(set_bits: u32, associativity: usize, block_bits: u32) -> Self {
        Self {
            set_bits,
            associativity,
            block_bits,
        }
    }

    pub fn num_sets(&self) -> usize {
        1usize << self.set_bits
    }

    /// Block size in bytes.
    pub fn block_size(&self) -> u64 {
        1u64.checked_shl(self.block_bits).unwrap_or(0)
    }

    /// Total data capacity in bytes, saturating for absurd geometries.
    pub fn capacity(&self) -> u64 {
        (self.num_sets() as u64)
            .saturating_mul(self.associativity as u64)
            .saturating_mul(self.block_size())
    }

    /// Bits below the tag, `s + b`. `None` when the sum overflows.
    pub fn index_bits(&self) -> Option<u32> {
        self.set_bits.checked_add(self.block_bits)
    }

    /// The `s` bits sitting right above the block offset.
    pub fn set_index(&self, address: u64) -> usize {
        let mask = 1u64.checked_shl(self.set_bits).map_or(u64::MAX, |v| v - 1);
        (address.checked_shr(self.block_bits).unwrap_or(0) & mask) as usize
    }

    /// Everything above the set index. Zero when `s + b` covers the whole address.
    pub fn tag(&self, address: u64) -> u64 {
        self.index_bits()
            .and_then(|shift| address.checked_shr(shift))
            .unwrap_or(0)
    }
}

impl fmt::Display for CacheGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s={} E={} b={} ({} sets, {}B blocks)",
            self.set_bits,
            self.associativity,
            self.block_bits,
            self.num_sets(),
            self.block_size()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_index_skips_block_offset() {
        let geometry = CacheGeometry::new(2, 1, 2);
        assert_eq!(geometry.set_index(0), 0);
        assert_eq!(geometry.set_index(3), 0);
        assert_eq!(geometry.set_index(4), 1);
        assert_eq!(geometry.set_index(16), 0);
        assert_eq!(geometry.set_index(0x1c), 3);
    }

    #[test]
    fn tag_keeps_high_bits() {
        let geometry = CacheGeometry::new(2, 1, 2);
        assert_eq!(geometry.tag(0), 0);
        assert_eq!(geometry.tag(15), 0);
        assert_eq!(geometry.tag(16), 1);
        assert_eq!(geometry.tag(0xdead_beef), 0xdead_beef >> 4);
    }

    #[test]
    fn zero_set_bits_maps_everything_to_set_zero() {
        let geometry = CacheGeometry::new(0, 4, 4);
        assert_eq!(geometry.num_sets(), 1);
        assert_eq!(geometry.set_index(u64::MAX), 0);
        assert_eq!(geometry.tag(0x30), 3);
    }

    #[test]
    fn full_width_offset_yields_zero_tag() {
        let geometry = CacheGeometry::new(4, 1, 60);
        assert_eq!(geometry.tag(u64::MAX), 0);
        assert_eq!(geometry.set_index(u64::MAX), 0xf);
    }

    #[test]
    fn oversized_widths_still_decode() {
        let geometry = CacheGeometry::new(3, 1, u32::MAX);
        assert_eq!(geometry.index_bits(), None);
        assert_eq!(geometry.tag(u64::MAX), 0);
        assert_eq!(geometry.set_index(u64::MAX), 0);

        let wide = CacheGeometry::new(64, 1, 0);
        assert_eq!(wide.set_index(0xdead_beef), 0xdead_beef);
        assert_eq!(wide.tag(0xdead_beef), 0);
    }

    #[test]
    fn capacity_is_sets_times_ways_times_block() {
        let geometry = CacheGeometry::new(4, 2, 5);
        assert_eq!(geometry.num_sets(), 16);
        assert_eq!(geometry.block_size(), 32);
        assert_eq!(geometry.capacity(), 16 * 2 * 32);
    }
}

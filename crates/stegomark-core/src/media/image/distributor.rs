//! Pseudo random, repeatable spreading of payload bits over the cover.
//!
//! The distributor is a keyed permutation of `0..size`. It is evaluated per index, so no
//! table of `size` entries is ever built, which keeps large covers cheap.

use fastrand::Rng;

const ROUNDS: usize = 6;

/// Keyed Feistel permutation over `0..size` with cycle walking.
///
/// The Feistel network permutes the smallest power of two with an even number of bits that
/// covers `size`; indices that land outside of `0..size` are permuted again until they fall
/// inside. The same seed and size always give the same order.
#[derive(Debug, Clone)]
pub struct BitDistributor {
    size: u64,
    half_bits: u32,
    half_mask: u64,
    round_keys: [u64; ROUNDS],
}

impl BitDistributor {
    pub fn new(seed: &[u8], size: u64) -> Self {
        let mut rng = Rng::with_seed(hash_seed(seed));
        let round_keys = std::array::from_fn(|_| rng.u64(..));

        let domain_bits = (u64::BITS - size.saturating_sub(1).leading_zeros()).max(2);
        let half_bits = domain_bits.div_ceil(2);

        Self {
            size,
            half_bits,
            half_mask: (1u64 << half_bits) - 1,
            round_keys,
        }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The position the `index`-th bit goes to, `index` must be below [`len`](Self::len).
    pub fn get(&self, index: u64) -> u64 {
        debug_assert!(index < self.size);
        let mut x = index;
        loop {
            x = self.feistel(x);
            if x < self.size {
                return x;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.size).map(move |i| self.get(i))
    }

    fn feistel(&self, x: u64) -> u64 {
        let mut left = x >> self.half_bits;
        let mut right = x & self.half_mask;
        for key in self.round_keys {
            let next = left ^ (mix(right ^ key) & self.half_mask);
            left = right;
            right = next;
        }
        (left << self.half_bits) | right
    }
}

/// splitmix64 finalizer
#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// FNV-1a of the seed bytes
fn hash_seed(seed: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    seed.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ (byte as u64)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_is_a_permutation() {
        for size in [1u64, 2, 3, 5, 17, 64, 100, 1000, 4097] {
            let distributor = BitDistributor::new(b"seed", size);
            let seen: HashSet<u64> = distributor.iter().collect();

            assert_eq!(seen.len() as u64, size, "size {size}");
            assert!(seen.iter().all(|i| *i < size));
        }
    }

    #[test]
    fn test_deterministic() {
        let a: Vec<u64> = BitDistributor::new(b"password", 500).iter().collect();
        let b: Vec<u64> = BitDistributor::new(b"password", 500).iter().collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_order() {
        let a: Vec<u64> = BitDistributor::new(b"password", 500).iter().collect();
        let b: Vec<u64> = BitDistributor::new(b"passworD", 500).iter().collect();

        assert_ne!(a, b);
    }

    #[test]
    fn test_spreads_over_the_range() {
        let distributor = BitDistributor::new(b"seed", 10_000);
        let first: Vec<u64> = distributor.iter().take(100).collect();

        assert!(first.iter().any(|i| *i >= 5_000));
        assert!(first.iter().any(|i| *i < 5_000));
        assert_ne!(first, (0..100).collect::<Vec<u64>>());
    }

    #[test]
    fn test_empty() {
        let distributor = BitDistributor::new(b"seed", 0);

        assert!(distributor.is_empty());
        assert_eq!(distributor.iter().count(), 0);
    }
}

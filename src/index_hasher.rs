use core::hash::BuildHasher;

/// Multiplier of the polynomial rolling hash.
const ROLLING_MULTIPLIER: u128 = 53;

/// Maps a key onto a slot index of a table with a given capacity.
///
/// The index is relative to the capacity it was computed for. Tables call
/// `index` again for every key after a resize and never cache the result, so
/// implementations don't need to be stable across capacities.
///
/// Implementations must return a value in `0..capacity` for every
/// `capacity >= 1`. Tables never call `index` with a capacity of zero.
pub trait IndexHasher {
    /// Returns the home slot of `key` in a table of `capacity` slots.
    fn index(&self, key: &str, capacity: usize) -> usize;
}

/// Polynomial rolling hash over the characters of the key.
///
/// Each step computes `hash = (hash * 53 + c) mod capacity`, where `c` is the
/// Unicode scalar value of the next character. Reducing at every step keeps
/// the accumulator below `capacity`.
///
/// # Examples
///
/// ```rust
/// use probe_hash::IndexHasher;
/// use probe_hash::RollingHash;
///
/// assert_eq!(RollingHash.index("a", 8), 97 % 8);
/// assert_eq!(RollingHash.index("", 8), 0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RollingHash;

impl IndexHasher for RollingHash {
    #[inline]
    fn index(&self, key: &str, capacity: usize) -> usize {
        debug_assert!(capacity > 0);

        // u128 keeps `hash * 53 + c` from overflowing for any usize capacity.
        let capacity = capacity as u128;
        key.chars()
            .fold(0u128, |hash, c| {
                (hash * ROLLING_MULTIPLIER + c as u128) % capacity
            }) as usize
    }
}

/// Adapts a [`BuildHasher`] into an [`IndexHasher`].
///
/// The full 64-bit hash of the key is reduced modulo the capacity.
///
/// # Examples
///
/// ```rust
/// use std::hash::RandomState;
///
/// use probe_hash::BuildIndex;
/// use probe_hash::HashTable;
///
/// let mut table = HashTable::with_hasher(BuildIndex(RandomState::new()));
/// table.set("key", 1);
/// assert_eq!(table.get("key"), Some(&1));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildIndex<S>(pub S);

impl<S: BuildHasher> IndexHasher for BuildIndex<S> {
    #[inline]
    fn index(&self, key: &str, capacity: usize) -> usize {
        debug_assert!(capacity > 0);
        (self.0.hash_one(key) as u128 % capacity as u128) as usize
    }
}

/// Index hasher backed by `foldhash`'s randomly seeded fast hasher.
#[cfg(feature = "foldhash")]
pub type FoldIndex = BuildIndex<foldhash::fast::RandomState>;

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::distr::Alphanumeric;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Default)]
    struct SipBuilder;

    impl BuildHasher for SipBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(7, 11)
        }
    }

    #[test]
    fn rolling_hash_known_values() {
        assert_eq!(RollingHash.index("a", 8), 1);
        // (1 * 53 + 98) % 8
        assert_eq!(RollingHash.index("ab", 8), 7);
        assert_eq!(RollingHash.index("i", 8), 1);
        assert_eq!(RollingHash.index("q", 8), 1);
        assert_eq!(RollingHash.index("", 8), 0);
    }

    #[test]
    fn rolling_hash_is_capacity_relative() {
        assert_eq!(RollingHash.index("a", 8), 1);
        assert_eq!(RollingHash.index("a", 14), 97 % 14);
        assert_eq!(RollingHash.index("a", 100), 97);
    }

    #[test]
    fn rolling_hash_uses_scalar_values() {
        // 'é' is U+00E9; hashing bytes instead would give a different result.
        assert_eq!(RollingHash.index("é", 1000), 0xE9);
        assert_eq!(RollingHash.index("日本", 7), ((0x65E5 % 7) * 53 + 0x672C) % 7);
    }

    #[test]
    fn capacity_of_one_maps_everything_to_zero() {
        assert_eq!(RollingHash.index("anything", 1), 0);
        assert_eq!(BuildIndex(SipBuilder).index("anything", 1), 0);
    }

    #[test]
    fn huge_capacity_does_not_overflow() {
        let key: String = "z".repeat(512);
        assert!(RollingHash.index(&key, usize::MAX) < usize::MAX);
        assert!(RollingHash.index(&key, usize::MAX - 1) < usize::MAX - 1);
    }

    #[test]
    fn indexes_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let sip = BuildIndex(SipBuilder);
        for _ in 0..1000 {
            let len = rng.random_range(0..24);
            let key: String = (&mut rng)
                .sample_iter(Alphanumeric)
                .take(len)
                .map(char::from)
                .collect();
            let capacity = rng.random_range(1..5000);

            assert!(RollingHash.index(&key, capacity) < capacity);
            assert!(sip.index(&key, capacity) < capacity);
        }
    }

    #[test]
    fn build_index_is_deterministic_for_a_given_builder() {
        let sip = BuildIndex(SipBuilder);
        assert_eq!(sip.index("hello", 97), sip.index("hello", 97));
    }

    #[cfg(feature = "foldhash")]
    #[test]
    fn fold_index_stays_in_range() {
        let fold = FoldIndex::default();
        for capacity in 1..64 {
            assert!(fold.index("hello", capacity) < capacity);
        }
    }
}

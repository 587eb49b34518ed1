#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod hash_table;

/// Strategies for mapping keys onto slot indexes.
///
/// This module provides the [`IndexHasher`] trait used by [`HashTable`] along
/// with the default polynomial [`RollingHash`] and an adapter for any
/// [`BuildHasher`](core::hash::BuildHasher).
pub mod index_hasher;

pub use hash_table::Entry;
pub use hash_table::HashTable;
pub use hash_table::INITIAL_CAPACITY;
#[cfg(feature = "stats")]
pub use hash_table::DebugStats;
#[cfg(feature = "stats")]
pub use hash_table::ProbeHistogram;
pub use index_hasher::BuildIndex;
#[cfg(feature = "foldhash")]
pub use index_hasher::FoldIndex;
pub use index_hasher::IndexHasher;
pub use index_hasher::RollingHash;

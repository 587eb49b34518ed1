//! A string-keyed hash table using open addressing with linear probing.
//!
//! Every entry lives directly in one contiguous slot array. Collisions are
//! resolved by scanning forward (wrapping) from the key's home slot, and
//! removals leave tombstones behind so the scans of keys inserted later keep
//! working.

use alloc::boxed::Box;
use alloc::string::String;
#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem;

use crate::index_hasher::IndexHasher;
use crate::index_hasher::RollingHash;

/// Number of slots materialized by the first insertion into a table that was
/// not pre-sized.
pub const INITIAL_CAPACITY: usize = 8;

cfg_if::cfg_if! {
    if #[cfg(feature = "load-one-half")] {
        const MAX_LOAD_NUMERATOR: u128 = 1;
        const MAX_LOAD_DENOMINATOR: u128 = 2;
    } else if #[cfg(feature = "load-three-quarters")] {
        const MAX_LOAD_NUMERATOR: u128 = 3;
        const MAX_LOAD_DENOMINATOR: u128 = 4;
    } else {
        // CPython's USABLE_FRACTION.
        const MAX_LOAD_NUMERATOR: u128 = 2;
        const MAX_LOAD_DENOMINATOR: u128 = 3;
    }
}

/// Number of used (live or tombstoned) slots a table of `capacity` slots may
/// hold. Always strictly less than `capacity`, so at least one slot stays
/// empty and every probe sequence terminates.
#[inline(always)]
fn max_load(capacity: usize) -> usize {
    ((capacity as u128 * MAX_LOAD_NUMERATOR) / MAX_LOAD_DENOMINATOR) as usize
}

/// Smallest capacity whose `max_load` is at least `items`.
#[inline(always)]
fn capacity_for(items: usize) -> usize {
    let capacity = (items as u128 * MAX_LOAD_DENOMINATOR).div_ceil(MAX_LOAD_NUMERATOR);
    usize::try_from(capacity).expect("capacity overflow")
}

/// Linear probe: the slot visited on the `attempt`-th step of a scan starting
/// at `home`, wrapping around the end of the array.
#[inline(always)]
fn probe(home: usize, attempt: usize, capacity: usize) -> usize {
    debug_assert!(home < capacity && attempt < capacity);
    let until_wrap = capacity - home;
    if attempt < until_wrap {
        home + attempt
    } else {
        attempt - until_wrap
    }
}

#[derive(Clone)]
enum Slot<V> {
    Empty,
    /// Deleted entry. Scans continue through it.
    Tombstone,
    Live {
        key: String,
        value: V,
    },
}

impl<V> Slot<V> {
    #[inline]
    fn as_live(&self) -> Option<(&str, &V)> {
        match self {
            Slot::Live { key, value } => Some((key.as_str(), value)),
            _ => None,
        }
    }

    #[inline]
    fn as_live_mut(&mut self) -> Option<(&str, &mut V)> {
        match self {
            Slot::Live { key, value } => Some((key.as_str(), value)),
            _ => None,
        }
    }
}

fn empty_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Stores a new pair in a vacant slot, reclaiming it if it was a tombstone.
fn fill_slot<'a, V>(
    slot: &'a mut Slot<V>,
    populated: &mut usize,
    tombstones: &mut usize,
    key: String,
    value: V,
) -> &'a mut V {
    match slot {
        Slot::Empty => {}
        Slot::Tombstone => *tombstones -= 1,
        Slot::Live { .. } => unreachable!("filling a live slot"),
    }
    *populated += 1;

    *slot = Slot::Live { key, value };
    match slot {
        Slot::Live { value, .. } => value,
        _ => unreachable!(),
    }
}

/// Turns a live slot into a tombstone and hands back its pair.
fn vacate_slot<V>(
    slot: &mut Slot<V>,
    populated: &mut usize,
    tombstones: &mut usize,
) -> (String, V) {
    match mem::replace(slot, Slot::Tombstone) {
        Slot::Live { key, value } => {
            *populated -= 1;
            *tombstones += 1;
            (key, value)
        }
        _ => unreachable!("vacating a slot that holds no entry"),
    }
}

/// Outcome of scanning a key's probe sequence for insertion.
enum Probe {
    /// A live slot holding the key.
    Found(usize),
    /// The earliest tombstone on the sequence, or the empty slot ending it.
    Vacant(usize),
}

/// Debug statistics for hash table analysis.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live entries
    pub live: usize,
    /// Number of tombstoned slots
    pub tombstones: usize,
    /// Number of never-used slots
    pub empty: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Maximum number of used (live or tombstoned) slots before a resize
    pub max_load: usize,
    /// Load factor (live / capacity)
    pub load_factor: f64,
    /// Slot occupancy ((live + tombstones) / capacity)
    pub occupancy: f64,
    /// Longest distance between an entry and its home slot
    pub longest_probe: usize,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
    /// Bytes held by slots that store no live entry
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor, resize at {})",
            self.live,
            self.capacity,
            self.load_factor * 100.0,
            self.max_load
        );
        println!(
            "Slot Usage: {} live, {} tombstones, {} empty ({:.2}% occupancy)",
            self.live,
            self.tombstones,
            self.empty,
            self.occupancy * 100.0
        );
        println!("Longest probe: {}", self.longest_probe);
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// Distribution of probe distances over the live entries of a table.
///
/// Bin `d` counts the entries stored `d` slots after their home slot. The
/// last bin is always non-zero; a table without entries has no bins.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeHistogram {
    bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Entry counts indexed by probe distance.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Number of entries counted.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = *self.bins.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> String {
            if count == 0 {
                return String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                0 => {}
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                _ => bar.push('▉'),
            }
            bar
        };

        for (distance, &count) in self.bins.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// A hash table from `String` keys to values of type `V`.
///
/// Entries are stored directly in a single slot array (open addressing).
/// Each slot is empty, holds a live key/value pair, or is a tombstone left by
/// a removal. A key's home slot comes from the table's [`IndexHasher`]
/// (by default the polynomial [`RollingHash`]); lookups scan forward from
/// there one slot at a time, skipping tombstones, until they meet the key or
/// an empty slot.
///
/// The table allocates nothing until the first insertion, which materializes
/// [`INITIAL_CAPACITY`] slots. It grows before an insertion would push the
/// number of live entries past the maximum load (two thirds of the slots by
/// default, see the `load-*` features). An insertion that reuses a tombstone
/// never grows the table, but one that would fill an empty slot while live
/// entries plus tombstones are already at the maximum load rehashes first.
/// Every rehash moves the live entries into a fresh array, dropping all
/// tombstones. Capacity never shrinks; [`clear`](HashTable::clear) releases
/// the array entirely.
///
/// No operation fails: missing keys are reported through `Option`.
///
/// ## Example
///
/// ```rust
/// use probe_hash::HashTable;
///
/// let mut table = HashTable::new();
/// table.set("a", 1);
/// table.set("b", 2);
/// assert_eq!(table.get("a"), Some(&1));
///
/// table.remove("a");
/// assert_eq!(table.get("a"), None);
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V, H = RollingHash> {
    slots: Box<[Slot<V>]>,
    populated: usize,
    tombstones: usize,
    hasher: H,
}

impl<V, H> Debug for HashTable<V, H>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table using [`RollingHash`].
    ///
    /// The table does not allocate until the first insertion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let table: HashTable<i32> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(RollingHash)
    }

    /// Creates a table using [`RollingHash`] that can hold at least
    /// `capacity` entries without resizing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(100);
    /// let slots = table.capacity();
    /// for i in 0..100 {
    ///     table.set(format!("key{i}"), i);
    /// }
    /// assert_eq!(table.capacity(), slots);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RollingHash)
    }
}

impl<V, H> Default for HashTable<V, H>
where
    H: Default,
{
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<V, H> HashTable<V, H> {
    /// Creates an empty table that places keys with `hasher`.
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            slots: Box::default(),
            populated: 0,
            tombstones: 0,
            hasher,
        }
    }

    /// Creates a table that places keys with `hasher` and can hold at least
    /// `capacity` entries without resizing.
    ///
    /// A `capacity` of zero allocates nothing.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            slots: empty_slots(capacity_for(capacity)),
            populated: 0,
            tombstones: 0,
            hasher,
        }
    }

    /// Returns a reference to the table's index hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the number of live entries in the table.
    ///
    /// Tombstones left by removals are not counted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.len(), 0);
    ///
    /// table.set("a", 1);
    /// table.set("b", 2);
    /// table.remove("a");
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots in the table.
    ///
    /// This is zero until the table is first written to, and again after
    /// [`clear`](HashTable::clear) or [`drain`](HashTable::drain); reads never
    /// allocate. The first write afterwards materializes [`INITIAL_CAPACITY`]
    /// slots. Only part of the slots can be used before the table grows; see
    /// [`with_capacity`](HashTable::with_capacity) to size a table for a known
    /// number of entries.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Removes all entries and releases the slot array.
    ///
    /// The table returns to the state of a freshly constructed one: the next
    /// insertion materializes [`INITIAL_CAPACITY`] slots again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", 1);
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 0);
    /// assert_eq!(table.get("a"), None);
    /// ```
    pub fn clear(&mut self) {
        self.slots = Box::default();
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over all entries in an unspecified order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", 1);
    /// table.set("b", 2);
    ///
    /// let mut pairs: Vec<_> = table.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [("a", &1), ("b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over all entries with mutable references to the
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over all keys.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over all values.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to all values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes every entry and returns them as an owning iterator.
    ///
    /// The table is left in the same state as after
    /// [`clear`](HashTable::clear), even if the iterator is dropped before it
    /// is exhausted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", 1);
    /// table.set("b", 2);
    ///
    /// let drained: Vec<(String, i32)> = table.drain().collect();
    /// assert_eq!(drained.len(), 2);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> IntoIter<V> {
        let remaining = mem::take(&mut self.populated);
        self.tombstones = 0;
        IntoIter {
            slots: mem::take(&mut self.slots).into_vec().into_iter(),
            remaining,
        }
    }
}

impl<V, H> HashTable<V, H>
where
    H: IndexHasher,
{
    /// Index of the live slot holding `key`, if any.
    fn find_index(&self, key: &str) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let capacity = self.capacity();
        let home = self.hasher.index(key, capacity);
        debug_assert!(home < capacity);

        for attempt in 0..capacity {
            let index = probe(home, attempt, capacity);
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Live { key: stored, .. } if stored == key => return Some(index),
                Slot::Live { .. } | Slot::Tombstone => {}
            }
        }

        None
    }

    /// Scans the probe sequence of `key` for the slot an insertion would use.
    ///
    /// The table must be allocated.
    fn find_insert_slot(&self, key: &str) -> Probe {
        let capacity = self.capacity();
        let home = self.hasher.index(key, capacity);
        debug_assert!(home < capacity);

        let mut first_tombstone = None;
        for attempt in 0..capacity {
            let index = probe(home, attempt, capacity);
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Slot::Tombstone if first_tombstone.is_none() => {
                    first_tombstone = Some(index);
                }
                Slot::Tombstone => {}
                Slot::Live { key: stored, .. } if stored == key => return Probe::Found(index),
                Slot::Live { .. } => {}
            }
        }

        // Only reachable when every slot is used, which the load limit rules
        // out; the earliest tombstone is still the right answer.
        match first_tombstone {
            Some(index) => Probe::Vacant(index),
            None => unreachable!("probe sequence has no room for a new entry"),
        }
    }

    /// Makes sure one more live entry fits under the maximum load, allocating
    /// or growing as needed.
    #[inline]
    fn reserve_one(&mut self) {
        if self.slots.is_empty() {
            #[cfg(feature = "log")]
            log::trace!("materializing {INITIAL_CAPACITY} slots");
            self.slots = empty_slots(INITIAL_CAPACITY);
            return;
        }

        if self.populated + 1 > max_load(self.capacity()) {
            self.resize_rehash(self.grown_capacity());
        }
    }

    /// Whether storing a new entry at `index` would push the used slots
    /// (live plus tombstones) past the maximum load. Reusing a tombstone
    /// never does.
    #[inline]
    fn fills_free_slot_past_max_load(&self, index: usize) -> bool {
        matches!(self.slots[index], Slot::Empty)
            && self.populated + self.tombstones + 1 > max_load(self.capacity())
    }

    /// Capacity to move to once the current array is at its maximum load.
    ///
    /// Grows by `2 * len + capacity / 2`, which is faster than doubling for
    /// small tables. When the load is mostly tombstones the formula can come
    /// out below the current capacity, in which case the table is rehashed in
    /// place at the same size.
    fn grown_capacity(&self) -> usize {
        let capacity = self.capacity();
        let grown = self
            .populated
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(capacity / 2))
            .expect("capacity overflow");

        grown.max(capacity).max(capacity_for(self.populated + 1))
    }

    /// Moves every live entry into a fresh array of `capacity` slots.
    #[cold]
    fn resize_rehash(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.capacity());
        debug_assert!(max_load(capacity) >= self.populated);

        #[cfg(feature = "log")]
        log::debug!(
            "rehashing {} entries ({} tombstones) from {} to {} slots",
            self.populated,
            self.tombstones,
            self.capacity(),
            capacity
        );

        let old_slots = mem::replace(&mut self.slots, empty_slots(capacity));
        self.populated = 0;
        self.tombstones = 0;

        for slot in old_slots.into_vec() {
            let Slot::Live { key, value } = slot else {
                continue;
            };

            // Indexes depend on the capacity, so every key is placed again from
            // its new home slot.
            match self.find_insert_slot(&key) {
                Probe::Vacant(index) => {
                    fill_slot(
                        &mut self.slots[index],
                        &mut self.populated,
                        &mut self.tombstones,
                        key,
                        value,
                    );
                }
                Probe::Found(_) => unreachable!("duplicate key while rehashing"),
            }
        }
    }

    /// Reserves room for at least `additional` more entries.
    ///
    /// After this call, `additional` new keys can be inserted without the
    /// table resizing. Does nothing if there is already enough room.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.reserve(50);
    /// let slots = table.capacity();
    /// for i in 0..50 {
    ///     table.set(i.to_string(), i);
    /// }
    /// assert_eq!(table.capacity(), slots);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        let used = (self.populated + self.tombstones).saturating_add(additional);
        if used <= max_load(self.capacity()) {
            return;
        }

        let required = self
            .populated
            .checked_add(additional)
            .expect("capacity overflow");
        self.resize_rehash(capacity_for(required).max(self.capacity()));
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// A missing key is not an error; it yields `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", 1);
    /// assert_eq!(table.get("a"), Some(&1));
    /// assert_eq!(table.get("b"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        let index = self.find_index(key)?;
        self.slots[index].as_live()
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", vec![1]);
    /// if let Some(values) = table.get_mut("a") {
    ///     values.push(2);
    /// }
    /// assert_eq!(table.get("a"), Some(&vec![1, 2]));
    /// ```
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find_index(key)?;
        self.slots[index].as_live_mut().map(|(_, value)| value)
    }

    /// Returns `true` if the table holds an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find_index(key).is_some()
    }

    /// Associates `value` with `key`.
    ///
    /// If the key was already present its value is replaced in place and the
    /// previous value is returned. Otherwise the pair takes the earliest
    /// tombstone on the key's probe sequence, or the empty slot that ends it,
    /// and `None` is returned. The table grows first if the insertion could
    /// exceed the maximum load.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.set("a", 1), None);
    /// assert_eq!(table.set("a", 2), Some(1));
    /// assert_eq!(table.get("a"), Some(&2));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Gets the entry for `key` for in-place inspection or insertion.
    ///
    /// Like [`set`](HashTable::set), this may grow the table before scanning,
    /// whether or not the key turns out to be present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut counts = HashTable::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.get("b"), Some(&1));
    /// ```
    pub fn entry(&mut self, key: impl Into<String>) -> Entry<'_, V> {
        let key = key.into();
        self.reserve_one();
        let probe = match self.find_insert_slot(&key) {
            Probe::Vacant(index) if self.fills_free_slot_past_max_load(index) => {
                self.resize_rehash(self.grown_capacity());
                self.find_insert_slot(&key)
            }
            probe => probe,
        };

        let Self {
            slots,
            populated,
            tombstones,
            ..
        } = self;
        match probe {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry {
                slot: &mut slots[index],
                populated,
                tombstones,
            }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry {
                key,
                slot: &mut slots[index],
                populated,
                tombstones,
            }),
        }
    }

    /// Removes `key` from the table, returning its value.
    ///
    /// The slot becomes a tombstone. Removing a missing key does nothing and
    /// returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.set("a", 1);
    /// assert_eq!(table.remove("a"), Some(1));
    /// assert_eq!(table.remove("a"), None);
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` from the table, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &str) -> Option<(String, V)> {
        let index = self.find_index(key)?;
        Some(vacate_slot(
            &mut self.slots[index],
            &mut self.populated,
            &mut self.tombstones,
        ))
    }

    /// Keeps only the entries for which `keep` returns `true`.
    ///
    /// Rejected entries are removed as with [`remove`](HashTable::remove).
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &mut V) -> bool) {
        for slot in self.slots.iter_mut() {
            let Some((key, value)) = slot.as_live_mut() else {
                continue;
            };
            if !keep(key, value) {
                vacate_slot(slot, &mut self.populated, &mut self.tombstones);
            }
        }
    }

    /// Computes a histogram of probe distances for the current table state.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let capacity = self.capacity();
        let mut bins = Vec::new();

        for (index, slot) in self.slots.iter().enumerate() {
            let Some((key, _)) = slot.as_live() else {
                continue;
            };
            let home = self.hasher.index(key, capacity);
            let distance = if index >= home {
                index - home
            } else {
                capacity - home + index
            };

            if bins.len() <= distance {
                bins.resize(distance + 1, 0);
            }
            bins[distance] += 1;
        }

        ProbeHistogram { bins }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        let slot_bytes = mem::size_of::<Slot<V>>();
        let empty = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Empty))
            .count();

        DebugStats {
            live: self.populated,
            tombstones: self.tombstones,
            empty,
            capacity,
            max_load: max_load(capacity),
            load_factor: if capacity == 0 {
                0.0
            } else {
                self.populated as f64 / capacity as f64
            },
            occupancy: if capacity == 0 {
                0.0
            } else {
                (self.populated + self.tombstones) as f64 / capacity as f64
            },
            longest_probe: self.probe_histogram().bins().len().saturating_sub(1),
            total_bytes: capacity * slot_bytes,
            wasted_bytes: (capacity - self.populated) * slot_bytes,
        }
    }
}

impl<V, H> PartialEq for HashTable<V, H>
where
    V: PartialEq,
    H: IndexHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<V, H> Eq for HashTable<V, H>
where
    V: Eq,
    H: IndexHasher,
{
}

impl<K, V, H> Extend<(K, V)> for HashTable<V, H>
where
    K: Into<String>,
    H: IndexHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashTable<V, H>
where
    K: Into<String>,
    H: IndexHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<'a, V, H> IntoIterator for &'a HashTable<V, H> {
    type IntoIter = Iter<'a, V>;
    type Item = (&'a str, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, H> IntoIterator for &'a mut HashTable<V, H> {
    type IntoIter = IterMut<'a, V>;
    type Item = (&'a str, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<V, H> IntoIterator for HashTable<V, H> {
    type IntoIter = IntoIter<V>;
    type Item = (String, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_vec().into_iter(),
            remaining: self.populated,
        }
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
///
/// # Examples
///
/// ```rust
/// use probe_hash::Entry;
/// use probe_hash::HashTable;
///
/// let mut table = HashTable::new();
///
/// match table.entry("key") {
///     Entry::Vacant(entry) => {
///         entry.insert("value".to_string());
///     }
///     Entry::Occupied(entry) => {
///         println!("Key already exists with value: {}", entry.get());
///     }
/// }
/// assert_eq!(table.get("key").map(String::as_str), Some("value"));
/// ```
pub enum Entry<'a, V> {
    /// The key is present in the table
    Occupied(OccupiedEntry<'a, V>),
    /// The key is not present in the table
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Returns the entry's key.
    pub fn key(&self) -> &str {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }

    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry("a").and_modify(|v| *v += 1).or_insert(0);
    /// table.entry("a").and_modify(|v| *v += 1).or_insert(0);
    /// assert_eq!(table.get("a"), Some(&1));
    /// ```
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

impl<'a, V> Entry<'a, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    slot: &'a mut Slot<V>,
    populated: &'a mut usize,
    tombstones: &'a mut usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns the stored key.
    pub fn key(&self) -> &str {
        match &*self.slot {
            Slot::Live { key, .. } => key,
            _ => unreachable!("occupied entry without a live slot"),
        }
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        match &*self.slot {
            Slot::Live { value, .. } => value,
            _ => unreachable!("occupied entry without a live slot"),
        }
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        match &mut *self.slot {
            Slot::Live { value, .. } => value,
            _ => unreachable!("occupied entry without a live slot"),
        }
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the table borrow.
    pub fn into_mut(self) -> &'a mut V {
        match self.slot {
            Slot::Live { value, .. } => value,
            _ => unreachable!("occupied entry without a live slot"),
        }
    }

    /// Replaces the value, returning the previous one.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the table, returning its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the entry from the table, returning the stored key and value.
    pub fn remove_entry(self) -> (String, V) {
        vacate_slot(self.slot, self.populated, self.tombstones)
    }
}

/// A view into a vacant entry in a [`HashTable`].
///
/// The slot it points at is the earliest tombstone on the key's probe
/// sequence, or the empty slot that ends it.
pub struct VacantEntry<'a, V> {
    key: String,
    slot: &'a mut Slot<V>,
    populated: &'a mut usize,
    tombstones: &'a mut usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Takes back ownership of the key.
    pub fn into_key(self) -> String {
        self.key
    }

    /// Stores `value` under the entry's key and returns a mutable reference
    /// to it.
    pub fn insert(self, value: V) -> &'a mut V {
        fill_slot(
            self.slot,
            self.populated,
            self.tombstones,
            self.key,
            value,
        )
    }
}

/// An iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(pair) = slot.as_live() {
                self.remaining -= 1;
                return Some(pair);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(pair) = slot.as_live_mut() {
                self.remaining -= 1;
                return Some(pair);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

/// An owning iterator over the entries of a [`HashTable`].
///
/// Created by [`HashTable::drain`] and by `into_iter` on an owned table.
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Live { key, value } = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

/// An iterator over the keys of a [`HashTable`].
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> FusedIterator for Keys<'_, V> {}

/// An iterator over the values of a [`HashTable`].
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}

/// A mutable iterator over the values of a [`HashTable`].
pub struct ValuesMut<'a, V> {
    inner: IterMut<'a, V>,
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {}

impl<V> FusedIterator for ValuesMut<'_, V> {}

pub mod intern;

use foldhash::fast::{FixedState, RandomState};
use std::{
    borrow::Borrow,
    collections::{
        hash_map::{Entry, IntoIter},
        HashMap,
    },
    env,
    hash::Hash,
};

/// `foldhash`-backed map/set aliases used throughout the pipeline stages for
/// grouping and adjacency construction. Iteration order is never relied
/// upon: every stage sorts before it produces output, so the speed-oriented
/// hasher is a pure win with no determinism cost (§5 Ordering).
pub type FastMap<K, V> = HashMap<K, V, foldhash::fast::RandomState>;
pub type FastSet<K> = std::collections::HashSet<K, foldhash::fast::RandomState>;

const SEED_ENV_VAR: &str = "SCAFFLINKER_SEED";

pub fn get_seed() -> Option<u64> {
    env::var(SEED_ENV_VAR).ok().map(|s| s.bytes().fold(0, |a, b| a ^ b) as u64)
}

pub enum SeedableFoldHashMap<K, V> {
    Seeded(HashMap<K, V, FixedState>),
    Random(HashMap<K, V, RandomState>),
}

impl<K, V> SeedableFoldHashMap<K, V> {
    // TODO: Inline???
    pub fn new(seed: Option<u64>) -> SeedableFoldHashMap<K, V> {
        match seed {
            Some(seed) => SeedableFoldHashMap::Seeded(HashMap::with_hasher(FixedState::with_seed(seed))),
            None => SeedableFoldHashMap::Random(HashMap::with_hasher(RandomState::default())),
        }
    }
}

impl<K, V> SeedableFoldHashMap<K, V>
where
    K: Eq + Hash,
{
    #[inline]
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized, {
        match &self {
            SeedableFoldHashMap::Seeded(map) => map.get(k),
            SeedableFoldHashMap::Random(map) => map.get(k),
        }
    }

    #[inline]
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        match self {
            SeedableFoldHashMap::Seeded(map) => map.insert(k, v),
            SeedableFoldHashMap::Random(map) => map.insert(k, v),
        }
    }

    #[inline]
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self {
            SeedableFoldHashMap::Seeded(map) => map.entry(key),
            SeedableFoldHashMap::Random(map) => map.entry(key),
        }
    }

    #[inline]
    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized, {
        match self {
            SeedableFoldHashMap::Seeded(map) => map.contains_key(k),
            SeedableFoldHashMap::Random(map) => map.contains_key(k),
        }
    }
}

impl<K, V> SeedableFoldHashMap<K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            SeedableFoldHashMap::Seeded(map) => map.len(),
            SeedableFoldHashMap::Random(map) => map.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a new map, seeded from [`get_seed`] when `SCAFFLINKER_SEED` is
    /// set (useful for reproducible fixtures), falling back to a random seed.
    #[inline]
    pub fn new_default() -> SeedableFoldHashMap<K, V> {
        Self::new(get_seed())
    }
}

impl<K, V> IntoIterator for SeedableFoldHashMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    #[inline]
    fn into_iter(self) -> IntoIter<K, V> {
        match self {
            SeedableFoldHashMap::Seeded(map) => map.into_iter(),
            SeedableFoldHashMap::Random(map) => map.into_iter(),
        }
    }
}

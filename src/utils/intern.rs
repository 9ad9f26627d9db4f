//! A small string interner for contig identifiers.
//!
//! Contig names repeat across thousands of alignment records; interning them
//! into a dense `u32` id turns grouping/hashing in the hot loops of the
//! pipeline stages into integer operations instead of string comparisons.

use crate::utils::SeedableFoldHashMap;

/// An interned contig identifier. Opaque outside of [`Interner`]; use
/// [`Interner::resolve`] to recover the original string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContigId(u32);

pub struct Interner {
    ids: SeedableFoldHashMap<Box<str>, ContigId>,
    names: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            ids: SeedableFoldHashMap::new_default(),
            names: Vec::new(),
        }
    }

    /// Interns `name`, returning its (possibly newly assigned) id.
    pub fn intern(&mut self, name: &str) -> ContigId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = ContigId(self.names.len() as u32);
        self.names.push(name.into());
        self.ids.insert(name.into(), id);
        id
    }

    /// Resolves a previously interned id back to its string form.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this interner.
    pub fn resolve(&self, id: ContigId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

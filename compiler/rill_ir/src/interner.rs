//! String interning.
//!
//! Maps strings to compact [`Name`] ids and back. Interning is append-only;
//! resolved text is shared via `Arc<str>` so callers never borrow the
//! interner's internals across a lock.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Shared handle to a [`StringInterner`].
pub type SharedInterner = Arc<StringInterner>;

/// Append-only string interner.
///
/// `Name::EMPTY` is pre-interned so a default `Name` always resolves.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

struct Inner {
    map: FxHashMap<Arc<str>, Name>,
    strings: Vec<Arc<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&empty), Name::EMPTY);
        StringInterner {
            inner: RwLock::new(Inner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its id. Idempotent.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, text: &str) -> Name {
        if let Some(&name) = self.inner.read().map.get(text) {
            return name;
        }
        let mut inner = self.inner.write();
        // Re-check: another writer may have interned it between locks.
        if let Some(&name) = inner.map.get(text) {
            return name;
        }
        let id = u32::try_from(inner.strings.len())
            .unwrap_or_else(|_| panic!("interner overflow: too many distinct strings"));
        let name = Name::from_raw(id);
        let shared: Arc<str> = Arc::from(text);
        inner.strings.push(Arc::clone(&shared));
        inner.map.insert(shared, name);
        name
    }

    /// Resolve an id back to its text.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn resolve(&self, name: Name) -> Arc<str> {
        let inner = self.inner.read();
        match inner.strings.get(name.raw() as usize) {
            Some(s) => Arc::clone(s),
            None => panic!("unknown {name:?} (interner has {})", inner.strings.len()),
        }
    }

    /// Look up a string without interning it.
    pub fn get(&self, text: &str) -> Option<Name> {
        self.inner.read().map.get(text).copied()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("hello");
        let b = interner.intern("hello");
        assert_eq!(a, b);
        assert_eq!(&*interner.resolve(a), "hello");
    }

    #[test]
    fn distinct_strings_distinct_names() {
        let interner = StringInterner::new();
        assert_ne!(interner.intern("a"), interner.intern("b"));
    }

    #[test]
    fn empty_is_preinterned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(&*interner.resolve(Name::EMPTY), "");
    }

    #[test]
    fn get_does_not_intern() {
        let interner = StringInterner::new();
        assert_eq!(interner.get("missing"), None);
        let name = interner.intern("present");
        assert_eq!(interner.get("present"), Some(name));
    }
}

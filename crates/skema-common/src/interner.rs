//! String interning.
//!
//! Names occur everywhere in the schema model: object property keys,
//! inference placeholder names, cyclic definition names. Interning them
//! gives O(1) equality and hashing (`Atom` comparison) and deduplicates
//! storage. The interner hands out stable `Atom` handles that are only
//! meaningful together with the interner that produced them.

use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// Interned string handle.
///
/// `Atom`s are cheap to copy, compare, and hash. Two atoms from the same
/// interner are equal iff their source strings are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

#[derive(Default)]
struct InternerState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

/// Thread-safe string interner.
///
/// All methods take `&self`; interior mutability makes the interner shareable
/// across threads without coordination at call sites.
pub struct Interner {
    state: RwLock<InternerState>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(InternerState::default()),
        }
    }

    /// Intern a string, returning its atom. Idempotent.
    pub fn intern(&self, text: &str) -> Atom {
        {
            let state = self.state.read().expect("interner lock poisoned");
            if let Some(&atom) = state.map.get(text) {
                return atom;
            }
        }
        let mut state = self.state.write().expect("interner lock poisoned");
        // Re-check: another thread may have interned between the read and
        // write lock acquisitions.
        if let Some(&atom) = state.map.get(text) {
            return atom;
        }
        let shared: Arc<str> = Arc::from(text);
        let atom = Atom(state.strings.len() as u32);
        state.strings.push(Arc::clone(&shared));
        state.map.insert(shared, atom);
        atom
    }

    /// Resolve an atom back to its string.
    ///
    /// Panics if the atom was not produced by this interner.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        let state = self.state.read().expect("interner lock poisoned");
        Arc::clone(&state.strings[atom.0 as usize])
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.state.read().expect("interner lock poisoned").strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

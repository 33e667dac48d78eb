//! Packrat memo table.
//!
//! Results are keyed by (shape, remaining size). Within one token sequence the
//! remaining size pins down the position, so the table must be cleared
//! whenever the engine moves on to a different sequence.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use linear_map::LinearMap;

use crate::mirror::Parsed;
use crate::Text;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct Key {
    pub(crate) shape: TypeId,
    pub(crate) size: usize,
}

#[derive(Clone)]
enum Entry {
    Absent,
    Matched { rest: Text, value: Rc<dyn Any> },
}

/// Counters describing how much work the memo table saved.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct MemoStats {
    pub hits: usize,
    pub misses: usize,
    /// How many times the table was dropped because the input changed.
    pub resets: usize,
}

/// The outer map is indexed by remaining size; each cell holds the few
/// shapes attempted at that position.
pub(crate) struct Memo {
    enabled: bool,
    cells: HashMap<usize, LinearMap<TypeId, Entry>>,
    stats: MemoStats,
}

impl Memo {
    pub(crate) fn new(enabled: bool) -> Self {
        Memo { enabled, cells: HashMap::new(), stats: MemoStats::default() }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.stats.resets += 1;
    }

    /// `None` on a miss; `Some(None)` for a remembered non-match.
    pub(crate) fn get<T: Clone + 'static>(&mut self, key: Key) -> Option<Option<Parsed<T>>> {
        if !self.enabled {
            return None;
        }
        let found = match self.cells.get(&key.size).and_then(|cell| cell.get(&key.shape)) {
            None => None,
            Some(Entry::Absent) => Some(None),
            Some(Entry::Matched { rest, value }) => value.downcast_ref::<T>()
                .map(|value| Some(Parsed { rest: rest.clone(), value: value.clone() })),
        };
        match found {
            Some(_) => self.stats.hits += 1,
            None => self.stats.misses += 1,
        }
        found
    }

    pub(crate) fn remember<T: Clone + 'static>(&mut self, key: Key, result: &Option<Parsed<T>>) {
        if !self.enabled {
            return;
        }
        let entry = match result {
            None => Entry::Absent,
            Some(parsed) => Entry::Matched { rest: parsed.rest.clone(), value: Rc::new(parsed.value.clone()) },
        };
        self.cells.entry(key.size).or_insert_with(LinearMap::new).insert(key.shape, entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.values().map(|cell| cell.len()).sum()
    }

    pub(crate) fn stats(&self) -> MemoStats { self.stats }
}

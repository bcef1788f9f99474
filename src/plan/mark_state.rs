use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::heap::{Heap, Pointer};

/// An ordered set of pointers. Iteration and printing are in handle order, so two runs that
/// mark the same objects print the same set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PointerSet {
    set: BTreeSet<Pointer>,
}

impl PointerSet {
    pub const fn new() -> Self {
        PointerSet {
            set: BTreeSet::new(),
        }
    }

    /// Add `p`. Returns whether it was absent.
    pub fn insert(&mut self, p: Pointer) -> bool {
        self.set.insert(p)
    }

    pub fn contains(&self, p: Pointer) -> bool {
        self.set.contains(&p)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pointer> + '_ {
        self.set.iter().copied()
    }

    pub fn is_subset(&self, other: &PointerSet) -> bool {
        self.set.is_subset(&other.set)
    }
}

impl FromIterator<Pointer> for PointerSet {
    fn from_iter<I: IntoIterator<Item = Pointer>>(iter: I) -> Self {
        PointerSet {
            set: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for PointerSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.set.iter().join(" "))
    }
}

impl fmt::Debug for PointerSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The outcome of visiting one field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldVisit {
    /// Index of the visited field in its object.
    pub field: usize,
    /// The field's target, if this visit marked it.
    pub newly_marked: Option<Pointer>,
}

/// Marking bookkeeping shared by both collectors.
///
/// The marked set only grows during a run. Each object's visited-field counter only grows, and
/// never passes the object's field count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkState {
    marked: PointerSet,
    /// Indexed by pointer.
    fields_visited: Vec<usize>,
}

impl MarkState {
    pub fn new(heap: &Heap) -> Self {
        MarkState {
            marked: PointerSet::new(),
            fields_visited: vec![0; heap.table_len()],
        }
    }

    pub fn marked(&self) -> &PointerSet {
        &self.marked
    }

    pub fn is_marked(&self, p: Pointer) -> bool {
        self.marked.contains(p)
    }

    /// Mark `p`. Returns whether it was unmarked before.
    pub fn mark(&mut self, p: Pointer) -> bool {
        debug_assert!(!p.is_sentinel(), "Cannot mark {:?}", p);
        self.marked.insert(p)
    }

    /// The number of fields of `p` visited so far.
    pub fn fields_visited(&self, p: Pointer) -> usize {
        self.fields_visited.get(p.index()).copied().unwrap_or(0)
    }

    /// Objects with at least one visited field, and their counts.
    pub fn visited_counts(&self) -> impl Iterator<Item = (Pointer, usize)> + '_ {
        self.fields_visited
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(i, &n)| (Pointer::new(i), n))
    }

    /// Have all of `p`'s fields been visited?
    pub fn is_exhausted(&self, heap: &Heap, p: Pointer) -> bool {
        self.fields_visited(p) == heap.object(p).field_count()
    }

    /// Visit `p`'s next unvisited field, in declaration order. A target that is neither nil nor
    /// already marked gets marked. Either way, `p`'s counter advances by one.
    ///
    /// # Panics
    /// Panics if all of `p`'s fields have been visited already.
    pub fn visit_next_field(&mut self, heap: &Heap, p: Pointer) -> FieldVisit {
        let obj = heap.object(p);
        let field = self.fields_visited[p.index()];
        assert!(
            field < obj.field_count(),
            "All {} fields of {:?} were visited already",
            obj.field_count(),
            p
        );
        let target = obj.fields[field].pointer;
        let newly_marked = if !target.is_nil() && self.mark(target) {
            Some(target)
        } else {
            None
        };
        self.fields_visited[p.index()] = field + 1;
        FieldVisit {
            field,
            newly_marked,
        }
    }

    pub fn into_marked(self) -> PointerSet {
        self.marked
    }
}

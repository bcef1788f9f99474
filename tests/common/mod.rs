//! Heaps shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use greentea::heap::{Block, Field, Heap, Object, Pointer, Root};
use greentea::plan::PointerSet;
use greentea::util::Address;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MAX_FIELDS: usize = 4;
const ELEM_SIZE: usize = 8 * MAX_FIELDS;

/// A random, well formed heap and its roots. The same seed always gives the same heap.
///
/// Objects have up to four fields, each pointing at nil or at any object (so cycles and self
/// references are common). Objects are shuffled into blocks, with free slots mixed in, so
/// neighbouring handles rarely share a block.
pub fn random_heap(seed: u64) -> (Vec<Root>, Heap) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n = rng.random_range(1..40usize);
    let handles: Vec<usize> = (Pointer::FIRST_OBJECT.index()..Pointer::FIRST_OBJECT.index() + n)
        .collect();

    let mut builder = Heap::builder();
    for &h in &handles {
        let field_count = rng.random_range(0..=MAX_FIELDS);
        let fields = (0..field_count)
            .map(|i| {
                let target = if rng.random_bool(0.3) {
                    Pointer::NIL
                } else {
                    Pointer::new(handles[rng.random_range(0..n)])
                };
                Field::new(8 * i, target)
            })
            .collect();
        builder = builder.object(h, Object::new(format!("[{}]*T", field_count), fields));
    }

    let mut placement: Vec<Pointer> = handles.iter().map(|&h| Pointer::new(h)).collect();
    placement.shuffle(&mut rng);
    let mut placement = placement.into_iter().peekable();
    let mut address = 0x10000u64;
    while placement.peek().is_some() {
        let slot_count = rng.random_range(1..=8);
        let slots = (0..slot_count)
            .map(|_| {
                if rng.random_bool(0.25) {
                    Pointer::FREE
                } else {
                    placement.next().unwrap_or(Pointer::FREE)
                }
            })
            .collect();
        builder = builder.block(Block::new(Address::from_raw(address), ELEM_SIZE, slots));
        address += 0x1000;
    }

    let root_count = rng.random_range(0..=3);
    let roots = (0..root_count)
        .map(|i| {
            let p = if rng.random_bool(0.2) {
                Pointer::NIL
            } else {
                Pointer::new(handles[rng.random_range(0..n)])
            };
            Root::new(format!("var r{} *T", i), p)
        })
        .collect();

    let heap = builder.build().unwrap();
    (roots, heap)
}

/// Everything reachable from `roots`, found independently of any collector.
pub fn reachable(roots: &[Root], heap: &Heap) -> PointerSet {
    let mut seen = PointerSet::new();
    let mut todo: VecDeque<Pointer> = roots
        .iter()
        .map(|r| r.pointer)
        .filter(|p| !p.is_nil())
        .collect();
    while let Some(p) = todo.pop_front() {
        if seen.insert(p) {
            todo.extend(heap.object(p).children());
        }
    }
    seen
}

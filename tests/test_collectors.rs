//! Properties both collectors must have, on the built-in heap and on random ones.

mod common;

use greentea::heap::{fixture, Heap, Pointer, Root};
use greentea::plan::{create_collector, sweep, Collector, CollectorSelector, Phase, PointerSet};

const RANDOM_HEAPS: u64 = 200;

/// Generate one test per collector from a function taking the collector to test.
macro_rules! per_collector {
    ($($test:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[test]
                fn [<$test _mark_sweep>]() {
                    $test(CollectorSelector::MarkSweep)
                }

                #[test]
                fn [<$test _green_tea>]() {
                    $test(CollectorSelector::GreenTea)
                }
            )*
        }
    };
}

per_collector!(
    marks_exactly_the_reachable,
    marking_is_monotonic,
    steps_are_bounded,
    stays_done,
    marked_with_fields_left_is_pending,
    sweep_keeps_the_marked,
);

/// The built-in heap, then a run of random ones.
fn heaps() -> impl Iterator<Item = (Vec<Root>, Heap)> {
    std::iter::once(fixture::make_heap()).chain((0..RANDOM_HEAPS).map(common::random_heap))
}

fn marks_exactly_the_reachable(selector: CollectorSelector) {
    for (roots, heap) in heaps() {
        let mut collector = create_collector(selector, &roots, &heap).unwrap();
        collector.run_to_end();
        assert_eq!(collector.marked(), &common::reachable(&roots, &heap));
    }
}

fn marking_is_monotonic(selector: CollectorSelector) {
    for (roots, heap) in heaps() {
        let mut collector = create_collector(selector, &roots, &heap).unwrap();
        let mut marked = PointerSet::new();
        let mut visited: Vec<(Pointer, usize)> = vec![];
        let mut roots_processed = 0;
        while collector.step() {
            assert!(marked.is_subset(collector.marked()));
            for &(p, n) in &visited {
                assert!(collector.fields_visited(p) >= n, "{} went backwards", p);
            }
            for (p, obj) in heap.objects() {
                assert!(collector.fields_visited(p) <= obj.field_count());
            }
            assert!(collector.roots_processed() >= roots_processed);
            assert!(collector.roots_processed() <= roots.len());

            marked = collector.marked().clone();
            visited = collector.mark_state().visited_counts().collect();
            roots_processed = collector.roots_processed();
        }
    }
}

fn steps_are_bounded(selector: CollectorSelector) {
    for (roots, heap) in heaps() {
        let mut collector = create_collector(selector, &roots, &heap).unwrap();
        let bound = roots.len() + heap.object_count() + heap.total_fields();
        let steps = collector.run_to_end();
        assert!(steps <= bound, "{} steps, bound {}", steps, bound);
        // Every marked object has had every field followed.
        for p in collector.marked().iter() {
            assert_eq!(
                collector.fields_visited(p),
                heap.object(p).field_count(),
                "{} not finished",
                p
            );
        }
    }
}

fn stays_done(selector: CollectorSelector) {
    let (roots, heap) = fixture::make_heap();
    let mut collector = create_collector(selector, &roots, &heap).unwrap();
    collector.run_to_end();
    let marked = collector.marked().clone();
    for _ in 0..3 {
        assert!(!collector.step());
        assert_eq!(collector.phase(), Phase::Done);
        assert!(collector.cursor().is_empty());
        assert_eq!(collector.marked(), &marked);
    }
}

fn marked_with_fields_left_is_pending(selector: CollectorSelector) {
    for (roots, heap) in heaps() {
        let mut collector = create_collector(selector, &roots, &heap).unwrap();
        while collector.step() {
            for p in collector.marked().iter() {
                if collector.fields_visited(p) < heap.object(p).field_count() {
                    assert!(collector.is_pending(p), "{} has fields left", p);
                }
            }
        }
    }
}

fn sweep_keeps_the_marked(selector: CollectorSelector) {
    for (roots, mut heap) in heaps() {
        let marked = {
            let mut collector = create_collector(selector, &roots, &heap).unwrap();
            collector.run_to_end();
            collector.marked().clone()
        };
        let before = heap.clone();
        let stats = sweep(&mut heap, &marked);
        assert_eq!(stats.live, marked.len());
        assert_eq!(stats.live + stats.reclaimed, before.object_count());
        for (p, obj) in before.objects() {
            if marked.contains(p) {
                assert_eq!(heap.slot_of(p), before.slot_of(p));
                assert_eq!(heap.object(p), obj);
            } else {
                assert!(!heap.is_resident(p));
                assert_eq!(heap.object(p).children().count(), 0);
            }
        }
        // Nothing more to free.
        assert_eq!(sweep(&mut heap, &marked).reclaimed, 0);
    }
}

#[test]
fn green_tea_queues_the_block_of_every_pending_object() {
    for (roots, heap) in heaps() {
        let mut collector = create_collector(CollectorSelector::GreenTea, &roots, &heap).unwrap();
        while collector.step() {
            for p in collector.marked().iter() {
                if collector.is_pending(p) {
                    let block = heap.block_of(p).unwrap();
                    assert!(collector.is_block_queued(block), "{} is pending", p);
                }
            }
        }
    }
}

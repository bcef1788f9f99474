//! Running a collector from start to finish, recording a [`Snapshot`] at every step.

use enum_map::EnumMap;

use crate::heap::{Heap, HeapError, Root};
use crate::plan::{
    create_collector, sweep, CollectorSelector, Phase, PointerSet, Snapshot, SweepStats,
};
use crate::util::log::{debug, info};
use crate::util::options::Options;

/// Everything one run recorded.
#[derive(Clone, Debug)]
pub struct Trace {
    pub collector: CollectorSelector,
    /// The initial state, the state after every step, and the final state.
    pub snapshots: Vec<Snapshot>,
    pub marked: PointerSet,
    /// Steps taken in each phase, counted by the phase the collector was in before the step.
    pub phase_steps: EnumMap<Phase, usize>,
    /// `None` if sweeping is turned off.
    pub sweep: Option<SweepStats>,
}

impl Trace {
    /// The number of steps that made progress.
    pub fn steps(&self) -> usize {
        self.phase_steps.values().sum()
    }

    pub fn initial(&self) -> &Snapshot {
        &self.snapshots[0]
    }

    pub fn last(&self) -> &Snapshot {
        &self.snapshots[self.snapshots.len() - 1]
    }
}

pub struct Simulation {
    options: Options,
}

impl Simulation {
    pub fn new(options: Options) -> Self {
        Simulation { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Trace `heap` from `roots` with the configured collector, then sweep it if configured to.
    ///
    /// # Panics
    /// Panics if the trace takes more than `step_limit` steps.
    pub fn run(&self, roots: &[Root], heap: &mut Heap) -> Result<Trace, HeapError> {
        let selector = self.options.collector;
        info!(
            "Simulating {} over {} objects in {} blocks",
            selector,
            heap.object_count(),
            heap.blocks().len()
        );

        let mut snapshots = vec![];
        let mut phase_steps: EnumMap<Phase, usize> = EnumMap::default();
        let marked = {
            let mut collector = create_collector(selector, roots, heap)?;
            snapshots.push(Snapshot::capture(0, collector.as_ref()));
            loop {
                let phase = collector.phase();
                if !collector.step() {
                    break;
                }
                phase_steps[phase] += 1;
                let steps: usize = phase_steps.values().sum();
                assert!(
                    steps <= self.options.step_limit,
                    "{} did not finish within {} steps",
                    selector,
                    self.options.step_limit
                );
                snapshots.push(Snapshot::capture(steps, collector.as_ref()));
            }
            snapshots.push(Snapshot::capture(snapshots.len(), collector.as_ref()));
            collector.marked().clone()
        };
        debug!(
            "{}: {} roots steps, {} heap steps, marked {}",
            selector,
            phase_steps[Phase::Roots],
            phase_steps[Phase::Heap],
            marked
        );

        let sweep = if self.options.sweep {
            Some(sweep(heap, &marked))
        } else {
            None
        };

        Ok(Trace {
            collector: selector,
            snapshots,
            marked,
            phase_steps,
            sweep,
        })
    }
}

use super::{Block, BlockId, HeapError, Object, Pointer, Root};
use crate::util::address::Address;
use crate::util::constants::{BYTES_IN_POINTER, MAX_OBJECT_HANDLE};
use crate::util::log::{debug, trace};

/// Where an object lives: its block and the slot within it.
pub type Location = (BlockId, usize);

/// The simulated heap: an object table addressed by [`Pointer`], and the blocks the objects
/// are resident in.
///
/// A `Heap` can only be obtained from [`HeapBuilder::build`], which checks that every object is
/// resident in exactly one slot and that every field points to nil or to a resident object.
/// Collectors only ever read it. The sweeper is the only code that changes it, and only after a
/// collector is done with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heap {
    objects: Vec<Option<Object>>,
    blocks: Vec<Block>,
    /// Residency of each object table entry. Reclaimed objects keep their table entry but lose
    /// their location.
    locations: Vec<Option<Location>>,
}

impl Heap {
    pub fn builder() -> HeapBuilder {
        HeapBuilder::new()
    }

    /// The object named by `p`.
    ///
    /// # Panics
    /// Panics if `p` is a sentinel or has no object. Heap validation makes that unreachable for
    /// any pointer a collector can see, so reaching it means the simulation is broken.
    pub fn object(&self, p: Pointer) -> &Object {
        self.get_object(p)
            .unwrap_or_else(|| panic!("{:?} does not name an object in the heap", p))
    }

    pub fn get_object(&self, p: Pointer) -> Option<&Object> {
        if p.is_sentinel() {
            return None;
        }
        self.objects.get(p.index()).and_then(|o| o.as_ref())
    }

    /// All objects in the table, resident or reclaimed, in handle order.
    pub fn objects(&self) -> impl Iterator<Item = (Pointer, &Object)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().map(|o| (Pointer::new(i), o)))
    }

    /// The number of entries in the object table, sentinels included. Every handle indexes below
    /// this.
    pub fn table_len(&self) -> usize {
        self.objects.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.iter().flatten().count()
    }

    /// The number of pointer fields over all objects.
    pub fn total_fields(&self) -> usize {
        self.objects.iter().flatten().map(|o| o.field_count()).sum()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> {
        (0..self.blocks.len()).map(BlockId::new)
    }

    /// The block and slot `p` is resident in.
    pub fn slot_of(&self, p: Pointer) -> Option<Location> {
        if p.is_sentinel() {
            return None;
        }
        self.locations.get(p.index()).copied().flatten()
    }

    /// The block `p` is resident in.
    pub fn block_of(&self, p: Pointer) -> Option<BlockId> {
        self.slot_of(p).map(|(b, _)| b)
    }

    /// The simulated address of `p`. Nil, free and reclaimed objects have none.
    pub fn address_of(&self, p: Pointer) -> Option<Address> {
        self.slot_of(p)
            .map(|(b, slot)| self.block(b).slot_address(slot))
    }

    pub fn is_resident(&self, p: Pointer) -> bool {
        self.slot_of(p).is_some()
    }

    /// Check that every root points to nil or to a resident object.
    pub fn check_roots(&self, roots: &[Root]) -> Result<(), HeapError> {
        for (i, r) in roots.iter().enumerate() {
            if !r.pointer.is_nil() && !self.is_resident(r.pointer) {
                return Err(HeapError::UnknownRoot {
                    root: i,
                    pointer: r.pointer,
                });
            }
        }
        Ok(())
    }

    /// Free a slot: the slot becomes [`Pointer::FREE`] and the object that was there has every
    /// field set to nil. Returns the reclaimed object, or `None` if the slot was already free.
    pub(crate) fn reclaim(&mut self, block: BlockId, slot: usize) -> Option<Pointer> {
        let p = self.blocks[block.index()].slots[slot];
        if p.is_sentinel() {
            return None;
        }
        trace!("Reclaim {} from block {} slot {}", p, block, slot);
        self.blocks[block.index()].slots[slot] = Pointer::FREE;
        self.locations[p.index()] = None;
        if let Some(obj) = self.objects[p.index()].as_mut() {
            obj.clear_fields();
        }
        Some(p)
    }
}

/// Builds and validates a [`Heap`].
///
/// ```ignore
/// let heap = Heap::builder()
///     .object(2, obj("T", [field(0, 3)]))
///     .object(3, obj("T", [field(0, NIL)]))
///     .block(blk(0xa000, 16, [2, 3, FREE]))
///     .build()?;
/// ```
#[derive(Default)]
pub struct HeapBuilder {
    objects: Vec<(Pointer, Object)>,
    blocks: Vec<Block>,
}

impl HeapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the object named by handle `index`.
    pub fn object(mut self, index: usize, object: Object) -> Self {
        self.objects.push((Pointer::new(index), object));
        self
    }

    /// Append a block. Blocks are identified by the order they are added in.
    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn build(self) -> Result<Heap, HeapError> {
        if let Some((p, _)) = self
            .objects
            .iter()
            .find(|(p, _)| p.index() > MAX_OBJECT_HANDLE)
        {
            return Err(HeapError::HandleOutOfRange {
                pointer: *p,
                limit: MAX_OBJECT_HANDLE,
            });
        }
        let table_len = self
            .objects
            .iter()
            .map(|(p, _)| p.index() + 1)
            .max()
            .unwrap_or(0)
            .max(Pointer::FIRST_OBJECT.index());

        let mut objects: Vec<Option<Object>> = vec![None; table_len];
        for (p, object) in self.objects {
            if p.is_sentinel() {
                return Err(HeapError::SentinelObject { pointer: p });
            }
            if objects[p.index()].is_some() {
                return Err(HeapError::DuplicateObject { pointer: p });
            }
            objects[p.index()] = Some(object);
        }

        let mut locations: Vec<Option<Location>> = vec![None; table_len];
        for (i, block) in self.blocks.iter().enumerate() {
            let id = BlockId::new(i);
            if block.elem_size == 0 || block.elem_size % BYTES_IN_POINTER != 0 {
                return Err(HeapError::InvalidStride {
                    block: id,
                    elem_size: block.elem_size,
                });
            }
            for (slot, &p) in block.slots.iter().enumerate() {
                if p.is_free() {
                    continue;
                }
                if p.is_nil() {
                    return Err(HeapError::NilSlot { block: id, slot });
                }
                if objects.get(p.index()).map_or(true, |o| o.is_none()) {
                    return Err(HeapError::UnknownSlot {
                        block: id,
                        slot,
                        pointer: p,
                    });
                }
                if let Some(first) = locations[p.index()] {
                    return Err(HeapError::DuplicateSlot {
                        pointer: p,
                        first,
                        second: (id, slot),
                    });
                }
                locations[p.index()] = Some((id, slot));
            }
        }

        let unplaced = (0..table_len).find(|&i| objects[i].is_some() && locations[i].is_none());
        if let Some(i) = unplaced {
            return Err(HeapError::Unplaced {
                pointer: Pointer::new(i),
            });
        }

        for (i, object) in objects.iter().enumerate() {
            let (Some(object), Some((block, _))) = (object, locations[i]) else {
                continue;
            };
            let owner = Pointer::new(i);
            let elem_size = self.blocks[block.index()].elem_size;
            for (k, f) in object.fields.iter().enumerate() {
                let fits = f
                    .offset
                    .checked_add(BYTES_IN_POINTER)
                    .is_some_and(|end| end <= elem_size);
                if f.offset % BYTES_IN_POINTER != 0 || !fits {
                    return Err(HeapError::MisalignedField {
                        owner,
                        field: k,
                        offset: f.offset,
                        elem_size,
                    });
                }
                let target = f.pointer;
                let resident = !target.is_sentinel()
                    && locations.get(target.index()).map_or(false, |l| l.is_some());
                if !target.is_nil() && !resident {
                    return Err(HeapError::DanglingField {
                        owner,
                        field: k,
                        target,
                    });
                }
            }
        }

        debug!(
            "Built heap with {} objects in {} blocks",
            objects.iter().flatten().count(),
            self.blocks.len()
        );
        Ok(Heap {
            objects,
            blocks: self.blocks,
            locations,
        })
    }
}

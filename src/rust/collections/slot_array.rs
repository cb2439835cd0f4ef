// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! An owning, indexable slot container with a capacity that is fixed at construction time.
//!
//! Values are stored in the first vacant slot, scanning in ascending index order, and keep that
//! index for as long as they are stored. Slots are reused after release, so the container
//! tolerates fragmentation; no compaction is ever performed.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::runtime::fail::Fail;
use ::std::mem;

//======================================================================================================================
// Structures
//======================================================================================================================

/// One addressable position in a [SlotArray].
enum Slot<T> {
    /// Nothing is stored at this index.
    Vacant,
    /// A value is stored at this index.
    Occupied(T),
    /// The index is claimed, but the value is temporarily held by the caller.
    Detached,
}

/// Fixed-capacity slot storage. Occupancy and ownership are tracked together: releasing a slot is
/// a single explicit operation that hands the stored value back to the caller.
pub struct SlotArray<T> {
    /// Slot storage. The length of this vector never changes after construction.
    slots: Vec<Slot<T>>,
    /// Number of non-vacant slots.
    len: usize,
}

//======================================================================================================================
// Associate Functions
//======================================================================================================================

impl<T> SlotArray<T> {
    /// Creates a slot array that holds up to `capacity` values.
    pub fn new(capacity: usize) -> Result<Self, Fail> {
        let mut slots: Vec<Slot<T>> = Vec::new();
        // Surface allocation failure to the caller instead of aborting.
        if slots.try_reserve_exact(capacity).is_err() {
            let cause: String = format!("cannot allocate slot storage (capacity={})", capacity);
            error!("new(): {}", cause);
            return Err(Fail::new(libc::ENOMEM, &cause));
        }
        slots.resize_with(capacity, || Slot::Vacant);
        Ok(Self { slots, len: 0 })
    }

    /// Returns the fixed capacity of this slot array.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of claimed slots, whether occupied or detached.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Claims the first vacant slot in ascending index order, leaving it detached. Returns `None`
    /// if every slot is claimed. Cost is O(capacity).
    pub fn claim(&mut self) -> Option<usize> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if matches!(slot, Slot::Vacant) {
                *slot = Slot::Detached;
                self.len += 1;
                return Some(index);
            }
        }
        None
    }

    /// Stores `value` in a slot that was previously claimed or detached.
    pub fn attach(&mut self, index: usize, value: T) {
        match self.slots[index] {
            Slot::Detached => self.slots[index] = Slot::Occupied(value),
            _ => panic!("attach(): slot {} is not detached", index),
        }
    }

    /// Moves the value out of an occupied slot, leaving the index claimed. Returns `None` if the
    /// slot holds no value.
    pub fn detach(&mut self, index: usize) -> Option<T> {
        match mem::replace(&mut self.slots[index], Slot::Detached) {
            Slot::Occupied(value) => Some(value),
            other => {
                self.slots[index] = other;
                None
            },
        }
    }

    /// Releases a slot back to vacant, making its index available for reuse. Returns the stored
    /// value, if the slot held one.
    pub fn release(&mut self, index: usize) -> Option<T> {
        match mem::replace(&mut self.slots[index], Slot::Vacant) {
            Slot::Occupied(value) => {
                self.len -= 1;
                Some(value)
            },
            Slot::Detached => {
                self.len -= 1;
                None
            },
            Slot::Vacant => None,
        }
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================

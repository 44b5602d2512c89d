//! Fixed-capacity entity storage
//!
//! A `Pool` is an array of slots with a liveness flag per slot. Dead slots stay
//! in place as zeroed storage, so the pool has a constant footprint and can be
//! copied wholesale into a snapshot. Iteration is always array order.

use std::fmt;
use std::marker::PhantomData;

use bytemuck::Zeroable;
use serde::de::{Deserializer, Error as _, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// An entity that can occupy a pool slot
pub trait Slot {
    fn is_alive(&self) -> bool;
}

/// Bounded slot array with "insert into first free slot or reject" semantics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pool<T, const N: usize> {
    slots: [T; N],
}

impl<T: Slot + Zeroable + Copy, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Slot + Zeroable + Copy, const N: usize> Pool<T, N> {
    /// Create a pool with every slot dead
    pub fn new() -> Self {
        Self { slots: [T::zeroed(); N] }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Put `item` into the first free slot, returning its index.
    ///
    /// Returns `None` (and drops the item) when every slot is alive.
    pub fn insert(&mut self, item: T) -> Option<usize> {
        let index = self.slots.iter().position(|slot| !slot.is_alive())?;
        self.slots[index] = item;
        Some(index)
    }

    /// Reset every slot to dead, zeroed storage
    pub fn clear(&mut self) {
        self.slots = [T::zeroed(); N];
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// All slots, dead ones included
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|slot| slot.is_alive())
    }

    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter(|slot| slot.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.iter_alive().count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_alive())
    }
}

// serde only derives arrays up to 32 elements, so pools go through a sequence.
impl<T: Serialize, const N: usize> Serialize for Pool<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(N))?;
        for slot in &self.slots {
            seq.serialize_element(slot)?;
        }
        seq.end()
    }
}

struct PoolVisitor<T, const N: usize>(PhantomData<T>);

impl<'de, T: Deserialize<'de>, const N: usize> Visitor<'de> for PoolVisitor<T, N> {
    type Value = Pool<T, N>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a sequence of {N} slots")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut slots: Vec<T> = Vec::with_capacity(N);
        while let Some(slot) = seq.next_element()? {
            if slots.len() == N {
                return Err(A::Error::invalid_length(N + 1, &self));
            }
            slots.push(slot);
        }
        let len = slots.len();
        let slots: [T; N] = slots
            .try_into()
            .map_err(|_| A::Error::invalid_length(len, &self))?;
        Ok(Pool { slots })
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for Pool<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(PoolVisitor::<T, N>(PhantomData))
    }
}

//! Bidirectional mapping between component identifiers and diagram variables.

use std::collections::HashMap;
use std::hash::Hash;

use log::debug;

use crate::error::{Error, Result};

/// Initial size of the variable index space.
pub const INITIAL_CAPACITY: u32 = 16;

/// Maps component identifiers of type `T` to dense 1-based variable indices.
///
/// Indices are handed out in registration order and never reused.
/// The index space doubles when exhausted, up to a hard limit.
#[derive(Debug, Clone)]
pub struct VariableRegistry<T> {
    indices: HashMap<T, u32>,
    /// `ids[v - 1]` is the identifier of variable `v`.
    ids: Vec<T>,
    capacity: u32,
    limit: u32,
}

impl<T> VariableRegistry<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new(limit: u32) -> Self {
        Self {
            indices: HashMap::new(),
            ids: Vec::new(),
            capacity: INITIAL_CAPACITY.min(limit),
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Current size of the index space.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Register `id`, returning its variable index.
    ///
    /// An identifier equal to an already registered one replaces the stored
    /// value and keeps its index, so refreshed component metadata does not
    /// invalidate diagrams built earlier.
    pub fn register(&mut self, id: T) -> Result<u32> {
        if let Some(v) = self.indices.remove(&id) {
            self.ids[(v - 1) as usize] = id.clone();
            self.indices.insert(id, v);
            return Ok(v);
        }

        if self.ids.len() as u32 == self.capacity {
            self.grow()?;
        }

        self.ids.push(id.clone());
        let v = self.ids.len() as u32;
        self.indices.insert(id, v);
        Ok(v)
    }

    fn grow(&mut self) -> Result<()> {
        if self.capacity >= self.limit {
            return Err(Error::CapacityExceeded {
                requested: self.ids.len() + 1,
                limit: self.limit as usize,
            });
        }
        let capacity = self.capacity.saturating_mul(2).max(1).min(self.limit);
        debug!("registry: growing index space {} -> {}", self.capacity, capacity);
        self.capacity = capacity;
        Ok(())
    }

    pub fn index(&self, id: &T) -> Option<u32> {
        self.indices.get(id).copied()
    }

    pub fn id(&self, v: u32) -> Option<&T> {
        if v == 0 {
            return None;
        }
        self.ids.get((v - 1) as usize)
    }

    /// Registered identifiers with their indices, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.ids.iter().enumerate().map(|(i, id)| (i as u32 + 1, id))
    }
}

//! Scope registry
//!
//! Scopes are owned by the registry and addressed by generational ids, so a
//! stale id held by a caller can never reach a scope registered later in
//! the same slot.

use crate::cache::SheetHandle;
use crate::error::{SheetScopeError, SheetScopeResult};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Handle to a registered scope
///
/// Copyable and non-owning: holding one does not keep the scope alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}.{}", self.index, self.generation)
    }
}

/// A destination for adopted stylesheets
#[derive(Debug, Clone)]
pub struct Scope {
    /// Display name (document, shadow root label, ...)
    pub name: String,
    /// Ordered adopted stylesheets
    pub adopted: Vec<SheetHandle>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    scope: Option<Scope>,
}

/// Where adopted stylesheets are committed
///
/// Implemented by [`ScopeRegistry`]; embedders with their own scope storage
/// implement it to receive assignments directly.
pub trait AdoptionSink {
    /// Current adopted set of `scope`, or `None` if the scope is gone
    fn adopted(&self, scope: ScopeId) -> Option<&[SheetHandle]>;

    /// Overwrite the adopted set of `scope`
    fn set_adopted(&mut self, scope: ScopeId, sheets: Vec<SheetHandle>) -> SheetScopeResult<()>;
}

/// Owns every scope adoption can target
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty scope
    ///
    /// Fails once every index is taken and no retired slot can be reused.
    pub fn register(&mut self, name: impl Into<String>) -> SheetScopeResult<ScopeId> {
        let scope = Scope {
            name: name.into(),
            adopted: Vec::new(),
        };

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.scope = Some(scope);
            return Ok(ScopeId {
                index,
                generation: slot.generation,
            });
        }

        let index = next_index(self.slots.len())?;
        self.slots.push(Slot {
            generation: 0,
            scope: Some(scope),
        });
        Ok(ScopeId {
            index,
            generation: 0,
        })
    }

    /// Register a scope whose name must not already be in use
    pub fn register_unique(&mut self, name: &str) -> SheetScopeResult<ScopeId> {
        if self.find(name).is_some() {
            return Err(SheetScopeError::ScopeNameTaken(name.to_string()));
        }
        self.register(name)
    }

    /// Remove a scope, returning it with its adopted set
    ///
    /// The id (and every copy of it) stops resolving immediately. A slot
    /// whose generation is exhausted is retired instead of reused.
    pub fn remove(&mut self, id: ScopeId) -> Option<Scope> {
        let slot = self.slot_mut(id)?;
        let scope = slot.scope.take();
        match slot.generation.checked_add(1) {
            Some(generation) => {
                slot.generation = generation;
                self.free.push(id.index);
            }
            None => debug!("Retiring scope slot {}", id.index),
        }
        scope
    }

    fn slot_mut(&mut self, id: ScopeId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation && slot.scope.is_some())
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_ref())
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        self.get(id).is_some()
    }

    /// Find a live scope by name
    pub fn find(&self, name: &str) -> Option<ScopeId> {
        self.iter()
            .find(|(_, scope)| scope.name == name)
            .map(|(id, _)| id)
    }

    /// Iterate live scopes in slot order
    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let scope = slot.scope.as_ref()?;
            let id = ScopeId {
                index: u32::try_from(index).ok()?,
                generation: slot.generation,
            };
            Some((id, scope))
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.scope.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn next_index(len: usize) -> SheetScopeResult<u32> {
    u32::try_from(len).map_err(|_| SheetScopeError::RegistryFull)
}

impl AdoptionSink for ScopeRegistry {
    fn adopted(&self, scope: ScopeId) -> Option<&[SheetHandle]> {
        self.get(scope).map(|s| s.adopted.as_slice())
    }

    fn set_adopted(&mut self, scope: ScopeId, sheets: Vec<SheetHandle>) -> SheetScopeResult<()> {
        let slot = self
            .slot_mut(scope)
            .ok_or(SheetScopeError::ScopeNotFound(scope))?;
        if let Some(target) = slot.scope.as_mut() {
            target.adopted = sheets;
        }
        Ok(())
    }
}

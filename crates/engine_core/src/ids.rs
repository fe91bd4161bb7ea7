//! Stable handles for simulated objects.

use hecs::Entity;
use std::fmt;

/// Handle to an object in the simulation's object arena.
///
/// Wraps the arena's generational entity id, so a handle to a destroyed
/// object never resolves to whatever reused its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(Entity);

impl ObjectId {
    pub fn from_entity(entity: Entity) -> Self {
        Self(entity)
    }

    pub fn entity(self) -> Entity {
        self.0
    }

    /// Slot index without the generation.
    pub fn index(self) -> u32 {
        self.0.id()
    }
}

impl From<Entity> for ObjectId {
    fn from(entity: Entity) -> Self {
        Self(entity)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0.id())
    }
}

use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Entity registry backed by a flat Vec in insertion order.
/// Designed for small-to-medium entity counts (hundreds, not millions).
///
/// Iteration order is stable: the physics tick walks entities in this order,
/// so `despawn` keeps the survivors' relative order intact.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(256),
        }
    }

    /// Add an entity to the end of the scene. Returns `false` and leaves the
    /// scene untouched when an entity with the same ID is already present.
    pub fn spawn(&mut self, entity: Entity) -> bool {
        if self.contains(entity.id) {
            log::warn!("refusing to spawn duplicate entity {}", entity.id);
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// IDs of the active planar entities, in scene order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.is_simulated())
            .map(|e| e.id)
            .collect()
    }

    /// Active planar entities whose box overlaps `id`'s box, excluding `id`.
    /// Empty when `id` is unknown or not itself simulated.
    pub fn overlapping(&self, id: EntityId) -> Vec<EntityId> {
        let Some(subject) = self.get(id).filter(|e| e.is_simulated()) else {
            return Vec::new();
        };
        let bounds = subject.bounds();
        self.entities
            .iter()
            .filter(|e| e.id != id && e.is_simulated() && e.bounds().overlaps(&bounds))
            .map(|e| e.id)
            .collect()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

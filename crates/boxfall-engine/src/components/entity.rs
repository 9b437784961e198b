use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::collision::Aabb;

/// Which simulation an entity takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EntityKind {
    /// Flat box, advanced by the 2D tick.
    #[default]
    Planar,
    /// Box with depth. Kept in the scene but never simulated.
    Spatial { z: f32, depth: f32 },
}

/// Fat Entity — a single struct holding everything the registry owns.
/// Physics state lives in `PhysicsWorld`, keyed by `id`.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Top-left corner in screen space (Y grows downward).
    pub pos: Vec2,
    /// Width and height in world units.
    pub size: Vec2,
    /// 2D or 3D.
    pub kind: EntityKind,
}

impl Entity {
    /// Create a new unit-sized planar entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            size: Vec2::ONE,
            kind: EntityKind::Planar,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Active and planar: the entities the 2D tick and overlap query see.
    pub fn is_simulated(&self) -> bool {
        self.active && self.kind == EntityKind::Planar
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Axis-aligned box covering `[x, x+w) × [y, y+h)`.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

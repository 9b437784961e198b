use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::renderer::instance::{PositionBuffer, PositionInstance};

fn instance_for(entity: &Entity) -> PositionInstance {
    PositionInstance {
        id: entity.id.0,
        x: entity.pos.x,
        y: entity.pos.y,
        w: entity.size.x,
        h: entity.size.y,
    }
}

/// Rebuild the buffer with every active planar entity, in scene order.
pub fn build_position_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut PositionBuffer) {
    buffer.clear();
    for entity in entities {
        if !entity.is_simulated() {
            continue;
        }
        buffer.push(instance_for(entity));
    }
}

/// Rebuild the buffer with only the entities a tick reported as moved.
/// IDs no longer in the scene are dropped.
pub fn build_moved_buffer(scene: &Scene, moved: &[EntityId], buffer: &mut PositionBuffer) {
    buffer.clear();
    for id in moved {
        if let Some(entity) = scene.get(*id) {
            buffer.push(instance_for(entity));
        }
    }
}

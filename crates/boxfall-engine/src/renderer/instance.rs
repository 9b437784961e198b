use bytemuck::{Pod, Zeroable};

/// Per-entity position record handed to the render layer.
/// 5 × 4 bytes = 20 bytes stride, in the host's native byte order.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PositionInstance {
    /// Entity ID.
    pub id: u32,
    /// Left edge in screen space.
    pub x: f32,
    /// Top edge in screen space.
    pub y: f32,
    /// Width in world units.
    pub w: f32,
    /// Height in world units.
    pub h: f32,
}

impl PositionInstance {
    pub const FIELDS: usize = 5;
    pub const STRIDE_BYTES: usize = Self::FIELDS * 4;
}

/// Flat buffer of position records, rebuilt every frame.
pub struct PositionBuffer {
    pub instances: Vec<PositionInstance>,
}

impl PositionBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(256),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: PositionInstance) {
        self.instances.push(instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn as_slice(&self) -> &[PositionInstance] {
        &self.instances
    }

    /// Raw native-endian bytes for hosts that copy the buffer across an FFI
    /// or shared-memory boundary on the same machine.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for PositionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

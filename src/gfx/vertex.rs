use zerocopy::AsBytes;

/// Interleaved vertex as it is laid out in the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, AsBytes)]
#[repr(C)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub clr: [f32; 4],
    pub nrm: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(pos: glam::Vec3, clr: glam::Vec4, nrm: glam::Vec3, uv: glam::Vec2) -> Self {
        Self {
            pos: pos.to_array(),
            clr: clr.to_array(),
            nrm: nrm.normalize_or_zero().to_array(),
            uv: uv.to_array(),
        }
    }
}

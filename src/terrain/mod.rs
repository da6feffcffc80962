pub mod heightmap;

pub use heightmap::Heightmap;

use glam::{Vec2, Vec3, Vec4};

use crate::gfx::Vertex;

/// Triangulates a heightmap into a centered grid.
///
/// The red channel of the vertex color carries the normalized height, which
/// the terrain shader uses to blend in sand and snow.
pub fn build_grid(map: &Heightmap, cell_size: f32, height_scale: f32) -> (Vec<Vertex>, Vec<u16>) {
    let side = map.side();
    let half = (side - 1) as f32 * cell_size * 0.5;
    let uv_step = 1.0 / (side - 1) as f32;

    let mut verts = Vec::with_capacity(side * side);
    for z in 0..side as isize {
        for x in 0..side as isize {
            let h = map.get(x, z);

            // Central differences, one sided at the border.
            let dx = (map.get(x + 1, z) - map.get(x - 1, z)) * height_scale
                / (((x + 1).min(side as isize - 1) - (x - 1).max(0)) as f32 * cell_size);
            let dz = (map.get(x, z + 1) - map.get(x, z - 1)) * height_scale
                / (((z + 1).min(side as isize - 1) - (z - 1).max(0)) as f32 * cell_size);

            verts.push(Vertex::new(
                Vec3::new(
                    x as f32 * cell_size - half,
                    h * height_scale,
                    z as f32 * cell_size - half,
                ),
                Vec4::new(h, h, h, 1.0),
                Vec3::new(-dx, 1.0, -dz),
                Vec2::new(x as f32, z as f32) * uv_step,
            ));
        }
    }

    let mut indices = Vec::with_capacity((side - 1) * (side - 1) * 6);
    for z in 0..side - 1 {
        for x in 0..side - 1 {
            let i = (z * side + x) as u16;
            let below = i + side as u16;
            // Counter clockwise seen from above.
            indices.extend_from_slice(&[i, below, i + 1, i + 1, below, below + 1]);
        }
    }

    (verts, indices)
}

use glam::{Vec3, Vec4};

/// A single directional light plus ambient term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingData {
    /// Direction the light travels, normalized.
    pub light_direction: Vec3,
    pub light_color: Vec3,
    pub ambient_color: Vec3,
}

impl LightingData {
    pub fn new(light_direction: Vec3, light_color: Vec3, ambient_color: Vec3) -> Self {
        Self {
            light_direction: light_direction.normalize_or_zero(),
            light_color,
            ambient_color,
        }
    }
}

impl Default for LightingData {
    fn default() -> Self {
        Self::new(
            Vec3::new(-0.4, -1.0, -0.3),
            Vec3::new(1.0, 0.96, 0.88),
            Vec3::splat(0.25),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub tint: Vec4,
}

impl Default for Material {
    fn default() -> Self {
        Self { tint: Vec4::ONE }
    }
}

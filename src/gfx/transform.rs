use glam::{Mat4, Quat, Vec3};

/// Position, rotation and scale of a model with a cached model matrix.
///
/// Setters only mark the matrix stale; [`Transform::update_matrix`] rebuilds it.
#[derive(Debug, Clone)]
pub struct Transform {
    pos: Vec3,
    rot: Quat,
    scale: Vec3,

    model_mtx: Mat4,
    dirty: bool,
}

#[allow(dead_code)]
impl Transform {
    pub fn new() -> Self {
        Self {
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            scale: Vec3::ONE,
            model_mtx: Mat4::IDENTITY,
            dirty: false,
        }
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.set_pos(pos);
        self
    }

    pub fn with_rot(mut self, rot: Quat) -> Self {
        self.set_rot(rot);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn set_pos(&mut self, pos: Vec3) {
        self.pos = pos;
        self.dirty = true;
    }

    pub fn set_rot(&mut self, rot: Quat) {
        self.rot = rot;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    pub fn update_matrix(&mut self) {
        if self.dirty {
            self.model_mtx = Mat4::from_scale_rotation_translation(self.scale, self.rot, self.pos);
            self.dirty = false;
        }
    }

    /// Model matrix as of the last [`Transform::update_matrix`].
    pub fn model_matrix(&self) -> Mat4 {
        self.model_mtx
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

use glam::{self, Mat4, Vec3};

#[derive(Debug, Clone)]
pub struct Camera {
    pos: Vec3,
    front: Vec3,
    up: Vec3,
    pitch: f32,
    yaw: f32,

    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,

    view_mtx: Mat4,
    proj_mtx: Mat4,
    dirty: bool,
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                               Creation Functions                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[allow(dead_code)]
impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            pos: Vec3::ZERO,
            front: Vec3::Z,
            up: Vec3::Y,
            pitch: 0.0f32,
            yaw: 90.0f32,

            // degrees
            fov_y: 70.0f32,
            aspect: 16.0 / 9.0,
            near: 0.1f32,
            far: 5000.0f32,

            view_mtx: Mat4::IDENTITY,
            proj_mtx: Mat4::IDENTITY,
            dirty: true,
        };
        camera.update();
        camera
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self.dirty = true;
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self.dirty = true;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch.clamp(-89.0, 89.0);
        self.dirty = true;
        self
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                              Usability Functions                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl Camera {
    pub fn move_forward(&mut self, amount: f32) {
        self.pos += amount * self.front;
        self.dirty = true;
    }

    pub fn move_backward(&mut self, amount: f32) {
        self.pos -= amount * self.front;
        self.dirty = true;
    }

    pub fn move_right(&mut self, amount: f32) {
        self.pos += self.front.cross(self.up).normalize() * amount;
        self.dirty = true;
    }

    pub fn move_left(&mut self, amount: f32) {
        self.pos -= self.front.cross(self.up).normalize() * amount;
        self.dirty = true;
    }

    pub fn move_up(&mut self, amount: f32) {
        self.pos.y += amount;
        self.dirty = true;
    }

    pub fn move_down(&mut self, amount: f32) {
        self.pos.y -= amount;
        self.dirty = true;
    }

    pub fn move_pitch(&mut self, amount: f32) {
        self.pitch = (self.pitch + amount).clamp(-89.0, 89.0);
        self.dirty = true;
    }

    pub fn move_yaw(&mut self, amount: f32) {
        self.yaw += amount;
        self.dirty = true;
    }

    /// Recomputes the matrices if anything moved since the last call.
    pub fn update(&mut self) {
        if self.dirty {
            self.calc_mtx();
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                              Get / Set Functions                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[allow(dead_code)]
impl Camera {
    /// View matrix as of the last [`Camera::update`].
    pub fn view_matrix(&self) -> Mat4 {
        self.view_mtx
    }

    /// Projection matrix as of the last [`Camera::update`].
    pub fn projection_matrix(&self) -> Mat4 {
        self.proj_mtx
    }

    pub fn get_front(&self) -> Vec3 {
        self.front
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 && aspect != self.aspect {
            self.aspect = aspect;
            self.dirty = true;
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                               Internal Functions                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl Camera {
    fn calc_mtx(&mut self) {
        self.front = Vec3::new(
            self.yaw.to_radians().cos() * self.pitch.to_radians().cos(),
            self.pitch.to_radians().sin(),
            self.yaw.to_radians().sin() * self.pitch.to_radians().cos(),
        )
        .normalize();

        self.view_mtx = Mat4::look_at_rh(self.pos, self.pos + self.front, self.up);
        self.proj_mtx =
            Mat4::perspective_rh_gl(self.fov_y.to_radians(), self.aspect, self.near, self.far);

        self.dirty = false;
    }
}

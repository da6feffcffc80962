use std::fmt::Debug;

use eframe::glow;
use glam::{Mat3, Mat4, Vec3, Vec4};

/// The slice of the GL api the renderer talks to.
///
/// Everything that touches bind state or uniforms goes through here so the
/// draw path can be driven by something other than a live context.
pub trait GlContext {
    type Program: Copy + PartialEq + Debug;
    type UniformLocation: Clone + Debug;
    type VertexArray: Copy + Debug;
    type Texture: Copy + Debug;

    /// Compiles both stages and links them. The error carries the info log.
    fn link_program(&self, vtx: &str, frag: &str) -> Result<Self::Program, String>;
    fn use_program(&self, program: Option<Self::Program>);
    fn current_program(&self) -> Option<Self::Program>;
    fn delete_program(&self, program: Self::Program);

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    fn uniform_mat4(&self, location: Option<&Self::UniformLocation>, mtx: &Mat4);
    fn uniform_mat3(&self, location: Option<&Self::UniformLocation>, mtx: &Mat3);
    fn uniform_vec3(&self, location: Option<&Self::UniformLocation>, v: Vec3);
    fn uniform_vec4(&self, location: Option<&Self::UniformLocation>, v: Vec4);
    fn uniform_i32(&self, location: Option<&Self::UniformLocation>, v: i32);

    /// `unit` is relative to `TEXTURE0`.
    fn active_texture(&self, unit: u32);
    fn bind_texture_2d(&self, texture: Option<Self::Texture>);
    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>);

    fn draw_elements_u16(&self, mode: u32, count: i32);
    fn draw_arrays(&self, mode: u32, count: i32);
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                                  glow Backend                                                     //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl GlContext for glow::Context {
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;
    type VertexArray = glow::VertexArray;
    type Texture = glow::Texture;

    fn link_program(&self, vtx: &str, frag: &str) -> Result<Self::Program, String> {
        use glow::HasContext as _;

        unsafe {
            let program = self.create_program()?;

            let shader_sources = [(glow::VERTEX_SHADER, vtx), (glow::FRAGMENT_SHADER, frag)];

            let mut shaders = Vec::with_capacity(shader_sources.len());
            for (shader_type, shader_source) in shader_sources {
                let shader = self.create_shader(shader_type)?;
                self.shader_source(shader, shader_source);
                self.compile_shader(shader);
                if !self.get_shader_compile_status(shader) {
                    let log = self.get_shader_info_log(shader);
                    self.delete_shader(shader);
                    for shader in shaders {
                        self.detach_shader(program, shader);
                        self.delete_shader(shader);
                    }
                    glow::HasContext::delete_program(self, program);
                    return Err(format!("Failed to compile {shader_type:#X}: {log}"));
                }
                self.attach_shader(program, shader);
                shaders.push(shader);
            }

            glow::HasContext::link_program(self, program);
            let linked = self.get_program_link_status(program);
            let log = self.get_program_info_log(program);

            for shader in shaders {
                self.detach_shader(program, shader);
                self.delete_shader(shader);
            }

            if !linked {
                glow::HasContext::delete_program(self, program);
                return Err(log);
            }

            Ok(program)
        }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { glow::HasContext::use_program(self, program) }
    }

    fn current_program(&self) -> Option<Self::Program> {
        use glow::HasContext as _;
        let id = unsafe { self.get_parameter_i32(glow::CURRENT_PROGRAM) };
        std::num::NonZeroU32::new(id as u32).map(glow::NativeProgram)
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { glow::HasContext::delete_program(self, program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        use glow::HasContext as _;
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        use glow::HasContext as _;
        unsafe { self.get_uniform_location(program, name) }
    }

    // glam stores matrices column-major, which is what GL expects untransposed.
    fn uniform_mat4(&self, location: Option<&Self::UniformLocation>, mtx: &Mat4) {
        use glow::HasContext as _;
        unsafe { self.uniform_matrix_4_f32_slice(location, false, &mtx.to_cols_array()) }
    }

    fn uniform_mat3(&self, location: Option<&Self::UniformLocation>, mtx: &Mat3) {
        use glow::HasContext as _;
        unsafe { self.uniform_matrix_3_f32_slice(location, false, &mtx.to_cols_array()) }
    }

    fn uniform_vec3(&self, location: Option<&Self::UniformLocation>, v: Vec3) {
        use glow::HasContext as _;
        unsafe { self.uniform_3_f32_slice(location, &v.to_array()) }
    }

    fn uniform_vec4(&self, location: Option<&Self::UniformLocation>, v: Vec4) {
        use glow::HasContext as _;
        unsafe { self.uniform_4_f32_slice(location, &v.to_array()) }
    }

    fn uniform_i32(&self, location: Option<&Self::UniformLocation>, v: i32) {
        use glow::HasContext as _;
        unsafe { self.uniform_1_i32(location, v) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { glow::HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn bind_texture_2d(&self, texture: Option<Self::Texture>) {
        use glow::HasContext as _;
        unsafe { self.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>) {
        unsafe { glow::HasContext::bind_vertex_array(self, vao) }
    }

    fn draw_elements_u16(&self, mode: u32, count: i32) {
        use glow::HasContext as _;
        unsafe { self.draw_elements(mode, count, glow::UNSIGNED_SHORT, 0) }
    }

    fn draw_arrays(&self, mode: u32, count: i32) {
        unsafe { glow::HasContext::draw_arrays(self, mode, 0, count) }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                                 Recording Double                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

use super::context::GlContext;

// Every shader handed to the renderer follows this naming convention.
pub const A_POSITION_NAME: &str = "a_position";
pub const A_VERTEXCOLOR_NAME: &str = "a_vertexcolor";
pub const A_NORMAL_NAME: &str = "a_normal";
pub const A_TEXCOORDS_NAME: &str = "a_texcoords";

// transformations
pub const U_MODEL_MATRIX_NAME: &str = "u_matrixM";
pub const U_VIEW_MATRIX_NAME: &str = "u_matrixV";
pub const U_PROJECTION_MATRIX_NAME: &str = "u_matrixP";
pub const U_INVERSETRANSPOSE_MATRIX_NAME: &str = "u_matrixInverseTranspose";

// lighting
pub const U_LIGHTDIRECTION_NAME: &str = "u_lightDirection";
pub const U_LIGHTCOLOR_NAME: &str = "u_lightColor";
pub const U_AMBIENTCOLOR_NAME: &str = "u_ambientColor";

// color and texture
pub const U_TINT_NAME: &str = "u_tint";
pub const U_MAINTEX_NAME: &str = "u_mainTex";

// terrain samplers
pub const U_TOP_TEXTURE_NAME: &str = "u_topTexture";
pub const U_SIDE_TEXTURE_NAME: &str = "u_sideTexture";
pub const U_SNOW_TEXTURE_NAME: &str = "u_snowTexture";
pub const U_BIOME_TEXTURE_NAME: &str = "u_biomeTexture";
pub const U_SAND_TOP_TEXTURE_NAME: &str = "u_sandTopTexture";
pub const U_SAND_SIDE_TEXTURE_NAME: &str = "u_sandSideTexture";

/// Attribute slots of the standard vertex inputs. `None` if the program does not read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttribLocations {
    pub position: Option<u32>,
    pub vertex_color: Option<u32>,
    pub normal: Option<u32>,
    pub tex_coords: Option<u32>,
}

impl AttribLocations {
    fn resolve<G: GlContext>(gl: &G, program: G::Program) -> Self {
        Self {
            position: gl.attrib_location(program, A_POSITION_NAME),
            vertex_color: gl.attrib_location(program, A_VERTEXCOLOR_NAME),
            normal: gl.attrib_location(program, A_NORMAL_NAME),
            tex_coords: gl.attrib_location(program, A_TEXCOORDS_NAME),
        }
    }
}

/// Standard uniforms of a program. `None` if the program does not declare it
/// (or the linker stripped it as unused).
#[derive(Debug, Clone, PartialEq)]
pub struct UniformLocations<U> {
    pub model_matrix: Option<U>,
    pub view_matrix: Option<U>,
    pub projection_matrix: Option<U>,
    pub tint: Option<U>,
    pub inverse_transpose_matrix: Option<U>,
    pub light_direction: Option<U>,
    pub light_color: Option<U>,
    pub ambient_color: Option<U>,
    pub main_texture: Option<U>,

    pub top_texture: Option<U>,
    pub side_texture: Option<U>,
    pub snow_texture: Option<U>,
    pub biome_texture: Option<U>,
    pub sand_top_texture: Option<U>,
    pub sand_side_texture: Option<U>,
}

impl<U> Default for UniformLocations<U> {
    fn default() -> Self {
        Self {
            model_matrix: None,
            view_matrix: None,
            projection_matrix: None,
            tint: None,
            inverse_transpose_matrix: None,
            light_direction: None,
            light_color: None,
            ambient_color: None,
            main_texture: None,
            top_texture: None,
            side_texture: None,
            snow_texture: None,
            biome_texture: None,
            sand_top_texture: None,
            sand_side_texture: None,
        }
    }
}

impl<U> UniformLocations<U> {
    fn resolve<G: GlContext<UniformLocation = U>>(gl: &G, program: G::Program) -> Self {
        let get = |name: &str| gl.uniform_location(program, name);
        Self {
            model_matrix: get(U_MODEL_MATRIX_NAME),
            view_matrix: get(U_VIEW_MATRIX_NAME),
            projection_matrix: get(U_PROJECTION_MATRIX_NAME),
            tint: get(U_TINT_NAME),
            inverse_transpose_matrix: get(U_INVERSETRANSPOSE_MATRIX_NAME),
            light_direction: get(U_LIGHTDIRECTION_NAME),
            light_color: get(U_LIGHTCOLOR_NAME),
            ambient_color: get(U_AMBIENTCOLOR_NAME),
            main_texture: get(U_MAINTEX_NAME),
            top_texture: get(U_TOP_TEXTURE_NAME),
            side_texture: get(U_SIDE_TEXTURE_NAME),
            snow_texture: get(U_SNOW_TEXTURE_NAME),
            biome_texture: get(U_BIOME_TEXTURE_NAME),
            sand_top_texture: get(U_SAND_TOP_TEXTURE_NAME),
            sand_side_texture: get(U_SAND_SIDE_TEXTURE_NAME),
        }
    }

    /// The terrain samplers in texture unit order.
    pub fn terrain_samplers(&self) -> [Option<&U>; 6] {
        [
            self.top_texture.as_ref(),
            self.side_texture.as_ref(),
            self.snow_texture.as_ref(),
            self.biome_texture.as_ref(),
            self.sand_top_texture.as_ref(),
            self.sand_side_texture.as_ref(),
        ]
    }
}

/// A linked program together with its standard locations.
///
/// A program that failed to link leaves the shader inert: no handle, no
/// locations, and activation does nothing.
pub struct Shader<G: GlContext> {
    program: Option<G::Program>,
    attrib_loc: AttribLocations,
    uniform_loc: UniformLocations<G::UniformLocation>,
    use_lighting: bool,
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                               Creation Functions                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl<G: GlContext> Shader<G> {
    pub fn new(gl: &G, vtx: &str, frag: &str) -> Self {
        match gl.link_program(vtx, frag) {
            Ok(program) => {
                let attrib_loc = AttribLocations::resolve(gl, program);
                let uniform_loc = UniformLocations::resolve(gl, program);
                log::debug!("Linked program {program:?}: {attrib_loc:?}");

                Self {
                    program: Some(program),
                    attrib_loc,
                    uniform_loc,
                    use_lighting: false,
                }
            }
            Err(info_log) => {
                log::error!("Could not link shader program: {info_log}");
                Self {
                    program: None,
                    attrib_loc: AttribLocations::default(),
                    uniform_loc: UniformLocations::default(),
                    use_lighting: false,
                }
            }
        }
    }

    pub fn with_lighting(mut self, use_lighting: bool) -> Self {
        self.use_lighting = use_lighting;
        self
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                              Usability Functions                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl<G: GlContext> Shader<G> {
    pub fn activate(&self, gl: &G) -> &Self {
        if let Some(program) = self.program {
            gl.use_program(Some(program));
        }
        self
    }

    pub fn deactivate(&self, gl: &G) -> &Self {
        if self.program.is_some() {
            gl.use_program(None);
        }
        self
    }

    /// Activates the program until the returned guard drops, then rebinds
    /// whatever program was current before.
    pub fn bind_scoped<'a>(&self, gl: &'a G) -> ActiveProgram<'a, G> {
        let previous = gl.current_program();
        self.activate(gl);
        ActiveProgram { gl, previous }
    }

    /// Releases the program. Unbinds it first if it is the current one.
    pub fn dispose(&mut self, gl: &G) {
        let Some(program) = self.program.take() else {
            return;
        };

        if gl.current_program() == Some(program) {
            gl.use_program(None);
        }
        gl.delete_program(program);

        self.attrib_loc = AttribLocations::default();
        self.uniform_loc = UniformLocations::default();
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                              Get / Set Functions                                                  //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[allow(dead_code)]
impl<G: GlContext> Shader<G> {
    pub fn program(&self) -> Option<G::Program> {
        self.program
    }

    pub fn is_valid(&self) -> bool {
        self.program.is_some()
    }

    pub fn uses_lighting(&self) -> bool {
        self.use_lighting
    }

    pub fn set_lighting(&mut self, use_lighting: bool) {
        self.use_lighting = use_lighting;
    }

    pub fn attrib_loc(&self) -> &AttribLocations {
        &self.attrib_loc
    }

    pub fn uniform_loc(&self) -> &UniformLocations<G::UniformLocation> {
        &self.uniform_loc
    }
}

/// Program binding held for a scope. See [`Shader::bind_scoped`].
pub struct ActiveProgram<'a, G: GlContext> {
    gl: &'a G,
    previous: Option<G::Program>,
}

impl<G: GlContext> Drop for ActiveProgram<'_, G> {
    fn drop(&mut self) {
        self.gl.use_program(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::context::recording::{Call, RecordingGl};

    const ALL_UNIFORMS: [&str; 15] = [
        U_MODEL_MATRIX_NAME,
        U_VIEW_MATRIX_NAME,
        U_PROJECTION_MATRIX_NAME,
        U_INVERSETRANSPOSE_MATRIX_NAME,
        U_LIGHTDIRECTION_NAME,
        U_LIGHTCOLOR_NAME,
        U_AMBIENTCOLOR_NAME,
        U_TINT_NAME,
        U_MAINTEX_NAME,
        U_TOP_TEXTURE_NAME,
        U_SIDE_TEXTURE_NAME,
        U_SNOW_TEXTURE_NAME,
        U_BIOME_TEXTURE_NAME,
        U_SAND_TOP_TEXTURE_NAME,
        U_SAND_SIDE_TEXTURE_NAME,
    ];

    fn loc(name: &str) -> Option<String> {
        Some(name.to_owned())
    }

    #[test]
    fn resolves_present_names_and_leaves_absent_ones_empty() {
        let gl = RecordingGl::new(
            &[(A_POSITION_NAME, 0), (A_NORMAL_NAME, 2)],
            &[
                U_MODEL_MATRIX_NAME,
                U_VIEW_MATRIX_NAME,
                U_PROJECTION_MATRIX_NAME,
                U_TOP_TEXTURE_NAME,
            ],
        );
        let shader = Shader::new(&gl, "", "");

        assert_eq!(shader.program(), Some(1));
        assert_eq!(
            *shader.attrib_loc(),
            AttribLocations {
                position: Some(0),
                vertex_color: None,
                normal: Some(2),
                tex_coords: None,
            }
        );

        let uniforms = shader.uniform_loc();
        assert_eq!(uniforms.model_matrix, loc(U_MODEL_MATRIX_NAME));
        assert_eq!(uniforms.view_matrix, loc(U_VIEW_MATRIX_NAME));
        assert_eq!(uniforms.projection_matrix, loc(U_PROJECTION_MATRIX_NAME));
        assert_eq!(uniforms.top_texture, loc(U_TOP_TEXTURE_NAME));
        assert_eq!(uniforms.tint, None);
        assert_eq!(uniforms.inverse_transpose_matrix, None);
        assert_eq!(uniforms.light_direction, None);
        assert_eq!(uniforms.main_texture, None);
        assert_eq!(uniforms.sand_side_texture, None);
    }

    #[test]
    fn looks_up_every_standard_uniform_once() {
        let gl = RecordingGl::new(&[], &ALL_UNIFORMS);
        let _shader = Shader::new(&gl, "", "");

        let lookups: Vec<_> = gl
            .take_calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UniformLocation(name) => Some(name),
                _ => None,
            })
            .collect();
        assert_eq!(lookups.len(), ALL_UNIFORMS.len());
        for name in ALL_UNIFORMS {
            assert!(lookups.iter().any(|lookup| lookup == name), "{name} not looked up");
        }
    }

    #[test]
    fn link_failure_leaves_an_inert_shader() {
        let gl = RecordingGl::failing();
        let mut shader = Shader::new(&gl, "", "");

        assert!(!shader.is_valid());
        assert_eq!(*shader.attrib_loc(), AttribLocations::default());
        assert_eq!(*shader.uniform_loc(), UniformLocations::default());

        shader.activate(&gl).deactivate(&gl);
        shader.dispose(&gl);
        assert!(gl.take_calls().is_empty());
    }

    #[test]
    fn activate_and_deactivate_toggle_the_binding() {
        let gl = RecordingGl::new(&[], &[]);
        let shader = Shader::new(&gl, "", "");

        shader.activate(&gl);
        assert_eq!(gl.current_program(), Some(1));
        shader.activate(&gl);
        assert_eq!(gl.current_program(), Some(1));
        shader.deactivate(&gl);
        assert_eq!(gl.current_program(), None);
    }

    #[test]
    fn dispose_unbinds_a_bound_program_before_deleting() {
        let gl = RecordingGl::new(&[], &[]);
        let mut shader = Shader::new(&gl, "", "");
        shader.activate(&gl);
        gl.take_calls();

        shader.dispose(&gl);
        assert_eq!(
            gl.take_calls(),
            vec![Call::UseProgram(None), Call::DeleteProgram(1)]
        );
        assert!(!shader.is_valid());
    }

    #[test]
    fn dispose_leaves_other_bindings_alone() {
        let gl = RecordingGl::new(&[], &[]);
        let mut shader = Shader::new(&gl, "", "");
        gl.use_program(Some(7));
        gl.take_calls();

        shader.dispose(&gl);
        assert_eq!(gl.take_calls(), vec![Call::DeleteProgram(1)]);
        assert_eq!(gl.current_program(), Some(7));
    }

    #[test]
    fn dispose_twice_deletes_once() {
        let gl = RecordingGl::new(&[], &[]);
        let mut shader = Shader::new(&gl, "", "");

        shader.dispose(&gl);
        shader.dispose(&gl);
        let deletes = gl
            .take_calls()
            .into_iter()
            .filter(|call| matches!(call, Call::DeleteProgram(_)))
            .count();
        assert_eq!(deletes, 1);
    }

    #[test]
    fn shaders_from_the_same_sources_own_separate_programs() {
        let gl = RecordingGl::new(&[], &[]);
        let mut first = Shader::new(&gl, "", "");
        let mut second = Shader::new(&gl, "", "");
        assert_ne!(first.program(), second.program());

        first.dispose(&gl);
        second.dispose(&gl);
        first.dispose(&gl);
        assert_eq!(
            gl.take_calls(),
            vec![Call::DeleteProgram(1), Call::DeleteProgram(2)]
        );
    }

    #[test]
    fn scoped_binding_restores_previous_program() {
        let gl = RecordingGl::new(&[], &[]);
        let shader = Shader::new(&gl, "", "");
        gl.use_program(Some(7));

        {
            let _bound = shader.bind_scoped(&gl);
            assert_eq!(gl.current_program(), Some(1));
        }
        assert_eq!(gl.current_program(), Some(7));
    }

    #[test]
    fn lighting_is_opt_in() {
        let gl = RecordingGl::new(&[], &[]);
        let shader = Shader::new(&gl, "", "");
        assert!(!shader.uses_lighting());
        assert!(shader.with_lighting(true).uses_lighting());
    }
}

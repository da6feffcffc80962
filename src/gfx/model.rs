use glam::Mat3;

use super::{
    camera::Camera,
    context::GlContext,
    lighting::{LightingData, Material},
    mesh::Mesh,
    shader::Shader,
    texture::{TextureCache, TERRAIN_TEXTURE_KEYS},
    transform::Transform,
};

/// A mesh placed in the world and drawn with the terrain material.
pub struct Model<G: GlContext> {
    pub transform: Transform,
    pub mesh: Mesh<G::VertexArray>,
    pub material: Material,
}

impl<G: GlContext> Model<G> {
    /// A missing material renders untinted (opaque white).
    pub fn new(
        transform: Transform,
        mesh: Mesh<G::VertexArray>,
        material: Option<Material>,
    ) -> Self {
        Self {
            transform,
            mesh,
            material: material.unwrap_or_default(),
        }
    }

    pub fn update(&mut self) -> &mut Self {
        self.transform.update_matrix();
        self
    }

    /// Draws the model with `shader`, leaving that program bound afterwards.
    pub fn render(
        &self,
        gl: &G,
        shader: &Shader<G>,
        camera: &Camera,
        lighting: &LightingData,
        textures: &TextureCache<G::Texture>,
    ) -> &Self {
        let uniforms = shader.uniform_loc();
        let model_mtx = self.transform.model_matrix();

        shader.activate(gl);

        gl.uniform_mat4(uniforms.model_matrix.as_ref(), &model_mtx);
        gl.uniform_mat4(uniforms.view_matrix.as_ref(), &camera.view_matrix());
        gl.uniform_mat4(uniforms.projection_matrix.as_ref(), &camera.projection_matrix());

        if shader.uses_lighting() {
            // Normals stay perpendicular under non-uniform scale.
            let normal_mtx = Mat3::from_mat4(model_mtx).inverse().transpose();
            gl.uniform_mat3(uniforms.inverse_transpose_matrix.as_ref(), &normal_mtx);
            gl.uniform_vec3(uniforms.light_direction.as_ref(), lighting.light_direction);
            gl.uniform_vec3(uniforms.light_color.as_ref(), lighting.light_color);
            gl.uniform_vec3(uniforms.ambient_color.as_ref(), lighting.ambient_color);
        }

        for (unit, (key, sampler)) in TERRAIN_TEXTURE_KEYS
            .iter()
            .zip(uniforms.terrain_samplers())
            .enumerate()
        {
            let texture = textures.get(key);
            if texture.is_none() {
                log::trace!("Texture \"{key}\" not loaded, unit {unit} left empty");
            }
            gl.active_texture(unit as u32);
            gl.bind_texture_2d(texture);
            gl.uniform_i32(sampler, unit as i32);
        }

        if uniforms.tint.is_some() {
            gl.uniform_vec4(uniforms.tint.as_ref(), self.material.tint);
        }

        gl.bind_vertex_array(Some(self.mesh.vao));
        match self.mesh.indexed_count() {
            Some(count) => gl.draw_elements_u16(self.mesh.draw_mode, count),
            None => gl.draw_arrays(self.mesh.draw_mode, self.mesh.vertex_count),
        }
        // Keep the next draw call from picking up this mesh's attributes.
        gl.bind_vertex_array(None);

        self
    }
}

#[cfg(test)]
mod tests {
    use eframe::glow;
    use glam::{Mat4, Vec3, Vec4};

    use super::*;
    use crate::gfx::{
        context::recording::{Call, RecordingGl},
        shader::*,
    };

    const LIT_UNIFORMS: [&str; 15] = [
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

    fn mesh(index_count: Option<i32>) -> Mesh<u32> {
        Mesh {
            vao: 9,
            draw_mode: glow::TRIANGLES,
            index_count,
            vertex_count: 24,
        }
    }

    fn textures() -> TextureCache<u32> {
        let mut cache = TextureCache::new();
        for (i, key) in TERRAIN_TEXTURE_KEYS.iter().enumerate() {
            cache.insert(*key, 100 + i as u32);
        }
        cache
    }

    fn render(
        gl: &RecordingGl,
        shader: &Shader<RecordingGl>,
        model: &Model<RecordingGl>,
    ) -> Vec<Call> {
        gl.take_calls();
        model.render(
            gl,
            shader,
            &Camera::new(),
            &LightingData::default(),
            &textures(),
        );
        gl.take_calls()
    }

    fn draws(calls: &[Call]) -> Vec<&Call> {
        calls
            .iter()
            .filter(|call| matches!(call, Call::DrawElementsU16 { .. } | Call::DrawArrays { .. }))
            .collect()
    }

    #[test]
    fn indexed_mesh_issues_one_indexed_draw() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let model = Model::new(Transform::new(), mesh(Some(36)), None);

        let calls = render(&gl, &shader, &model);
        assert_eq!(
            draws(&calls),
            vec![&Call::DrawElementsU16 {
                mode: glow::TRIANGLES,
                count: 36
            }]
        );
    }

    #[test]
    fn unindexed_mesh_draws_all_vertices() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");

        for index_count in [None, Some(0)] {
            let model = Model::new(Transform::new(), mesh(index_count), None);
            let calls = render(&gl, &shader, &model);
            assert_eq!(
                draws(&calls),
                vec![&Call::DrawArrays {
                    mode: glow::TRIANGLES,
                    count: 24
                }]
            );
        }
    }

    #[test]
    fn binds_program_first_and_unbinds_vao_last() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let model = Model::new(Transform::new(), mesh(None), None);

        let calls = render(&gl, &shader, &model);
        assert_eq!(calls.first(), Some(&Call::UseProgram(Some(1))));
        assert_eq!(calls.last(), Some(&Call::BindVertexArray(None)));
        assert_eq!(calls[calls.len() - 3], Call::BindVertexArray(Some(9)));
        assert_eq!(gl.current_program(), Some(1));
    }

    #[test]
    fn uploads_transform_and_camera_matrices() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let mut model = Model::new(
            Transform::new().with_pos(Vec3::new(4.0, 0.0, -2.0)),
            mesh(None),
            None,
        );
        model.update();

        let calls = render(&gl, &shader, &model);
        let camera = Camera::new();
        assert!(calls.contains(&Call::UniformMat4(
            Some(U_MODEL_MATRIX_NAME.to_owned()),
            Mat4::from_translation(Vec3::new(4.0, 0.0, -2.0))
        )));
        assert!(calls.contains(&Call::UniformMat4(
            Some(U_VIEW_MATRIX_NAME.to_owned()),
            camera.view_matrix()
        )));
        assert!(calls.contains(&Call::UniformMat4(
            Some(U_PROJECTION_MATRIX_NAME.to_owned()),
            camera.projection_matrix()
        )));
    }

    #[test]
    fn lighting_uniforms_only_when_shader_is_lit() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let unlit = Shader::new(&gl, "", "");
        let lit = Shader::new(&gl, "", "").with_lighting(true);
        let model = Model::new(Transform::new(), mesh(None), None);

        let calls = render(&gl, &unlit, &model);
        assert!(!calls
            .iter()
            .any(|call| matches!(call, Call::UniformMat3(..) | Call::UniformVec3(..))));

        let calls = render(&gl, &lit, &model);
        let lighting = LightingData::default();
        assert!(calls.contains(&Call::UniformMat3(
            Some(U_INVERSETRANSPOSE_MATRIX_NAME.to_owned()),
            Mat3::IDENTITY
        )));
        assert!(calls.contains(&Call::UniformVec3(
            Some(U_LIGHTDIRECTION_NAME.to_owned()),
            lighting.light_direction
        )));
        assert!(calls.contains(&Call::UniformVec3(
            Some(U_LIGHTCOLOR_NAME.to_owned()),
            lighting.light_color
        )));
        assert!(calls.contains(&Call::UniformVec3(
            Some(U_AMBIENTCOLOR_NAME.to_owned()),
            lighting.ambient_color
        )));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "").with_lighting(true);
        let mut model = Model::new(
            Transform::new().with_scale(Vec3::new(2.0, 1.0, 4.0)),
            mesh(None),
            None,
        );
        model.update();

        let calls = render(&gl, &shader, &model);
        let normal_mtx = calls
            .iter()
            .find_map(|call| match call {
                Call::UniformMat3(_, mtx) => Some(*mtx),
                _ => None,
            })
            .unwrap();
        assert!(normal_mtx.abs_diff_eq(
            Mat3::from_diagonal(Vec3::new(0.5, 1.0, 0.25)),
            1e-6
        ));
    }

    #[test]
    fn terrain_textures_bound_to_units_in_order() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let model = Model::new(Transform::new(), mesh(None), None);

        let calls = render(&gl, &shader, &model);
        let samplers = [
            U_TOP_TEXTURE_NAME,
            U_SIDE_TEXTURE_NAME,
            U_SNOW_TEXTURE_NAME,
            U_BIOME_TEXTURE_NAME,
            U_SAND_TOP_TEXTURE_NAME,
            U_SAND_SIDE_TEXTURE_NAME,
        ];
        for (unit, sampler) in samplers.iter().enumerate() {
            let expected = [
                Call::ActiveTexture(unit as u32),
                Call::BindTexture(Some(100 + unit as u32)),
                Call::UniformI32(Some(sampler.to_string()), unit as i32),
            ];
            assert!(
                calls.windows(3).any(|window| window == expected),
                "unit {unit} not bound"
            );
        }
    }

    #[test]
    fn sampler_locations_are_not_queried_per_frame() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let model = Model::new(Transform::new(), mesh(None), None);

        let calls = render(&gl, &shader, &model);
        assert!(!calls
            .iter()
            .any(|call| matches!(call, Call::UniformLocation(_))));
    }

    #[test]
    fn missing_texture_leaves_unit_empty() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let model = Model::new(Transform::new(), mesh(None), None);

        gl.take_calls();
        model.render(
            &gl,
            &shader,
            &Camera::new(),
            &LightingData::default(),
            &TextureCache::new(),
        );
        let binds = gl
            .take_calls()
            .into_iter()
            .filter(|call| matches!(call, Call::BindTexture(_)))
            .collect::<Vec<_>>();
        assert_eq!(binds, vec![Call::BindTexture(None); 6]);
    }

    #[test]
    fn tint_only_when_shader_declares_it() {
        let tinted = Material {
            tint: Vec4::new(0.2, 0.4, 0.6, 1.0),
        };

        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let model = Model::new(Transform::new(), mesh(None), Some(tinted));
        let calls = render(&gl, &shader, &model);
        assert!(calls.contains(&Call::UniformVec4(
            Some(U_TINT_NAME.to_owned()),
            tinted.tint
        )));

        let gl = RecordingGl::new(&[], &[U_MODEL_MATRIX_NAME]);
        let shader = Shader::new(&gl, "", "");
        let calls = render(&gl, &shader, &model);
        assert!(!calls
            .iter()
            .any(|call| matches!(call, Call::UniformVec4(..))));
    }

    #[test]
    fn default_material_stays_white_across_frames() {
        let gl = RecordingGl::new(&[], &LIT_UNIFORMS);
        let shader = Shader::new(&gl, "", "");
        let mut model = Model::new(Transform::new(), mesh(Some(6)), None);
        assert_eq!(model.material.tint, Vec4::ONE);

        for _ in 0..3 {
            model.update();
            let calls = render(&gl, &shader, &model);
            assert!(calls.contains(&Call::UniformVec4(
                Some(U_TINT_NAME.to_owned()),
                Vec4::new(1.0, 1.0, 1.0, 1.0)
            )));
            assert_eq!(model.material.tint, Vec4::ONE);
        }
    }

    #[test]
    fn inert_shader_still_draws_without_binding() {
        let gl = RecordingGl::failing();
        let shader = Shader::new(&gl, "", "");
        let model = Model::new(Transform::new(), mesh(None), None);

        let calls = render(&gl, &shader, &model);
        assert!(!calls.iter().any(|call| matches!(call, Call::UseProgram(_))));
        assert!(calls
            .iter()
            .filter_map(|call| match call {
                Call::UniformMat4(loc, _) => Some(loc),
                _ => None,
            })
            .all(Option::is_none));
        assert_eq!(draws(&calls).len(), 1);
    }
}

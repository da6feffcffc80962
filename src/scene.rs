use core::fmt;
use std::{error::Error, fs::File, io::BufReader, path::Path};

use eframe::glow;
use glam::{Vec3, Vec4};

use crate::gfx::{
    Camera, GlContext, LightingData, Material, MeshBuffers, Model, Shader, TextureCache,
    Transform,
};
use crate::terrain::{self, heightmap, Heightmap};

const CELL_SIZE: f32 = 2.0;
const HEIGHT_SCALE: f32 = 90.0;
const PROCEDURAL_SIDE: usize = heightmap::MAX_SIDE / 2;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     Errors Arrising when building a scene                                         //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, PartialEq)]
pub enum SceneError {
    InvalidShader,
}
impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidShader => write!(f, "Terrain shader did not link, see log for details"),
        }
    }
}
impl Error for SceneError {}

/// Vertex and fragment source of one program.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource<'a> {
    pub vtx: &'a str,
    pub frag: &'a str,
}

/// The terrain program linked with and without the lighting term.
/// Lighting is switched by drawing with the other program.
pub struct ShadingVariants<G: GlContext> {
    lit: Shader<G>,
    unlit: Shader<G>,
    use_lighting: bool,
}

impl<G: GlContext> ShadingVariants<G> {
    /// Fails if either program does not link. The other one is released then.
    pub fn new(gl: &G, lit: ShaderSource, unlit: ShaderSource) -> Result<Self, SceneError> {
        let mut variants = Self {
            lit: Shader::new(gl, lit.vtx, lit.frag).with_lighting(true),
            unlit: Shader::new(gl, unlit.vtx, unlit.frag),
            use_lighting: true,
        };
        if !variants.lit.is_valid() || !variants.unlit.is_valid() {
            variants.dispose(gl);
            return Err(SceneError::InvalidShader);
        }

        Ok(variants)
    }

    pub fn current(&self) -> &Shader<G> {
        if self.use_lighting {
            &self.lit
        } else {
            &self.unlit
        }
    }

    pub fn uses_lighting(&self) -> bool {
        self.use_lighting
    }

    pub fn set_lighting(&mut self, use_lighting: bool) {
        self.use_lighting = use_lighting;
    }

    pub fn dispose(&mut self, gl: &G) {
        self.lit.dispose(gl);
        self.unlit.dispose(gl);
    }
}

/// Everything one frame of the terrain needs, shared with the paint callback.
pub struct TerrainScene {
    pub camera: Camera,
    pub lighting: LightingData,

    model: Model<glow::Context>,
    shaders: ShadingVariants<glow::Context>,
    textures: TextureCache<glow::Texture>,
    buffers: Option<MeshBuffers>,
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                              Build The Scene                                                      //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl TerrainScene {
    pub fn new(
        gl: &glow::Context,
        lit_src: ShaderSource,
        unlit_src: ShaderSource,
        texture_dir: &Path,
        heightmap_path: &Path,
    ) -> Result<Self, Box<dyn Error>> {
        let shaders = ShadingVariants::new(gl, lit_src, unlit_src)?;

        let textures = TextureCache::load_terrain(gl, texture_dir)?;

        let map = if heightmap_path.is_file() {
            log::info!("{}: Reading heightmap", heightmap_path.display());
            Heightmap::from_r16(&mut BufReader::new(File::open(heightmap_path)?))?
        } else {
            log::info!(
                "{} not found, generating terrain",
                heightmap_path.display()
            );
            Heightmap::procedural(PROCEDURAL_SIDE)?
        };

        let (verts, indices) = terrain::build_grid(&map, CELL_SIZE, HEIGHT_SCALE);
        let buffers = MeshBuffers::upload(
            gl,
            shaders.current().attrib_loc(),
            glow::TRIANGLES,
            &verts,
            Some(&indices),
        )?;

        let model = Model::new(Transform::new(), buffers.mesh(), None);

        let half = (map.side() - 1) as f32 * CELL_SIZE * 0.5;
        let camera = Camera::new()
            .with_pos(Vec3::new(0.0, HEIGHT_SCALE * 1.2, half * 1.3))
            .with_yaw(-90.0)
            .with_pitch(-25.0);

        Ok(Self {
            camera,
            lighting: LightingData::default(),
            model,
            shaders,
            textures,
            buffers: Some(buffers),
        })
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                            Outer Scene Interfacing                                                //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl TerrainScene {
    pub fn tint(&self) -> Vec4 {
        self.model.material.tint
    }

    pub fn set_tint(&mut self, tint: Vec4) {
        self.model.material = Material { tint };
    }

    pub fn uses_lighting(&self) -> bool {
        self.shaders.uses_lighting()
    }

    pub fn set_lighting(&mut self, use_lighting: bool) {
        self.shaders.set_lighting(use_lighting);
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.model.transform
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                                Scene Rendering                                                    //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl TerrainScene {
    /// Renders one frame. The program bound before the call is bound again afterwards.
    pub fn draw(&mut self, gl: &glow::Context, aspect: f32) {
        if self.buffers.is_none() {
            return;
        }

        self.camera.set_aspect(aspect);
        self.camera.update();

        let shader = self.shaders.current();
        let _bound = shader.bind_scoped(gl);
        self.model.update().render(
            gl,
            shader,
            &self.camera,
            &self.lighting,
            &self.textures,
        );
    }

    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        self.shaders.dispose(gl);
        self.textures.destroy(gl);
        if let Some(buffers) = self.buffers.take() {
            buffers.destroy(gl);
        }
    }
}

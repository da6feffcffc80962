pub mod camera;
pub mod context;
pub mod lighting;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod texture;
pub mod transform;
pub mod vertex;

pub use camera::Camera;
pub use context::GlContext;
pub use lighting::{LightingData, Material};
pub use mesh::{Mesh, MeshBuffers};
pub use model::Model;
pub use shader::Shader;
pub use texture::TextureCache;
pub use transform::Transform;
pub use vertex::Vertex;

use std::mem::{offset_of, size_of};

use eframe::glow;
use zerocopy::AsBytes;

use super::{shader::AttribLocations, Vertex};

/// What a draw call needs to know about uploaded geometry.
///
/// A present, non-zero `index_count` selects indexed drawing; otherwise
/// `vertex_count` vertices are drawn in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh<A> {
    pub vao: A,
    pub draw_mode: u32,
    pub index_count: Option<i32>,
    pub vertex_count: i32,
}

impl<A> Mesh<A> {
    pub fn indexed_count(&self) -> Option<i32> {
        self.index_count.filter(|&count| count > 0)
    }
}

/// GPU buffers backing a [`Mesh`]. Owned by whoever uploaded them.
#[derive(Debug)]
pub struct MeshBuffers {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    mesh: Mesh<glow::VertexArray>,
}

impl MeshBuffers {
    /// Uploads the vertices (and indices, if any) and wires the vertex layout
    /// to the attribute slots the shader reported. Attributes the shader
    /// does not read are left disabled.
    pub fn upload(
        gl: &glow::Context,
        attribs: &AttribLocations,
        draw_mode: u32,
        verts: &[Vertex],
        indices: Option<&[u16]>,
    ) -> Result<Self, String> {
        use glow::HasContext as _;

        let indices = indices.filter(|indices| !indices.is_empty());

        unsafe {
            // Nothing is bound until every object exists.
            let vao = gl.create_vertex_array()?;
            let vbo = release_on_error(gl.create_buffer(), || gl.delete_vertex_array(vao))?;
            let ebo = match indices {
                Some(_) => Some(release_on_error(gl.create_buffer(), || {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                })?),
                None => None,
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, verts.as_bytes(), glow::STATIC_DRAW);

            let stride = size_of::<Vertex>() as i32;
            let layout = [
                (attribs.position, 3, offset_of!(Vertex, pos)),
                (attribs.vertex_color, 4, offset_of!(Vertex, clr)),
                (attribs.normal, 3, offset_of!(Vertex, nrm)),
                (attribs.tex_coords, 2, offset_of!(Vertex, uv)),
            ];
            for (loc, size, offset) in layout {
                if let Some(loc) = loc {
                    gl.enable_vertex_attrib_array(loc);
                    gl.vertex_attrib_pointer_f32(loc, size, glow::FLOAT, false, stride, offset as _);
                }
            }

            if let (Some(ebo), Some(indices)) = (ebo, indices) {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    indices.as_bytes(),
                    glow::STATIC_DRAW,
                );
            }

            // The element buffer binding is VAO state, so unbind the VAO first.
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            let mesh = Mesh {
                vao,
                draw_mode,
                index_count: indices.map(|indices| indices.len() as i32),
                vertex_count: verts.len() as i32,
            };
            log::debug!(
                "Uploaded mesh: {} vertices, {:?} indices",
                mesh.vertex_count,
                mesh.index_count
            );

            Ok(Self { vao, vbo, ebo, mesh })
        }
    }

    pub fn mesh(&self) -> Mesh<glow::VertexArray> {
        self.mesh
    }

    pub fn destroy(self, gl: &glow::Context) {
        use glow::HasContext as _;

        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            if let Some(ebo) = self.ebo {
                gl.delete_buffer(ebo);
            }
        }
    }
}

/// Passes `created` through, running `release` first if it is an error.
fn release_on_error<T>(created: Result<T, String>, release: impl FnOnce()) -> Result<T, String> {
    if created.is_err() {
        release();
    }
    created
}

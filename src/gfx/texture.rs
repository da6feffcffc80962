use std::{collections::HashMap, error::Error, fmt, path::Path, path::PathBuf};

use eframe::glow;

/// Texture keys of the terrain material, in the texture unit order the
/// terrain shader samples them: top, side, snow, biome, sand top, sand side.
pub const TERRAIN_TEXTURE_KEYS: [&str; 6] = ["grass", "rock", "snow", "biome", "sand", "sandstone"];

const TEXTURE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug)]
pub enum TextureError {
    Missing(String),
    Decode(PathBuf, String),
    Gpu(String),
}
impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "No texture file found for \"{key}\""),
            Self::Decode(path, e) => write!(f, "Could not decode {}: {e}", path.display()),
            Self::Gpu(e) => write!(f, "Could not create texture: {e}"),
        }
    }
}
impl Error for TextureError {}

/// Named textures handed to the renderer.
#[derive(Debug, Clone)]
pub struct TextureCache<T> {
    textures: HashMap<String, T>,
}

#[allow(dead_code)]
impl<T: Copy> TextureCache<T> {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, texture: T) -> Option<T> {
        self.textures.insert(key.into(), texture)
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.textures.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Empties the cache, handing every texture to `release`.
    pub fn release_all(&mut self, mut release: impl FnMut(T)) {
        for (_, texture) in self.textures.drain() {
            release(texture);
        }
    }
}

impl<T: Copy> Default for TextureCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                               Loading From Disk                                                   //
///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// First file in `dir` named `<key>.<png|jpg|jpeg>`.
pub fn find_texture_file(dir: &Path, key: &str) -> Option<PathBuf> {
    let pattern = dir.join(format!("{key}.*"));
    let paths = glob::glob(pattern.to_str()?).ok()?;

    paths.filter_map(Result::ok).find(|path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TEXTURE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    })
}

impl<T: Copy> TextureCache<T> {
    /// Loads every terrain texture in `dir` through `upload`. Keys without a
    /// file are skipped with a warning. If an upload fails, the textures
    /// loaded so far go to `release` and the error is returned.
    pub fn load_terrain_with(
        dir: &Path,
        mut upload: impl FnMut(&Path) -> Result<T, TextureError>,
        release: impl FnMut(T),
    ) -> Result<Self, TextureError> {
        let mut cache = Self::new();

        for key in TERRAIN_TEXTURE_KEYS {
            let Some(path) = find_texture_file(dir, key) else {
                log::warn!("{}", TextureError::Missing(key.to_owned()));
                continue;
            };

            match upload(&path) {
                Ok(texture) => {
                    log::info!("{}: Loaded texture \"{key}\"", path.display());
                    cache.insert(key, texture);
                }
                Err(e) => {
                    cache.release_all(release);
                    return Err(e);
                }
            }
        }

        Ok(cache)
    }
}

impl TextureCache<glow::Texture> {
    pub fn load_terrain(gl: &glow::Context, dir: &Path) -> Result<Self, TextureError> {
        Self::load_terrain_with(
            dir,
            |path| upload_image(gl, path),
            |texture| delete_texture(gl, texture),
        )
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        self.release_all(|texture| delete_texture(gl, texture));
    }
}

fn delete_texture(gl: &glow::Context, texture: glow::Texture) {
    use glow::HasContext as _;
    unsafe { gl.delete_texture(texture) };
}

fn upload_image(gl: &glow::Context, path: &Path) -> Result<glow::Texture, TextureError> {
    use glow::HasContext as _;

    let image = image::open(path)
        .map_err(|e| TextureError::Decode(path.to_path_buf(), e.to_string()))?
        .to_rgba8();

    unsafe {
        let texture = gl.create_texture().map_err(TextureError::Gpu)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));

        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR_MIPMAP_LINEAR as i32,
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);

        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            image.width() as i32,
            image.height() as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            Some(image.as_raw()),
        );
        gl.generate_mipmap(glow::TEXTURE_2D);

        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(texture)
    }
}

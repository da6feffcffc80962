use byteorder::{ByteOrder, LE};
use std::{error::Error, fmt, io::Read};

/// Largest side whose vertices can still be addressed with 16 bit indices.
pub const MAX_SIDE: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum HeightmapError {
    NotSquare(usize),
    TooLarge(usize),
    TooSmall(usize),
    OddByteCount(usize),
}
impl fmt::Display for HeightmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeightmapError::*;
        match self {
            NotSquare(len) => write!(f, "HeightmapError: {len} samples do not form a square"),
            TooLarge(side) => write!(f, "HeightmapError: side {side} exceeds {MAX_SIDE}"),
            TooSmall(side) => write!(f, "HeightmapError: side {side} is below 2"),
            OddByteCount(len) => write!(f, "HeightmapError: {len} bytes leave half a sample"),
        }
    }
}
impl Error for HeightmapError {}

/// A square grid of heights normalized to `0.0..=1.0`, stored row by row (z major).
#[derive(Debug, Clone)]
pub struct Heightmap {
    side: usize,
    heights: Vec<f32>,
}

impl Heightmap {
    pub fn from_heights(heights: Vec<f32>) -> Result<Self, HeightmapError> {
        let side = (heights.len() as f64).sqrt() as usize;
        if side * side != heights.len() {
            return Err(HeightmapError::NotSquare(heights.len()));
        }
        if side < 2 {
            return Err(HeightmapError::TooSmall(side));
        }
        if side > MAX_SIDE {
            return Err(HeightmapError::TooLarge(side));
        }

        Ok(Self { side, heights })
    }

    /// Reads raw little endian `u16` samples until the end of the stream.
    pub fn from_r16<R: Read>(reader: &mut R) -> Result<Self, Box<dyn Error>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.len() % 2 != 0 {
            return Err(HeightmapError::OddByteCount(bytes.len()).into());
        }

        let mut samples = vec![0u16; bytes.len() / 2];
        LE::read_u16_into(&bytes, &mut samples);
        let heights = samples
            .into_iter()
            .map(|sample| sample as f32 / u16::MAX as f32)
            .collect();

        Ok(Self::from_heights(heights)?)
    }

    /// Rolling hills with a ridge, enough to exercise every terrain layer.
    pub fn procedural(side: usize) -> Result<Self, HeightmapError> {
        let step = 1.0 / (side.max(2) - 1) as f32;
        let mut heights = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                let (u, v) = (x as f32 * step, z as f32 * step);
                let hills = (u * 9.0).sin() * (v * 7.0).cos() * 0.25;
                let ridge = 1.0 - ((u - 0.6) * 3.5).abs().min(1.0);
                let basin = (v - 0.2).min(0.0) * 1.5;
                heights.push((0.35 + hills + ridge * ridge * 0.55 + basin).clamp(0.0, 1.0));
            }
        }

        Self::from_heights(heights)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Height at a grid point, clamped to the grid.
    pub fn get(&self, x: isize, z: isize) -> f32 {
        let max = self.side as isize - 1;
        let (x, z) = (x.clamp(0, max) as usize, z.clamp(0, max) as usize);
        self.heights[z * self.side + x]
    }
}

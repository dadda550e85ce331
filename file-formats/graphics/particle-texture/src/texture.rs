use crate::format::{COMPONENT_SIZE, PixelFormat};
use crate::layout::TextureLayout;
use std::fmt;

/// A packed, row-major float pixel buffer ready for upload.
///
/// The buffer is at least [`TextureLayout::expected_len`] bytes long. It is
/// longer only when oversized input was passed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticleTexture {
    layout: TextureLayout,
    data: Vec<u8>,
    source_len: usize,
}

impl ParticleTexture {
    pub(crate) fn from_parts(layout: TextureLayout, data: Vec<u8>, source_len: usize) -> Self {
        Self {
            layout,
            data,
            source_len,
        }
    }

    /// Layout the texture was packed with
    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    /// Texture width in pixels
    pub fn width(&self) -> u32 {
        self.layout.width()
    }

    /// Texture height in pixels
    pub fn height(&self) -> u32 {
        self.layout.height()
    }

    /// Pixel format of the buffer
    pub fn format(&self) -> PixelFormat {
        self.layout.format()
    }

    /// Number of particles stored in the texture
    pub fn particle_count(&self) -> u32 {
        self.layout.particle_count()
    }

    /// Raw pixel bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the raw pixel bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Length of the pixel buffer in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the pixel buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the input the texture was packed from
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Whether zero bytes were appended to the input
    pub fn is_padded(&self) -> bool {
        self.source_len < self.data.len()
    }

    /// Whether the buffer is longer than the texture requires
    pub fn is_oversized(&self) -> bool {
        self.data.len() > self.layout.expected_len()
    }

    /// Decode the float components of the pixel at `index`
    pub fn texel(&self, index: usize) -> Option<Vec<f32>> {
        let size = self.format().bytes_per_pixel();
        if index >= self.layout.pixel_count() {
            return None;
        }
        let start = index.checked_mul(size)?;
        let bytes = self.data.get(start..start + size)?;

        Some(
            bytes
                .chunks_exact(COMPONENT_SIZE)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}

impl fmt::Display for ParticleTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} texture {}x{} ({} particles, {} bytes)",
            self.format(),
            self.width(),
            self.height(),
            self.particle_count(),
            self.len()
        )
    }
}

//! Texture dimension derivation and the padding policy

use crate::error::{EncodeError, Result};
use crate::format::PixelFormat;
use crate::texture::ParticleTexture;
use log::{debug, warn};
use std::io::Read;

/// What to do with input that is longer than the derived texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OversizePolicy {
    /// Hand the oversized buffer through untouched
    #[default]
    PassThrough,
    /// Cut the buffer down to the texture size
    Truncate,
    /// Fail with [`EncodeError::Oversized`]
    Reject,
}

/// Derive the texture size for `particle_count` particles.
///
/// The width is `ceil(sqrt(n))` and the height `ceil(n / width)`, the
/// smallest rectangle with `width >= height` that covers every particle.
/// Zero particles yield `(0, 0)`.
pub fn texture_dimensions(particle_count: u32) -> (u32, u32) {
    if particle_count == 0 {
        return (0, 0);
    }

    // isqrt(u32::MAX) squared still fits in u32
    let mut width = particle_count.isqrt();
    if width * width < particle_count {
        width += 1;
    }
    let height = particle_count.div_ceil(width);
    (width, height)
}

/// Shape of the texture that will hold a given particle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureLayout {
    particle_count: u32,
    width: u32,
    height: u32,
    format: PixelFormat,
    byte_len: usize,
}

impl TextureLayout {
    /// Build the layout for `particle_count` particles of `stride` components
    pub fn for_particles(particle_count: u32, stride: u32) -> Result<Self> {
        let (width, height) = texture_dimensions(particle_count);
        if width == 0 || height == 0 {
            return Err(EncodeError::EmptyInput(particle_count));
        }

        let format = PixelFormat::for_stride(stride);
        let byte_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or(EncodeError::TextureTooLarge { width, height })?;

        debug!(
            "Layout for {} particles (stride {}): {}x{} {}, {} bytes",
            particle_count, stride, width, height, format, byte_len
        );

        Ok(Self {
            particle_count,
            width,
            height,
            format,
            byte_len,
        })
    }

    /// Number of particles the layout was derived from
    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    /// Texture width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format selected from the stride
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Total pixels, always at least the particle count
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Exact byte count the texture requires
    pub fn expected_len(&self) -> usize {
        self.byte_len
    }

    /// Bytes actually covered by particles, without the padding of the last row
    pub fn particle_len(&self) -> usize {
        self.particle_count as usize * self.format.bytes_per_pixel()
    }

    /// Pack `bytes` with the default [`OversizePolicy::PassThrough`]
    pub fn encode(&self, bytes: impl Into<Vec<u8>>) -> ParticleTexture {
        let mut data = bytes.into();
        let source_len = data.len();
        self.pad(&mut data);
        ParticleTexture::from_parts(*self, data, source_len)
    }

    /// Pack `bytes`, handling oversized input according to `policy`
    pub fn encode_with(
        &self,
        bytes: impl Into<Vec<u8>>,
        policy: OversizePolicy,
    ) -> Result<ParticleTexture> {
        let mut data = bytes.into();
        let source_len = data.len();

        if source_len > self.byte_len {
            match policy {
                OversizePolicy::PassThrough => {
                    warn!(
                        "Passing {} bytes through for a {} byte texture",
                        source_len, self.byte_len
                    );
                }
                OversizePolicy::Truncate => {
                    warn!(
                        "Truncating {} bytes to {} for a {}x{} texture",
                        source_len, self.byte_len, self.width, self.height
                    );
                    data.truncate(self.byte_len);
                }
                OversizePolicy::Reject => {
                    return Err(EncodeError::Oversized {
                        expected: self.byte_len,
                        actual: source_len,
                    });
                }
            }
        } else {
            self.pad(&mut data);
        }

        Ok(ParticleTexture::from_parts(*self, data, source_len))
    }

    /// Read everything from `reader` and pack it
    pub fn encode_reader<R: Read>(
        &self,
        mut reader: R,
        policy: OversizePolicy,
    ) -> Result<ParticleTexture> {
        let mut data = Vec::with_capacity(self.byte_len);
        reader.read_to_end(&mut data)?;
        self.encode_with(data, policy)
    }

    fn pad(&self, data: &mut Vec<u8>) {
        if data.len() >= self.byte_len {
            return;
        }

        if data.len() < self.particle_len() {
            warn!(
                "Input covers {} of {} particle bytes, the rest is zero filled",
                data.len(),
                self.particle_len()
            );
        } else {
            debug!(
                "Padding {} bytes to {} for a {}x{} texture",
                data.len(),
                self.byte_len,
                self.width,
                self.height
            );
        }
        data.resize(self.byte_len, 0);
    }
}

/// Pack `bytes` holding `particle_count` particles of `stride` floats each.
///
/// Short input is zero padded to the exact size of the derived texture,
/// longer input is passed through untouched.
///
/// # Examples
///
/// ```
/// use particle_texture::{PixelFormat, encode};
///
/// let texture = encode(vec![0u8; 16_000], 1000, 4).unwrap();
/// assert_eq!((texture.width(), texture.height()), (32, 32));
/// assert_eq!(texture.format(), PixelFormat::Rgba32Float);
/// assert_eq!(texture.len(), 16_384);
/// ```
pub fn encode(
    bytes: impl Into<Vec<u8>>,
    particle_count: u32,
    stride: u32,
) -> Result<ParticleTexture> {
    Ok(TextureLayout::for_particles(particle_count, stride)?.encode(bytes))
}

/// Read raw bytes from `reader` and pack them like [`encode`].
///
/// Read failures surface as [`EncodeError::UpstreamIo`].
pub fn encode_reader<R: Read>(
    reader: R,
    particle_count: u32,
    stride: u32,
    policy: OversizePolicy,
) -> Result<ParticleTexture> {
    TextureLayout::for_particles(particle_count, stride)?.encode_reader(reader, policy)
}

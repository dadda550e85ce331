use std::fmt;

/// Size of a single float component on disk and in the pixel buffer.
pub const COMPONENT_SIZE: usize = 4;

/// Stride from which the four component format is selected.
pub const VECTOR_STRIDE: u32 = 4;

/// Pixel formats a particle texture can be stored in.
///
/// Only linear 32-bit float formats are supported, there is no integer or
/// normalized variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelFormat {
    /// One float per pixel, used for scalar attributes
    R32Float,
    /// Four floats per pixel, used for padded positions
    Rgba32Float,
}

impl PixelFormat {
    /// Select the format for an attribute with `stride` components per particle
    pub fn for_stride(stride: u32) -> Self {
        if stride >= VECTOR_STRIDE {
            PixelFormat::Rgba32Float
        } else {
            PixelFormat::R32Float
        }
    }

    /// Number of float components in one pixel
    pub fn components(self) -> usize {
        match self {
            PixelFormat::R32Float => 1,
            PixelFormat::Rgba32Float => 4,
        }
    }

    /// Size of one pixel in bytes
    pub fn bytes_per_pixel(self) -> usize {
        self.components() * COMPONENT_SIZE
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::R32Float => write!(f, "R32Float"),
            PixelFormat::Rgba32Float => write!(f, "RGBA32Float"),
        }
    }
}

//! Error types for texture encoding

use std::io;
use thiserror::Error;

/// Errors that can occur while packing particle data into a texture
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The particle count resolves to a zero sized texture
    #[error("Cannot build a texture for {0} particles")]
    EmptyInput(u32),

    /// The derived texture does not fit into addressable memory
    #[error("Texture of {width}x{height} pixels exceeds addressable memory")]
    TextureTooLarge {
        /// Derived width in pixels
        width: u32,
        /// Derived height in pixels
        height: u32,
    },

    /// Input is longer than the derived texture and the policy rejects it
    #[error("Input holds {actual} bytes but the texture only takes {expected}")]
    Oversized {
        /// Byte count the texture requires
        expected: usize,
        /// Byte count that was supplied
        actual: usize,
    },

    /// The raw bytes could not be obtained from upstream
    #[error("Failed to read raw particle data: {0}")]
    UpstreamIo(#[from] io::Error),
}

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, EncodeError>;

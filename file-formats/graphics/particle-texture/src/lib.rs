//! Packs raw particle data into GPU-ready float textures.
//!
//! Particle exports store one or four little-endian `f32` values per
//! particle. This crate turns such a byte buffer into a rectangular pixel
//! buffer that a renderer can upload as-is:
//!
//! - the texture is close to square: `width = ceil(sqrt(n))`,
//!   `height = ceil(n / width)`
//! - a stride of four selects [`PixelFormat::Rgba32Float`], anything
//!   smaller [`PixelFormat::R32Float`]
//! - short input is zero padded to exactly `width * height * bytes_per_pixel`
//!
//! # Examples
//!
//! ```
//! use particle_texture::{TextureLayout, OversizePolicy};
//!
//! let layout = TextureLayout::for_particles(1000, 1)?;
//! assert_eq!(layout.expected_len(), 32 * 32 * 4);
//!
//! let texture = layout.encode_with(vec![0u8; 4000], OversizePolicy::Truncate)?;
//! assert_eq!(texture.len(), 4096);
//! # Ok::<(), particle_texture::EncodeError>(())
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Error types for texture encoding
pub mod error;
/// Pixel formats
pub mod format;
/// Dimension derivation and padding
pub mod layout;
/// Packed texture buffers
pub mod texture;

pub use error::{EncodeError, Result};
pub use format::PixelFormat;
pub use layout::{OversizePolicy, TextureLayout, encode, encode_reader, texture_dimensions};
pub use texture::ParticleTexture;

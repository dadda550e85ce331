//! Error types for galaxy loading

use crate::manifest::FamilyKind;
use particle_texture::EncodeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that make the manifest unusable
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        /// Path of the manifest
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The manifest is missing required fields or is not valid JSON
    #[error("Malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors a renderer reports when it refuses a texture
#[derive(Debug, Error)]
pub enum UploadError {
    /// The buffer does not match the size the renderer expects
    #[error("Texture size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Bytes the renderer expected
        expected: usize,
        /// Bytes it was given
        actual: usize,
    },

    /// Any other refusal
    #[error("Texture rejected: {0}")]
    Rejected(String),
}

/// Main error type for galaxy loading
#[derive(Debug, Error)]
pub enum Error {
    /// Manifest could not be loaded
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A referenced binary file does not exist
    #[error("File not found: {0}")]
    FileMissing(PathBuf),

    /// Packing the file into a texture failed
    #[error("Failed to encode {path}: {source}")]
    Encode {
        /// File that was being encoded
        path: PathBuf,
        /// Encoder error
        source: EncodeError,
    },

    /// The renderer refused the texture
    #[error("Renderer of {family} refused the texture: {source}")]
    Upload {
        /// Family the texture belongs to
        family: FamilyKind,
        /// Renderer error
        source: UploadError,
    },

    /// A family name that is not part of the manifest
    #[error("Unknown particle family: {0}")]
    UnknownFamily(String),

    /// The family has no renderer assigned
    #[error("No renderer assigned to {0}")]
    NoTarget(FamilyKind),

    /// Attribute switch on a family that has not finished loading
    #[error("{0} has not been loaded")]
    NotLoaded(FamilyKind),

    /// An attribute index past the end of the family's attributes
    #[error("{family} has {available} attributes, index {index} requested")]
    AttributeIndex {
        /// Family that was addressed
        family: FamilyKind,
        /// Requested index
        index: usize,
        /// Number of attributes the family has
        available: usize,
    },

    /// Attribute display range is inverted or not finite
    #[error("Attribute {name} has an invalid range [{min}, {max}]")]
    InvalidRange {
        /// Attribute name
        name: String,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },
}

impl Error {
    /// Encoder error behind this error, if any
    pub fn encode_error(&self) -> Option<&EncodeError> {
        match self {
            Error::Encode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for galaxy loading
pub type Result<T> = std::result::Result<T, Error>;

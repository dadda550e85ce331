//! Loader for galaxy particle exports.
//!
//! An export is a directory with a `manifest.json` and raw little-endian
//! float files. The manifest lists up to three particle families (gas,
//! stars, dark matter), each with a particle count, a position file of four
//! floats per particle and any number of scalar attribute files.
//!
//! [`GalaxyLoader`] walks the families, packs their files into textures with
//! [`particle_texture`] and hands the textures to one [`ParticleRenderer`]
//! per family.
//!
//! # Examples
//!
//! ```no_run
//! use galaxy_particles::{
//!     AttributeManifest, FamilyKind, GalaxyLoader, LoaderConfig, ParticleRenderer,
//!     ParticleTexture, UploadError,
//! };
//!
//! struct Effect;
//!
//! impl ParticleRenderer for Effect {
//!     fn set_position_map(&mut self, texture: ParticleTexture) -> Result<(), UploadError> {
//!         println!("positions: {texture}");
//!         Ok(())
//!     }
//!
//!     fn set_color_map(
//!         &mut self,
//!         texture: ParticleTexture,
//!         attribute: &AttributeManifest,
//!     ) -> Result<(), UploadError> {
//!         println!("{}: {texture} in [{}, {}]", attribute.name, attribute.min, attribute.max);
//!         Ok(())
//!     }
//!
//!     fn play(&mut self) {}
//! }
//!
//! let mut loader = GalaxyLoader::open(LoaderConfig::new("exports/m31"))?
//!     .with_target(FamilyKind::Gas, Effect)
//!     .with_target(FamilyKind::Star, Effect);
//! let report = loader.load_all();
//! println!("{} families ready", report.ready_count());
//! # Ok::<(), galaxy_particles::Error>(())
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Loader configuration
pub mod config;
/// Error types
pub mod error;
/// Family loading pipeline
pub mod loader;
/// Manifest data model
pub mod manifest;
/// Renderer interface
pub mod renderer;
/// Binary file access
pub mod source;

pub use config::LoaderConfig;
pub use error::{Error, ManifestError, Result, UploadError};
pub use loader::{
    ATTRIBUTE_STRIDE, FamilyReport, FamilyState, GalaxyLoader, LoadReport, MapStatus,
    POSITION_STRIDE,
};
pub use manifest::{
    AttributeManifest, FamilyKind, FamilyManifest, GalaxyManifest, MANIFEST_FILE_NAME, ValueRange,
};
pub use particle_texture::{EncodeError, OversizePolicy, ParticleTexture, PixelFormat};
pub use renderer::ParticleRenderer;
pub use source::{DataSource, DirectorySource, MemorySource};

//! Loader configuration

use crate::error::ManifestError;
use crate::manifest::MANIFEST_FILE_NAME;
use particle_texture::OversizePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How a galaxy export is located and decoded.
///
/// Hosts usually build this with the chained setters, or embed it in their
/// own JSON settings and decode it with [`LoaderConfig::from_json_str`]:
///
/// ```
/// use galaxy_particles::LoaderConfig;
///
/// let config = LoaderConfig::from_json_str(r#"{"root": "exports/m31", "max_particles": 50000}"#)?;
/// assert_eq!(config.max_particles, Some(50_000));
/// assert_eq!(config.manifest_path().file_name().unwrap(), "manifest.json");
/// # Ok::<(), galaxy_particles::ManifestError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory holding the manifest and the binary files
    pub root: PathBuf,

    /// Manifest file name inside `root`
    pub manifest_name: String,

    /// Upper bound on particles loaded per family.
    ///
    /// `None` (default) loads the manifest's count unchanged. A clamped
    /// family keeps only its first `max_particles` records: its files are
    /// truncated to the smaller texture whatever `oversize` says.
    pub max_particles: Option<u32>,

    /// Handling of files longer than their texture
    #[serde(with = "oversize_policy")]
    pub oversize: OversizePolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            manifest_name: MANIFEST_FILE_NAME.to_string(),
            max_particles: None,
            oversize: OversizePolicy::default(),
        }
    }
}

impl LoaderConfig {
    /// Create a configuration for the export at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_owned(),
            ..Self::default()
        }
    }

    /// Decode a configuration from JSON, missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the manifest file name
    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Cap the particle count of every family
    pub fn max_particles(mut self, max: u32) -> Self {
        self.max_particles = Some(max);
        self
    }

    /// Set the oversized input handling
    pub fn oversize(mut self, policy: OversizePolicy) -> Self {
        self.oversize = policy;
        self
    }

    /// Full path of the manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest_name)
    }

    /// Particle count to load for a family declaring `count`
    pub fn effective_count(&self, count: u32) -> u32 {
        match self.max_particles {
            Some(max) => count.min(max),
            None => count,
        }
    }

    /// Oversize handling for a family declaring `count`
    pub fn oversize_for(&self, count: u32) -> OversizePolicy {
        if self.effective_count(count) < count {
            OversizePolicy::Truncate
        } else {
            self.oversize
        }
    }
}

mod oversize_policy {
    use particle_texture::OversizePolicy;
    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OversizePolicy, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        match name.as_str() {
            "pass_through" | "passthrough" => Ok(OversizePolicy::PassThrough),
            "truncate" => Ok(OversizePolicy::Truncate),
            "reject" => Ok(OversizePolicy::Reject),
            other => Err(de::Error::unknown_variant(
                other,
                &["pass_through", "truncate", "reject"],
            )),
        }
    }
}

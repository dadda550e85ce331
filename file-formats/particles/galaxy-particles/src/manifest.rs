//! Typed model of the exported galaxy manifest
//!
//! ```text
//! manifest.json
//! ├── gas  ─┐
//! ├── star ─┼─ count, position_file, attributes[]
//! └── dm   ─┘                        └── name, file, min, max, is_log, units
//! ```

use crate::error::{Error, ManifestError};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Default file name of the manifest inside an export directory
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Particle families an export can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FamilyKind {
    /// Gas particles
    Gas,
    /// Star particles
    Star,
    /// Dark matter particles
    DarkMatter,
}

impl FamilyKind {
    /// All families in manifest order
    pub const ALL: [FamilyKind; 3] = [FamilyKind::Gas, FamilyKind::Star, FamilyKind::DarkMatter];

    /// Key of the family in the manifest
    pub fn key(self) -> &'static str {
        match self {
            FamilyKind::Gas => "gas",
            FamilyKind::Star => "star",
            FamilyKind::DarkMatter => "dm",
        }
    }

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            FamilyKind::Gas => "Gas",
            FamilyKind::Star => "Stars",
            FamilyKind::DarkMatter => "Dark matter",
        }
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FamilyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gas" => Ok(FamilyKind::Gas),
            "star" | "stars" => Ok(FamilyKind::Star),
            "dm" | "dark_matter" | "darkmatter" | "dark matter" => Ok(FamilyKind::DarkMatter),
            _ => Err(Error::UnknownFamily(s.to_string())),
        }
    }
}

/// Display range of an attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl ValueRange {
    /// Width of the range
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Whether the range collapses to a single value
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// One per-particle scalar field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeManifest {
    /// Display label
    pub name: String,
    /// Binary file relative to the export root, one float per particle
    pub file: String,
    /// Lower bound of the display range
    pub min: f32,
    /// Upper bound of the display range
    pub max: f32,
    /// Whether the range is logarithmic
    pub is_log: bool,
    /// Free text units
    pub units: String,
}

impl AttributeManifest {
    /// Display range as declared in the manifest
    pub fn range(&self) -> ValueRange {
        ValueRange {
            min: self.min,
            max: self.max,
        }
    }

    /// Check that `min <= max` and both bounds are finite.
    ///
    /// `min == max` is accepted.
    pub fn validate_range(&self) -> crate::Result<ValueRange> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(self.range())
        } else {
            Err(Error::InvalidRange {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// One particle family of the export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyManifest {
    /// Number of particles, 0 deactivates the family
    #[serde(default)]
    pub count: u32,
    /// Binary file relative to the export root, four floats per particle.
    /// Only checked when the family is loaded.
    #[serde(default)]
    pub position_file: String,
    /// Attributes in display order, the first one is shown initially
    #[serde(default)]
    pub attributes: Vec<AttributeManifest>,
}

impl FamilyManifest {
    /// Whether the family has any particles to load
    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// Attribute at `index`
    pub fn attribute(&self, index: usize) -> Option<&AttributeManifest> {
        self.attributes.get(index)
    }

    /// First attribute with the given display label
    pub fn attribute_by_name(&self, name: &str) -> Option<&AttributeManifest> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attribute shown when the family is first loaded
    pub fn default_attribute(&self) -> Option<&AttributeManifest> {
        self.attributes.first()
    }
}

fn inert_if_null<'de, D>(deserializer: D) -> Result<FamilyManifest, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FamilyManifest>::deserialize(deserializer)?.unwrap_or_default())
}

/// Root of the export: one family record per [`FamilyKind`].
///
/// Families that are absent or `null` in the document decode as inert
/// records with a count of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalaxyManifest {
    #[serde(default, deserialize_with = "inert_if_null")]
    gas: FamilyManifest,
    #[serde(default, deserialize_with = "inert_if_null")]
    star: FamilyManifest,
    #[serde(rename = "dm", default, deserialize_with = "inert_if_null")]
    dark_matter: FamilyManifest,
}

impl GalaxyManifest {
    /// Parse a manifest from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.log_summary();
        Ok(manifest)
    }

    /// Parse a manifest from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_reader(reader)?;
        manifest.log_summary();
        Ok(manifest)
    }

    /// Load a manifest from the file system
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ManifestError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serialize the manifest back to pretty printed JSON
    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the record of one family
    pub fn with_family(mut self, kind: FamilyKind, family: FamilyManifest) -> Self {
        *self.family_mut(kind) = family;
        self
    }

    /// Record of the given family
    pub fn family(&self, kind: FamilyKind) -> &FamilyManifest {
        match kind {
            FamilyKind::Gas => &self.gas,
            FamilyKind::Star => &self.star,
            FamilyKind::DarkMatter => &self.dark_matter,
        }
    }

    /// Look a family up by its manifest key or long name
    pub fn family_named(&self, name: &str) -> crate::Result<(FamilyKind, &FamilyManifest)> {
        let kind: FamilyKind = name.parse()?;
        Ok((kind, self.family(kind)))
    }

    /// All families in manifest order
    pub fn families(&self) -> impl Iterator<Item = (FamilyKind, &FamilyManifest)> {
        FamilyKind::ALL.into_iter().map(|kind| (kind, self.family(kind)))
    }

    /// Particle count of the given family
    pub fn particle_count(&self, kind: FamilyKind) -> u32 {
        self.family(kind).count
    }

    /// Particles across all families
    pub fn total_particles(&self) -> u64 {
        self.families().map(|(_, f)| u64::from(f.count)).sum()
    }

    fn family_mut(&mut self, kind: FamilyKind) -> &mut FamilyManifest {
        match kind {
            FamilyKind::Gas => &mut self.gas,
            FamilyKind::Star => &mut self.star,
            FamilyKind::DarkMatter => &mut self.dark_matter,
        }
    }

    fn log_summary(&self) {
        for (kind, family) in self.families() {
            debug!(
                "Manifest family {}: {} particles, {} attributes",
                kind,
                family.count,
                family.attributes.len()
            );
        }
    }
}

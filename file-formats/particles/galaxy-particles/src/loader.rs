//! Per-family loading of position and color textures
//!
//! Every family runs the same pipeline, independent of the others:
//!
//! ```text
//! Inactive ──▶ Loading ──▶ Ready ◀──▶ Switching
//!              │
//!              ├─ position_file ─▶ encode (stride 4) ─▶ set_position_map
//!              ├─ attributes[0] ─▶ encode (stride 1) ─▶ set_color_map
//!              └─ play
//! ```
//!
//! A failed map is logged and left unset. The family still becomes ready and
//! playback still starts.

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::manifest::{AttributeManifest, FamilyKind, GalaxyManifest};
use crate::renderer::ParticleRenderer;
use crate::source::{DataSource, DirectorySource};
use log::{debug, error, info, warn};
use particle_texture::{OversizePolicy, ParticleTexture, TextureLayout};
use std::collections::BTreeMap;
use std::path::Path;

/// Floats per particle in a position file
pub const POSITION_STRIDE: u32 = 4;

/// Floats per particle in an attribute file
pub const ATTRIBUTE_STRIDE: u32 = 1;

/// Lifecycle of one family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FamilyState {
    /// No particles or no renderer, nothing is loaded
    #[default]
    Inactive,
    /// Textures are being encoded
    Loading,
    /// Maps delivered (possibly only some) and playback started
    Ready,
    /// A different attribute is being encoded for a ready family
    Switching,
}

/// Outcome for one texture of a family
#[derive(Debug)]
pub enum MapStatus {
    /// Not attempted
    Skipped,
    /// Handed to the renderer
    Delivered {
        /// Texture width in pixels
        width: u32,
        /// Texture height in pixels
        height: u32,
    },
    /// Failed and left unset
    Failed(Error),
}

impl MapStatus {
    /// Whether the texture reached the renderer
    pub fn is_delivered(&self) -> bool {
        matches!(self, MapStatus::Delivered { .. })
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&Error> {
        match self {
            MapStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn from_result(result: Result<(u32, u32)>) -> Self {
        match result {
            Ok((width, height)) => MapStatus::Delivered { width, height },
            Err(e) => MapStatus::Failed(e),
        }
    }
}

/// What happened to one family during [`GalaxyLoader::load_all`]
#[derive(Debug)]
pub struct FamilyReport {
    /// Family the report is about
    pub kind: FamilyKind,
    /// State after loading
    pub state: FamilyState,
    /// Position map outcome
    pub position: MapStatus,
    /// Color map outcome
    pub color: MapStatus,
}

impl FamilyReport {
    fn inactive(kind: FamilyKind) -> Self {
        Self {
            kind,
            state: FamilyState::Inactive,
            position: MapStatus::Skipped,
            color: MapStatus::Skipped,
        }
    }
}

/// Result of loading every family
#[derive(Debug, Default)]
pub struct LoadReport {
    /// One report per family, in manifest order
    pub families: Vec<FamilyReport>,
}

impl LoadReport {
    /// Report of the given family
    pub fn family(&self, kind: FamilyKind) -> Option<&FamilyReport> {
        self.families.iter().find(|f| f.kind == kind)
    }

    /// Number of families that reached [`FamilyState::Ready`]
    pub fn ready_count(&self) -> usize {
        self.families
            .iter()
            .filter(|f| f.state == FamilyState::Ready)
            .count()
    }

    /// All failed maps
    pub fn failures(&self) -> impl Iterator<Item = (FamilyKind, &Error)> {
        self.families.iter().flat_map(|f| {
            [f.position.error(), f.color.error()]
                .into_iter()
                .flatten()
                .map(move |e| (f.kind, e))
        })
    }
}

/// Loads the families of a manifest into their renderers.
///
/// The manifest is owned and never changes after construction. Each family
/// with particles gets its textures only if a renderer was assigned with
/// [`GalaxyLoader::with_target`].
pub struct GalaxyLoader<S, R> {
    manifest: GalaxyManifest,
    source: S,
    config: LoaderConfig,
    targets: BTreeMap<FamilyKind, R>,
    states: BTreeMap<FamilyKind, FamilyState>,
    active: BTreeMap<FamilyKind, String>,
}

impl<R: ParticleRenderer> GalaxyLoader<DirectorySource, R> {
    /// Load the manifest named by `config` and read files below its root
    pub fn open(config: LoaderConfig) -> Result<Self> {
        let path = config.manifest_path();
        info!("Opening galaxy manifest {}", path.display());
        let manifest = GalaxyManifest::load(&path)?;
        let source = DirectorySource::new(&config.root);
        Ok(Self::new(manifest, source, config))
    }
}

impl<S: DataSource, R: ParticleRenderer> GalaxyLoader<S, R> {
    /// Create a loader without any renderer assigned
    pub fn new(manifest: GalaxyManifest, source: S, config: LoaderConfig) -> Self {
        Self {
            manifest,
            source,
            config,
            targets: BTreeMap::new(),
            states: BTreeMap::new(),
            active: BTreeMap::new(),
        }
    }

    /// Assign the renderer of a family
    pub fn with_target(mut self, kind: FamilyKind, renderer: R) -> Self {
        self.set_target(kind, renderer);
        self
    }

    /// Assign the renderer of a family, returning the previous one
    pub fn set_target(&mut self, kind: FamilyKind, renderer: R) -> Option<R> {
        self.targets.insert(kind, renderer)
    }

    /// The manifest being loaded
    pub fn manifest(&self) -> &GalaxyManifest {
        &self.manifest
    }

    /// The loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Renderer of a family
    pub fn target(&self, kind: FamilyKind) -> Option<&R> {
        self.targets.get(&kind)
    }

    /// Renderer of a family, mutably
    pub fn target_mut(&mut self, kind: FamilyKind) -> Option<&mut R> {
        self.targets.get_mut(&kind)
    }

    /// Give the renderers back
    pub fn into_targets(self) -> BTreeMap<FamilyKind, R> {
        self.targets
    }

    /// Current state of a family
    pub fn state(&self, kind: FamilyKind) -> FamilyState {
        self.states.get(&kind).copied().unwrap_or_default()
    }

    /// Name of the attribute currently shown for a family
    pub fn active_attribute(&self, kind: FamilyKind) -> Option<&str> {
        self.active.get(&kind).map(String::as_str)
    }

    /// Load every family. Failures are logged and recorded in the report,
    /// they never stop the other families.
    pub fn load_all(&mut self) -> LoadReport {
        let families: Vec<FamilyReport> = FamilyKind::ALL
            .into_iter()
            .map(|kind| self.load_family(kind))
            .collect();
        let report = LoadReport { families };

        info!(
            "Galaxy loaded: {} of {} families ready, {} maps failed",
            report.ready_count(),
            FamilyKind::ALL.len(),
            report.failures().count()
        );
        report
    }

    /// Load the position map and default attribute of one family, then
    /// start playback
    pub fn load_family(&mut self, kind: FamilyKind) -> FamilyReport {
        let family = self.manifest.family(kind);

        if !family.is_active() {
            debug!("{}: no particles, skipping", kind);
            self.states.insert(kind, FamilyState::Inactive);
            return FamilyReport::inactive(kind);
        }
        let Some(target) = self.targets.get_mut(&kind) else {
            debug!("{}: no renderer assigned, skipping", kind);
            self.states.insert(kind, FamilyState::Inactive);
            return FamilyReport::inactive(kind);
        };

        let count = self.config.effective_count(family.count);
        if count < family.count {
            warn!("{}: clamping {} particles to {}", kind, family.count, count);
        }
        let policy = self.config.oversize_for(family.count);
        self.states.insert(kind, FamilyState::Loading);

        let position = deliver_position(
            &self.source,
            policy,
            kind,
            count,
            &family.position_file,
            target,
        );
        match &position {
            Ok((width, height)) => info!("{}: position map {}x{} set", kind, width, height),
            Err(e) => error!("{}: position map not set: {}", kind, e),
        }

        let color = match family.default_attribute() {
            Some(attribute) => {
                let result = deliver_color(&self.source, policy, kind, count, attribute, target);
                match &result {
                    Ok((width, height)) => {
                        info!(
                            "{}: color map '{}' {}x{} set",
                            kind, attribute.name, width, height
                        );
                        self.active.insert(kind, attribute.name.clone());
                    }
                    Err(e) => error!("{}: color map '{}' not set: {}", kind, attribute.name, e),
                }
                MapStatus::from_result(result)
            }
            None => {
                debug!("{}: no attributes, color map left unset", kind);
                MapStatus::Skipped
            }
        };

        target.play();
        self.states.insert(kind, FamilyState::Ready);

        FamilyReport {
            kind,
            state: FamilyState::Ready,
            position: MapStatus::from_result(position),
            color,
        }
    }

    /// Encode `attribute` for a family and send it to its renderer as the new
    /// color map. Positions are left alone.
    ///
    /// A family with particles must have been loaded first, otherwise this
    /// fails with [`Error::NotLoaded`].
    pub fn switch_attribute(
        &mut self,
        kind: FamilyKind,
        attribute: &AttributeManifest,
    ) -> Result<()> {
        let declared = self.manifest.particle_count(kind);
        let count = self.config.effective_count(declared);
        let policy = self.config.oversize_for(declared);
        let Some(target) = self.targets.get_mut(&kind) else {
            return Err(Error::NoTarget(kind));
        };
        let previous = self.states.get(&kind).copied().unwrap_or_default();
        if declared > 0 && previous != FamilyState::Ready {
            return Err(Error::NotLoaded(kind));
        }

        self.states.insert(kind, FamilyState::Switching);
        let result = deliver_color(&self.source, policy, kind, count, attribute, target);
        self.states.insert(kind, previous);

        match result {
            Ok((width, height)) => {
                info!(
                    "{}: switched to '{}' ({}x{})",
                    kind, attribute.name, width, height
                );
                self.active.insert(kind, attribute.name.clone());
                Ok(())
            }
            Err(e) => {
                warn!("{}: switching to '{}' failed: {}", kind, attribute.name, e);
                Err(e)
            }
        }
    }

    /// [`switch_attribute`](Self::switch_attribute) with the family given by name
    pub fn switch_attribute_named(
        &mut self,
        family: &str,
        attribute: &AttributeManifest,
    ) -> Result<()> {
        let kind: FamilyKind = family.parse()?;
        self.switch_attribute(kind, attribute)
    }

    /// Switch to the manifest attribute at `index`
    pub fn switch_attribute_index(&mut self, kind: FamilyKind, index: usize) -> Result<()> {
        let family = self.manifest.family(kind);
        let attribute = family
            .attribute(index)
            .cloned()
            .ok_or_else(|| Error::AttributeIndex {
                family: kind,
                index,
                available: family.attributes.len(),
            })?;
        self.switch_attribute(kind, &attribute)
    }
}

fn encode_file<S: DataSource>(
    source: &S,
    policy: OversizePolicy,
    file: &str,
    count: u32,
    stride: u32,
) -> Result<ParticleTexture> {
    let path = Path::new(file);
    let encode_error = |source| Error::Encode {
        path: path.to_owned(),
        source,
    };

    // Layout first so an empty family never touches the source
    let layout = TextureLayout::for_particles(count, stride).map_err(encode_error)?;
    if file.is_empty() {
        return Err(Error::FileMissing(path.to_owned()));
    }
    let bytes = source.read(path)?;
    layout.encode_with(bytes, policy).map_err(encode_error)
}

fn deliver_position<S: DataSource, R: ParticleRenderer>(
    source: &S,
    policy: OversizePolicy,
    kind: FamilyKind,
    count: u32,
    file: &str,
    target: &mut R,
) -> Result<(u32, u32)> {
    let texture = encode_file(source, policy, file, count, POSITION_STRIDE)?;
    let size = (texture.width(), texture.height());
    target
        .set_position_map(texture)
        .map_err(|source| Error::Upload {
            family: kind,
            source,
        })?;
    Ok(size)
}

fn deliver_color<S: DataSource, R: ParticleRenderer>(
    source: &S,
    policy: OversizePolicy,
    kind: FamilyKind,
    count: u32,
    attribute: &AttributeManifest,
    target: &mut R,
) -> Result<(u32, u32)> {
    attribute.validate_range()?;
    let texture = encode_file(source, policy, &attribute.file, count, ATTRIBUTE_STRIDE)?;
    let size = (texture.width(), texture.height());
    target
        .set_color_map(texture, attribute)
        .map_err(|source| Error::Upload {
            family: kind,
            source,
        })?;
    Ok(size)
}

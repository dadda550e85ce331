//! Load an export directory into renderers that only log what they receive.
//!
//! ```text
//! cargo run --example load_galaxy -- <export-dir> [max-particles]
//! ```

use anyhow::{Context, Result};
use galaxy_particles::{
    AttributeManifest, FamilyKind, GalaxyLoader, LoaderConfig, ParticleRenderer, ParticleTexture,
    UploadError,
};
use log::info;

struct LoggingRenderer {
    family: FamilyKind,
}

impl ParticleRenderer for LoggingRenderer {
    fn set_position_map(&mut self, texture: ParticleTexture) -> Result<(), UploadError> {
        info!("[{}] position map: {}", self.family.display_name(), texture);
        Ok(())
    }

    fn set_color_map(
        &mut self,
        texture: ParticleTexture,
        attribute: &AttributeManifest,
    ) -> Result<(), UploadError> {
        info!(
            "[{}] color map '{}' [{}, {}] {}{}: {}",
            self.family.display_name(),
            attribute.name,
            attribute.min,
            attribute.max,
            attribute.units,
            if attribute.is_log { " (log)" } else { "" },
            texture
        );
        Ok(())
    }

    fn play(&mut self) {
        info!("[{}] playing", self.family.display_name());
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let Some(root) = args.get(1) else {
        anyhow::bail!("Usage: {} <export-dir> [max-particles]", args[0]);
    };

    let mut config = LoaderConfig::new(root);
    if let Some(max) = args.get(2) {
        config = config.max_particles(max.parse().context("max-particles must be a number")?);
    }

    let mut loader = GalaxyLoader::open(config)
        .with_context(|| format!("Failed to open export at {root}"))?;
    for kind in FamilyKind::ALL {
        loader.set_target(kind, LoggingRenderer { family: kind });
    }

    let report = loader.load_all();
    for (kind, error) in report.failures() {
        log::warn!("{}: {}", kind.display_name(), error);
    }

    // Cycle through the remaining attributes of every family
    for kind in FamilyKind::ALL {
        let count = loader.manifest().family(kind).attributes.len();
        for index in 1..count {
            if let Err(e) = loader.switch_attribute_index(kind, index) {
                log::warn!("{}: {}", kind.display_name(), e);
            }
        }
    }

    Ok(())
}

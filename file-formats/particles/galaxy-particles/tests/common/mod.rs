//! Common test utilities and fixtures

#![allow(dead_code)]

use galaxy_particles::{
    AttributeManifest, FamilyKind, FamilyManifest, GalaxyManifest, MANIFEST_FILE_NAME,
    ParticleRenderer, ParticleTexture, UploadError,
};
use std::path::Path;
use tempfile::TempDir;

/// What a renderer received, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Position {
        width: u32,
        height: u32,
        len: usize,
    },
    Color {
        attribute: String,
        min: f32,
        max: f32,
        width: u32,
        height: u32,
        len: usize,
    },
    Play,
}

/// Renderer that records every call and keeps the last textures
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    pub position_map: Option<ParticleTexture>,
    pub color_map: Option<ParticleTexture>,
    /// Refuse textures whose length differs from this
    pub expected_len: Option<usize>,
}

impl RecordingRenderer {
    pub fn played(&self) -> bool {
        self.calls.contains(&RenderCall::Play)
    }

    fn check(&self, texture: &ParticleTexture) -> Result<(), UploadError> {
        match self.expected_len {
            Some(expected) if expected != texture.len() => Err(UploadError::SizeMismatch {
                expected,
                actual: texture.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl ParticleRenderer for RecordingRenderer {
    fn set_position_map(&mut self, texture: ParticleTexture) -> Result<(), UploadError> {
        self.check(&texture)?;
        self.calls.push(RenderCall::Position {
            width: texture.width(),
            height: texture.height(),
            len: texture.len(),
        });
        self.position_map = Some(texture);
        Ok(())
    }

    fn set_color_map(
        &mut self,
        texture: ParticleTexture,
        attribute: &AttributeManifest,
    ) -> Result<(), UploadError> {
        self.check(&texture)?;
        self.calls.push(RenderCall::Color {
            attribute: attribute.name.clone(),
            min: attribute.min,
            max: attribute.max,
            width: texture.width(),
            height: texture.height(),
            len: texture.len(),
        });
        self.color_map = Some(texture);
        Ok(())
    }

    fn play(&mut self) {
        self.calls.push(RenderCall::Play);
    }
}

/// Little-endian float bytes
pub fn float_bytes(values: impl IntoIterator<Item = f32>) -> Vec<u8> {
    values.into_iter().flat_map(f32::to_le_bytes).collect()
}

/// Position export of `count` particles: (i, -i, 0.5 * i, 0)
pub fn position_bytes(count: u32) -> Vec<u8> {
    float_bytes((0..count).flat_map(|i| {
        let i = i as f32;
        [i, -i, 0.5 * i, 0.0]
    }))
}

/// Attribute export of `count` particles with value `i * scale`
pub fn attribute_bytes(count: u32, scale: f32) -> Vec<u8> {
    float_bytes((0..count).map(|i| i as f32 * scale))
}

pub fn attribute(name: &str, file: &str, min: f32, max: f32) -> AttributeManifest {
    AttributeManifest {
        name: name.to_string(),
        file: file.to_string(),
        min,
        max,
        is_log: false,
        units: "arb".to_string(),
    }
}

/// A family record with files named after the family key
pub fn family(kind: FamilyKind, count: u32, attributes: &[&str]) -> FamilyManifest {
    FamilyManifest {
        count,
        position_file: format!("{}/positions.bin", kind.key()),
        attributes: attributes
            .iter()
            .map(|name| {
                attribute(
                    name,
                    &format!("{}/{}.bin", kind.key(), name.to_lowercase()),
                    0.0,
                    count as f32,
                )
            })
            .collect(),
    }
}

/// Write `contents` below `dir`, creating parent directories
pub fn create_test_file(dir: &Path, name: &str, contents: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, contents).expect("Failed to write fixture file");
}

/// Write the manifest and every file it references into a temp directory
pub fn create_export(manifest: &GalaxyManifest) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let json = manifest.to_json_pretty().expect("Failed to serialize manifest");
    create_test_file(dir.path(), MANIFEST_FILE_NAME, json.as_bytes());

    for (_, family) in manifest.families() {
        if family.count == 0 {
            continue;
        }
        create_test_file(dir.path(), &family.position_file, &position_bytes(family.count));
        for attribute in &family.attributes {
            create_test_file(
                dir.path(),
                &attribute.file,
                &attribute_bytes(family.count, 1.0),
            );
        }
    }
    dir
}

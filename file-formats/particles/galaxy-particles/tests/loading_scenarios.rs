//! End to end loading of exports written to disk

mod common;

use common::*;
use galaxy_particles::{
    DataSource, DirectorySource, EncodeError, Error, FamilyKind, FamilyState, GalaxyLoader,
    GalaxyManifest, LoaderConfig, OversizePolicy, PixelFormat,
};
use pretty_assertions::assert_eq;
use std::io;
use std::path::{Path, PathBuf};

/// Directory source whose reads of one file fail with an I/O error
struct FlakySource {
    inner: DirectorySource,
    broken: PathBuf,
}

impl DataSource for FlakySource {
    fn read(&self, relative: &Path) -> galaxy_particles::Result<Vec<u8>> {
        if relative == self.broken.as_path() {
            return Err(Error::Encode {
                path: relative.to_owned(),
                source: EncodeError::UpstreamIo(io::Error::other("device error")),
            });
        }
        self.inner.read(relative)
    }
}

fn full_manifest() -> GalaxyManifest {
    GalaxyManifest::default()
        .with_family(FamilyKind::Gas, family(FamilyKind::Gas, 1000, &["Temperature", "Density"]))
        .with_family(FamilyKind::Star, family(FamilyKind::Star, 50, &["Age"]))
        .with_family(FamilyKind::DarkMatter, family(FamilyKind::DarkMatter, 7, &[]))
}

fn open_loader(dir: &tempfile::TempDir) -> GalaxyLoader<DirectorySource, RecordingRenderer> {
    GalaxyLoader::open(LoaderConfig::new(dir.path()))
        .expect("Failed to open export")
        .with_target(FamilyKind::Gas, RecordingRenderer::default())
        .with_target(FamilyKind::Star, RecordingRenderer::default())
        .with_target(FamilyKind::DarkMatter, RecordingRenderer::default())
}

#[test_log::test]
fn test_load_all_families() {
    let dir = create_export(&full_manifest());
    let mut loader = open_loader(&dir);

    let report = loader.load_all();
    assert_eq!(report.ready_count(), 3);
    assert_eq!(report.failures().count(), 0);

    let gas = loader.target(FamilyKind::Gas).unwrap();
    assert_eq!(
        gas.calls,
        vec![
            RenderCall::Position {
                width: 32,
                height: 32,
                len: 16_384
            },
            RenderCall::Color {
                attribute: "Temperature".to_string(),
                min: 0.0,
                max: 1000.0,
                width: 32,
                height: 32,
                len: 4096
            },
            RenderCall::Play,
        ]
    );

    // Dark matter has no attributes: position only, then play
    let dm = loader.target(FamilyKind::DarkMatter).unwrap();
    assert_eq!(dm.calls.len(), 2);
    assert!(dm.color_map.is_none());
    assert!(dm.played());
}

#[test_log::test]
fn test_position_padding_on_disk() {
    let dir = create_export(&full_manifest());
    let mut loader = open_loader(&dir);
    loader.load_all();

    let gas = loader.target(FamilyKind::Gas).unwrap();
    let positions = gas.position_map.as_ref().unwrap();
    assert_eq!(positions.format(), PixelFormat::Rgba32Float);
    assert_eq!(&positions.data()[..16_000], &position_bytes(1000)[..]);
    assert!(positions.data()[16_000..].iter().all(|&b| b == 0));
    assert_eq!(positions.texel(10), Some(vec![10.0, -10.0, 5.0, 0.0]));
}

#[test_log::test]
fn test_missing_attribute_file_keeps_positions() {
    let dir = create_export(&full_manifest());
    std::fs::remove_file(dir.path().join("star/age.bin")).unwrap();
    let mut loader = open_loader(&dir);

    let report = loader.load_all();
    let star = report.family(FamilyKind::Star).unwrap();
    assert!(star.position.is_delivered());
    assert!(matches!(star.color.error(), Some(Error::FileMissing(_))));
    assert_eq!(star.state, FamilyState::Ready);

    let renderer = loader.target(FamilyKind::Star).unwrap();
    assert!(renderer.position_map.is_some());
    assert!(renderer.color_map.is_none());
    assert!(renderer.played());

    // Other families are unaffected
    assert_eq!(report.ready_count(), 3);
}

#[test_log::test]
fn test_missing_position_file_keeps_color() {
    let dir = create_export(&full_manifest());
    std::fs::remove_file(dir.path().join("gas/positions.bin")).unwrap();
    let mut loader = open_loader(&dir);

    let report = loader.load_all();
    let gas = report.family(FamilyKind::Gas).unwrap();
    assert!(matches!(gas.position.error(), Some(Error::FileMissing(_))));
    assert!(gas.color.is_delivered());
    assert!(loader.target(FamilyKind::Gas).unwrap().played());
}

#[test_log::test]
fn test_read_error_keeps_family_playing() {
    let manifest = full_manifest();
    let dir = create_export(&manifest);
    let source = FlakySource {
        inner: DirectorySource::new(dir.path()),
        broken: PathBuf::from("gas/positions.bin"),
    };
    let mut loader = GalaxyLoader::new(manifest, source, LoaderConfig::new(dir.path()))
        .with_target(FamilyKind::Gas, RecordingRenderer::default());

    let report = loader.load_all();
    let gas = report.family(FamilyKind::Gas).unwrap();
    assert!(matches!(
        gas.position.error().and_then(Error::encode_error),
        Some(EncodeError::UpstreamIo(_))
    ));
    assert!(gas.color.is_delivered());
    assert_eq!(gas.state, FamilyState::Ready);

    let renderer = loader.target(FamilyKind::Gas).unwrap();
    assert!(renderer.position_map.is_none());
    assert!(renderer.played());
}

#[test_log::test]
fn test_empty_family_is_never_touched() {
    let manifest = full_manifest().with_family(
        FamilyKind::Star,
        family(FamilyKind::Star, 0, &["Age"]),
    );
    // No star files exist at all
    let dir = create_export(&manifest);
    assert!(!dir.path().join("star").exists());
    let mut loader = open_loader(&dir);

    let report = loader.load_all();
    let star = report.family(FamilyKind::Star).unwrap();
    assert_eq!(star.state, FamilyState::Inactive);
    assert!(star.position.error().is_none());
    assert!(star.color.error().is_none());
    assert!(loader.target(FamilyKind::Star).unwrap().calls.is_empty());
    assert_eq!(report.ready_count(), 2);
}

#[test_log::test]
fn test_family_without_target_is_inactive() {
    let dir = create_export(&full_manifest());
    let mut loader = GalaxyLoader::open(LoaderConfig::new(dir.path()))
        .unwrap()
        .with_target(FamilyKind::Gas, RecordingRenderer::default());

    let report = loader.load_all();
    assert_eq!(report.ready_count(), 1);
    assert_eq!(loader.state(FamilyKind::Star), FamilyState::Inactive);
    assert!(loader.target(FamilyKind::Star).is_none());
}

#[test_log::test]
fn test_switch_to_constant_attribute() {
    let dir = create_export(&full_manifest());
    let mut loader = open_loader(&dir);
    loader.load_all();

    let constant = attribute("Metallicity", "gas/density.bin", 0.02, 0.02);
    loader
        .switch_attribute(FamilyKind::Gas, &constant)
        .expect("Constant range must encode");

    let gas = loader.target(FamilyKind::Gas).unwrap();
    assert_eq!(
        gas.calls.last(),
        Some(&RenderCall::Color {
            attribute: "Metallicity".to_string(),
            min: 0.02,
            max: 0.02,
            width: 32,
            height: 32,
            len: 4096
        })
    );
    // Positions were not reloaded and playback was not restarted
    assert_eq!(gas.calls.len(), 4);
    assert_eq!(loader.state(FamilyKind::Gas), FamilyState::Ready);
    assert_eq!(loader.active_attribute(FamilyKind::Gas), Some("Metallicity"));
}

#[test_log::test]
fn test_switch_by_family_name() {
    let dir = create_export(&full_manifest());
    let mut loader = open_loader(&dir);
    loader.load_all();

    let density = loader
        .manifest()
        .family(FamilyKind::Gas)
        .attribute_by_name("Density")
        .cloned()
        .unwrap();
    loader.switch_attribute_named("gas", &density).unwrap();
    assert_eq!(loader.active_attribute(FamilyKind::Gas), Some("Density"));

    let err = loader.switch_attribute_named("quasars", &density).unwrap_err();
    assert!(matches!(err, Error::UnknownFamily(name) if name == "quasars"));
}

#[test_log::test]
fn test_switch_on_empty_family_is_empty_input() {
    let manifest = full_manifest().with_family(
        FamilyKind::Star,
        family(FamilyKind::Star, 0, &["Age"]),
    );
    let dir = create_export(&manifest);
    let mut loader = open_loader(&dir);
    loader.load_all();

    let err = loader
        .switch_attribute_index(FamilyKind::Star, 0)
        .unwrap_err();
    assert!(matches!(err.encode_error(), Some(EncodeError::EmptyInput(0))));
    assert!(loader.target(FamilyKind::Star).unwrap().calls.is_empty());
}

#[test_log::test]
fn test_renderer_size_mismatch_is_logged() {
    let dir = create_export(&full_manifest());
    let renderer = RecordingRenderer {
        expected_len: Some(16_384),
        ..RecordingRenderer::default()
    };
    let mut loader = GalaxyLoader::open(LoaderConfig::new(dir.path()))
        .unwrap()
        .with_target(FamilyKind::Gas, renderer);

    let report = loader.load_all();
    let gas = report.family(FamilyKind::Gas).unwrap();
    assert!(gas.position.is_delivered());
    assert!(matches!(
        gas.color.error(),
        Some(Error::Upload {
            family: FamilyKind::Gas,
            ..
        })
    ));
    assert!(loader.target(FamilyKind::Gas).unwrap().color_map.is_none());
}

#[test_log::test]
fn test_oversized_file_policies() {
    let manifest = GalaxyManifest::default()
        .with_family(FamilyKind::Gas, family(FamilyKind::Gas, 4, &["Mass"]));
    let dir = create_export(&manifest);
    // Twice the data the 2x2 texture can hold
    create_test_file(dir.path(), "gas/mass.bin", &attribute_bytes(8, 1.0));

    let mut passthrough = open_loader(&dir);
    passthrough.load_all();
    let color = passthrough.target(FamilyKind::Gas).unwrap().color_map.as_ref().unwrap();
    assert_eq!(color.len(), 32);

    let config = LoaderConfig::new(dir.path()).oversize(OversizePolicy::Truncate);
    let mut truncating = GalaxyLoader::open(config)
        .unwrap()
        .with_target(FamilyKind::Gas, RecordingRenderer::default());
    truncating.load_all();
    let color = truncating.target(FamilyKind::Gas).unwrap().color_map.as_ref().unwrap();
    assert_eq!(color.len(), 16);

    let config = LoaderConfig::new(dir.path()).oversize(OversizePolicy::Reject);
    let mut rejecting = GalaxyLoader::open(config)
        .unwrap()
        .with_target(FamilyKind::Gas, RecordingRenderer::default());
    let report = rejecting.load_all();
    let gas = report.family(FamilyKind::Gas).unwrap();
    assert!(matches!(
        gas.color.error().and_then(Error::encode_error),
        Some(EncodeError::Oversized {
            expected: 16,
            actual: 32
        })
    ));
}

#[test]
fn test_missing_manifest_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result: galaxy_particles::Result<GalaxyLoader<_, RecordingRenderer>> =
        GalaxyLoader::open(LoaderConfig::new(dir.path()));
    assert!(matches!(result, Err(Error::Manifest(_))));
}

#[test]
fn test_malformed_manifest_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    create_test_file(dir.path(), "manifest.json", br#"{"gas": {"count": "many"}}"#);
    let result: galaxy_particles::Result<GalaxyLoader<_, RecordingRenderer>> =
        GalaxyLoader::open(LoaderConfig::new(dir.path()));
    assert!(matches!(
        result,
        Err(Error::Manifest(galaxy_particles::ManifestError::Parse(_)))
    ));
}

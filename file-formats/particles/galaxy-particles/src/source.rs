//! Access to the binary files of an export

use crate::error::{Error, Result};
use log::trace;
use particle_texture::EncodeError;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Where the raw bytes of the binary files come from
pub trait DataSource {
    /// Read the whole file at `relative`, a path taken from the manifest.
    ///
    /// A file that does not exist is [`Error::FileMissing`], any other read
    /// failure is reported as [`EncodeError::UpstreamIo`].
    fn read(&self, relative: &Path) -> Result<Vec<u8>>;
}

/// Files on disk below a root directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Resolve files relative to `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_owned(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a manifest relative file
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

impl DataSource for DirectorySource {
    fn read(&self, relative: &Path) -> Result<Vec<u8>> {
        let path = self.resolve(relative);
        if !path.is_file() {
            return Err(Error::FileMissing(path));
        }

        trace!("Reading {}", path.display());
        std::fs::read(&path).map_err(|e| upstream_error(path, e))
    }
}

/// Files held in memory, keyed by their manifest path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert<P: AsRef<Path>>(&mut self, relative: P, bytes: impl Into<Vec<u8>>) {
        self.files.insert(relative.as_ref().to_owned(), bytes.into());
    }

    /// Add a file, builder style
    pub fn with_file<P: AsRef<Path>>(mut self, relative: P, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(relative, bytes);
        self
    }
}

impl DataSource for MemorySource {
    fn read(&self, relative: &Path) -> Result<Vec<u8>> {
        self.files
            .get(relative)
            .cloned()
            .ok_or_else(|| Error::FileMissing(relative.to_owned()))
    }
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn read(&self, relative: &Path) -> Result<Vec<u8>> {
        (**self).read(relative)
    }
}

fn upstream_error(path: PathBuf, error: io::Error) -> Error {
    Error::Encode {
        path,
        source: EncodeError::UpstreamIo(error),
    }
}

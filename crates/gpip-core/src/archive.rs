//! Source archive naming and extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tar::Archive;
use zip::ZipArchive;

use crate::error::InstallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    TarBz2,
}

impl ArchiveKind {
    /// Suffix matching is case-sensitive, like the index's own filenames.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        [ArchiveKind::Zip, ArchiveKind::TarGz, ArchiveKind::TarBz2]
            .into_iter()
            .find(|kind| filename.ends_with(kind.suffix()))
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ArchiveKind::Zip => ".zip",
            ArchiveKind::TarGz => ".tar.gz",
            ArchiveKind::TarBz2 => ".tar.bz2",
        }
    }
}

/// A source archive to fetch: where it lives, what it is called, how to open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDescriptor {
    pub url: String,
    pub filename: String,
    pub kind: ArchiveKind,
}

impl DownloadDescriptor {
    /// Derives the filename from the URL's last path segment and the archive
    /// kind from its suffix.
    ///
    /// # Errors
    /// Returns [`InstallError::UnknownFileType`] for unsupported suffixes.
    pub fn from_url(url: &str) -> Result<Self, InstallError> {
        let filename = filename_from_url(url).to_string();
        let kind = ArchiveKind::from_filename(&filename)
            .ok_or_else(|| InstallError::UnknownFileType(filename.clone()))?;
        Ok(Self {
            url: url.to_string(),
            filename,
            kind,
        })
    }

    /// Top-level directory the archive is expected to unpack into.
    #[must_use]
    pub fn source_dir_name(&self) -> &str {
        self.filename
            .strip_suffix(self.kind.suffix())
            .unwrap_or(&self.filename)
    }
}

fn filename_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Unpacks `archive` into `dest`.
///
/// # Errors
/// Returns an error when the archive cannot be opened or decoded, or when an
/// entry cannot be written.
pub fn extract(kind: ArchiveKind, archive: &Path, dest: &Path) -> Result<()> {
    let file =
        File::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;
    match kind {
        ArchiveKind::Zip => {
            let mut zip = ZipArchive::new(BufReader::new(file))
                .with_context(|| format!("{} is not a zip archive", archive.display()))?;
            zip.extract(dest)
                .with_context(|| format!("failed to unzip {}", archive.display()))?;
        }
        ArchiveKind::TarGz => {
            Archive::new(GzDecoder::new(BufReader::new(file)))
                .unpack(dest)
                .with_context(|| format!("failed to unpack {}", archive.display()))?;
        }
        ArchiveKind::TarBz2 => {
            Archive::new(BzDecoder::new(BufReader::new(file)))
                .unpack(dest)
                .with_context(|| format!("failed to unpack {}", archive.display()))?;
        }
    }
    Ok(())
}

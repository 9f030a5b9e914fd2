//! Archive Reader Module
//! Extracts a single named member from a ZIP container.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),
    #[error("Invalid ZIP archive: {0}")]
    InvalidArchive(String),
    #[error("Member '{0}' not found in archive")]
    MemberNotFound(String),
    #[error("I/O error while reading archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Bytes of one archive member together with the archive's member listing.
#[derive(Debug, Clone)]
pub struct ArchiveMember {
    pub name: String,
    pub listing: Vec<String>,
    pub bytes: Vec<u8>,
}

/// Reads members out of a ZIP archive on disk.
pub struct ArchiveReader {
    path: PathBuf,
}

impl ArchiveReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the archive, list its members and extract `member` fully into memory.
    ///
    /// The archive handle lives only for the duration of this call.
    pub fn read_member(&self, member: &str) -> Result<ArchiveMember, ArchiveError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ArchiveError::ArchiveNotFound(self.path.clone()),
            _ => ArchiveError::Io(e),
        })?;

        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(Self::map_open_error)?;

        let listing: Vec<String> = archive.file_names().map(str::to_string).collect();
        log::info!(
            "Opened {} ({} members): {:?}",
            self.path.display(),
            listing.len(),
            listing
        );

        let mut entry = archive.by_name(member).map_err(|e| match e {
            ZipError::FileNotFound => ArchiveError::MemberNotFound(member.to_string()),
            ZipError::Io(io) => ArchiveError::Io(io),
            other => ArchiveError::InvalidArchive(other.to_string()),
        })?;

        // Declared sizes come from the archive itself; let the buffer grow as read
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(|e| match e.kind() {
            std::io::ErrorKind::Other | std::io::ErrorKind::InvalidData => {
                ArchiveError::InvalidArchive(format!("corrupt member '{}': {}", member, e))
            }
            _ => ArchiveError::Io(e),
        })?;
        log::debug!("Extracted '{}' ({} bytes)", member, bytes.len());

        Ok(ArchiveMember {
            name: member.to_string(),
            listing,
            bytes,
        })
    }

    fn map_open_error(err: ZipError) -> ArchiveError {
        match err {
            ZipError::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                ArchiveError::InvalidArchive(io.to_string())
            }
            ZipError::Io(io) => ArchiveError::Io(io),
            other => ArchiveError::InvalidArchive(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{write_zip, WINE_SAMPLE};

    #[test]
    fn extracts_named_member_and_lists_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(
            dir.path(),
            "wine.zip",
            &[("wine.names", &b"notes"[..]), ("wine.data", WINE_SAMPLE.as_bytes())],
        );

        let member = ArchiveReader::new(&path).read_member("wine.data").unwrap();

        assert_eq!(member.name, "wine.data");
        assert_eq!(member.listing.len(), 2);
        assert!(member.listing.contains(&"wine.names".to_string()));
        assert_eq!(member.bytes, WINE_SAMPLE.as_bytes());
    }

    #[test]
    fn missing_path_is_archive_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArchiveReader::new(dir.path().join("absent.zip"))
            .read_member("wine.data")
            .unwrap_err();
        assert!(matches!(err, ArchiveError::ArchiveNotFound(_)));
    }

    #[test]
    fn plain_text_file_is_invalid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wine.zip");
        std::fs::write(&path, WINE_SAMPLE).unwrap();

        let err = ArchiveReader::new(&path).read_member("wine.data").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidArchive(_)), "{err:?}");
    }

    #[test]
    fn corrupt_member_data_is_invalid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(dir.path(), "wine.zip", &[("wine.data", WINE_SAMPLE.as_bytes())]);

        // Stored data starts after the 30-byte local header and the file name
        let mut raw = std::fs::read(&path).unwrap();
        let offset = 30 + "wine.data".len();
        raw[offset] ^= 0xFF;
        std::fs::write(&path, raw).unwrap();

        let err = ArchiveReader::new(&path).read_member("wine.data").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidArchive(_)), "{err:?}");
    }

    #[test]
    fn declared_size_does_not_drive_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(dir.path(), "wine.zip", &[("wine.data", WINE_SAMPLE.as_bytes())]);

        // Inflate the uncompressed size recorded in the central directory header
        let mut raw = std::fs::read(&path).unwrap();
        let header = raw
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        raw[header + 24..header + 28].copy_from_slice(&0x7FFF_0000u32.to_le_bytes());
        std::fs::write(&path, raw).unwrap();

        let member = ArchiveReader::new(&path).read_member("wine.data").unwrap();
        assert_eq!(member.bytes, WINE_SAMPLE.as_bytes());
        assert!(member.bytes.capacity() < 1 << 20);
    }

    #[test]
    fn absent_member_is_member_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(dir.path(), "wine.zip", &[("other.csv", &b"1,2,3"[..])]);

        let err = ArchiveReader::new(&path).read_member("wine.data").unwrap_err();
        match err {
            ArchiveError::MemberNotFound(name) => assert_eq!(name, "wine.data"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

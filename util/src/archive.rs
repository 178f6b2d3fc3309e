//! Struct archiving functionality
//!
//! Records are written as rows of a CSV file inside the session's archive
//! directory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not create the archive file: {0}")]
    CreateError(std::io::Error),

    #[error("Could not write the record: {0}")]
    WriteError(csv::Error),

    #[error("Could not flush the archive: {0}")]
    FlushError(std::io::Error),

    #[error("The archiver has no open file")]
    NotInitialised
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root. Missing parent directories are created.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let file_path = session.arch_root.join(path);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(ArchiveError::CreateError)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_path)
            .map_err(ArchiveError::CreateError)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record).map_err(ArchiveError::WriteError)?;
                w.flush().map_err(ArchiveError::FlushError)
            },
            None => Err(ArchiveError::NotInitialised)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        index: usize,
        speed_ms: f64,
    }

    #[test]
    fn test_archive_rows() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session {
            session_root: dir.path().to_path_buf(),
            arch_root: dir.path().join("arch"),
            log_file_path: dir.path().join("test.log"),
        };

        let mut arch = Archiver::from_path(&session, "plan/rows.csv").unwrap();
        arch.serialise(Row { index: 3, speed_ms: 1.5 }).unwrap();
        arch.serialise(Row { index: 4, speed_ms: 0.0 }).unwrap();

        let contents = std::fs::read_to_string(
            session.arch_root.join("plan/rows.csv")
        ).unwrap();
        assert_eq!(contents, "index,speed_ms\n3,1.5\n4,0.0\n");
    }

    #[test]
    fn test_default_archiver_not_initialised() {
        let mut arch = Archiver::default();
        match arch.serialise(Row { index: 0, speed_ms: 0.0 }) {
            Err(ArchiveError::NotInitialised) => (),
            _ => panic!("Expected NotInitialised")
        }
    }
}

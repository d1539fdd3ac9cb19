//! Ordered source of comma-delimited records with a validated header line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::RecordError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    fn parse(line: &str) -> Self {
        Self {
            fields: line.split(',').map(|field| field.trim().to_string()).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// The lines of a delimited file after its header.
///
/// The header is the literal first line. Every later non-empty line is a
/// record, whatever it starts with.
#[derive(Debug)]
pub struct RecordSource {
    path: PathBuf,
    header: String,
    lines: Vec<String>,
}

impl RecordSource {
    pub fn open(path: impl AsRef<Path>, expected_header: &str) -> Result<Self, RecordError> {
        let path = path.as_ref();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(RecordError::InvalidPath);
        }

        let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RecordError::ResourceNotFound {
                path: path.to_path_buf(),
            },
            _ => RecordError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Self::from_text(path, &contents, expected_header)
    }

    /// Builds a source from already-loaded text; `path` is only used for
    /// reporting.
    pub fn from_text(
        path: impl Into<PathBuf>,
        contents: &str,
        expected_header: &str,
    ) -> Result<Self, RecordError> {
        let path = path.into();
        let mut lines = contents.lines().map(str::trim);

        let found = lines.next().unwrap_or_default();
        if found != expected_header.trim() {
            return Err(RecordError::FormatMismatch {
                expected: expected_header.trim().to_string(),
                found: found.to_string(),
            });
        }

        let header = found.to_string();
        let lines: Vec<String> = lines
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        debug!(path = %path.display(), records = lines.len(), "validated record header");

        Ok(Self {
            path,
            header,
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Records in file order, split on demand.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.lines.iter().map(|line| Record::parse(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_records_after_the_header() {
        let source = RecordSource::from_text(
            "people.csv",
            "id,name\n1, Inigo\n\n2,Montoya\n",
            "id,name",
        )
        .unwrap();

        assert_eq!(source.header(), "id,name");
        let records: Vec<Record> = source.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field(1), Some("Inigo"));
        assert_eq!(records[1].fields(), ["2", "Montoya"]);
        assert_eq!(records[1].field(2), None);
    }

    #[test]
    fn records_starting_with_hash_are_kept() {
        let source = RecordSource::from_text("tags.csv", "value\n#rust\nplain\n", "value").unwrap();
        let values: Vec<String> = source
            .records()
            .filter_map(|record| record.field(0).map(ToOwned::to_owned))
            .collect();

        assert_eq!(values, ["#rust", "plain"]);
    }

    #[test]
    fn header_must_be_the_first_line() {
        let err = RecordSource::from_text("x.csv", "\n# junk\nvalue\n1\n", "value").unwrap_err();
        assert!(matches!(err, RecordError::FormatMismatch { found, .. } if found.is_empty()));

        let err = RecordSource::from_text("x.csv", "# junk\nvalue\n1\n", "value").unwrap_err();
        assert!(matches!(err, RecordError::FormatMismatch { found, .. } if found == "# junk"));
    }

    #[test]
    fn header_mismatch_is_a_format_error() {
        let err = RecordSource::from_text("people.csv", "name,id\n1,a\n", "id,name").unwrap_err();
        match err {
            RecordError::FormatMismatch { expected, found } => {
                assert_eq!(expected, "id,name");
                assert_eq!(found, "name,id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_text_reports_an_empty_header() {
        let err = RecordSource::from_text("empty.csv", "", "value").unwrap_err();
        assert!(matches!(err, RecordError::FormatMismatch { found, .. } if found.is_empty()));
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let mut path = std::env::temp_dir();
        path.push("cyclecell_tests");
        path.push("does_not_exist.csv");

        let err = RecordSource::open(&path, "value").unwrap_err();
        assert!(matches!(err, RecordError::ResourceNotFound { path: p } if p == path));
    }

    #[test]
    fn blank_path_is_rejected() {
        assert!(matches!(
            RecordSource::open("  ", "value"),
            Err(RecordError::InvalidPath)
        ));
    }

    #[test]
    fn reads_files_from_disk() {
        let mut dir = std::env::temp_dir();
        dir.push("cyclecell_tests");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("reads_files_from_disk.csv");
        fs::write(&path, "value\nalpha\nbeta\n").unwrap();

        let source = RecordSource::open(&path, "value").unwrap();
        let values: Vec<String> = source
            .records()
            .filter_map(|record| record.field(0).map(ToOwned::to_owned))
            .collect();

        assert_eq!(source.path(), path.as_path());
        assert_eq!(values, ["alpha", "beta"]);
    }
}

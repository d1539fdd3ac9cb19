use std::fmt;
use std::path::PathBuf;

/// Members of the collection surface that a circular cell deliberately
/// does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Remove,
    CopyTo,
    Count,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Remove => f.write_str("remove"),
            Capability::CopyTo => f.write_str("copy_to"),
            Capability::Count => f.write_str("count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
    #[error("value already exists in this cycle: {value}")]
    DuplicateValue { value: String },
    #[error("{0} is not supported by a circular cell")]
    NotSupported(Capability),
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("file name cannot be empty")]
    InvalidPath,
    #[error("file not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },
    #[error("header mismatch: expected `{expected}`, found `{found}`")]
    FormatMismatch { expected: String, found: String },
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

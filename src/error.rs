use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum UisError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("{url} returned status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("dataset catalog is not a dataset,url table: {0}")]
    Catalog(String),

    #[error("archive is not a readable ZIP file: {0}")]
    Archive(String),

    #[error("archive member name cannot be mapped to a table: {0}")]
    MemberName(String),

    #[error("failed to parse table {table}: {message}")]
    Csv { table: String, message: String },

    #[error("table operation failed: {0}")]
    Frame(String),

    #[error("archive member {member} is not valid UTF-8")]
    Decode { member: String },

    #[error("required column {column} is missing")]
    #[diagnostic(help("BDDS tables carry YEAR, COUNTRY_ID or REGION_ID, INDICATOR_ID columns"))]
    MissingColumn { column: String },

    #[error("column {column} is a join key and cannot hold metadata")]
    ColumnConflict { column: String },

    #[error("table not found in archive: {0}")]
    TableNotFound(String),

    #[error("archive has no README member")]
    ReadmeNotFound,

    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("{0} requires a loaded archive")]
    #[diagnostic(help("call Session::load before accessing archive content"))]
    NotReady(&'static str),

    #[error("missing config file uisdata.json in current directory")]
    MissingConfig,

    #[error("failed to parse JSON config: {0}")]
    Config(String),

    #[error("filesystem error: {0}")]
    Io(String),
}

/// Coarse classification of [`UisError`] used for exit codes and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Format,
    Decode,
    NotReady,
    Io,
}

impl UisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UisError::Http(_) | UisError::HttpStatus { .. } | UisError::Catalog(_) => {
                ErrorKind::Network
            }
            UisError::UnknownDataset(_)
            | UisError::TableNotFound(_)
            | UisError::ReadmeNotFound
            | UisError::MissingConfig => ErrorKind::NotFound,
            UisError::Archive(_)
            | UisError::MemberName(_)
            | UisError::Csv { .. }
            | UisError::Frame(_)
            | UisError::MissingColumn { .. }
            | UisError::ColumnConflict { .. }
            | UisError::InvalidPattern(_)
            | UisError::Config(_) => ErrorKind::Format,
            UisError::Decode { .. } => ErrorKind::Decode,
            UisError::NotReady(_) => ErrorKind::NotReady,
            UisError::Io(_) => ErrorKind::Io,
        }
    }
}

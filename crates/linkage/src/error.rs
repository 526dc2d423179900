use std::fmt;

#[derive(Debug)]
pub enum LinkError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty path, duplicate column mapping, etc.).
    ConfigValidation(String),
    /// A mapped column is absent from a source's header row.
    MissingColumn { source: String, column: String },
    /// A header row names the same column more than once.
    DuplicateColumn { source: String, column: String },
    /// A record lacks one of the required fields.
    MissingField { source: String, row: usize, field: String },
    /// The broker collection has no records, so no query can be linked.
    EmptyBrokerCollection,
    /// A link points outside the broker collection.
    InvalidRowIndex { index: usize, len: usize },
    /// CSV decode / encode error.
    Csv(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl LinkError {
    /// Stable snake_case identifier for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "config_parse",
            Self::ConfigValidation(_) => "config_validation",
            Self::MissingColumn { .. } => "missing_column",
            Self::DuplicateColumn { .. } => "duplicate_column",
            Self::MissingField { .. } => "missing_field",
            Self::EmptyBrokerCollection => "empty_broker_collection",
            Self::InvalidRowIndex { .. } => "invalid_row_index",
            Self::Csv(_) => "csv",
            Self::Io(_) => "io",
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::DuplicateColumn { source, column } => {
                write!(f, "{source}: duplicate column '{column}'")
            }
            Self::MissingField { source, row, field } => {
                write!(f, "{source}, row {row}: missing field '{field}'")
            }
            Self::EmptyBrokerCollection => {
                write!(f, "broker collection is empty; no record can be linked")
            }
            Self::InvalidRowIndex { index, len } => {
                write!(f, "row index {index} out of bounds for collection of {len}")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<csv::Error> for LinkError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use super::format::DocumentFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaError {
    /// The document is malformed: missing or mistyped fields, unknown keys,
    /// invalid UTF-8, or blank required text.
    Parse { origin: String, reason: String },
    Read { path: PathBuf, reason: String },
    Write { path: PathBuf, reason: String },
    UnknownFormat { origin: String },
    Serialize { format: DocumentFormat, reason: String },
}

impl PersonaError {
    pub(crate) fn parse(origin: &str, reason: impl Display) -> Self {
        Self::Parse {
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unknown_format(path: &Path) -> Self {
        Self::UnknownFormat {
            origin: path.display().to_string(),
        }
    }

    pub(crate) fn invalid_field(origin: &str, key_path: &str, reason: &str) -> Self {
        Self::parse(origin, format!("{key_path}: {reason}"))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

impl Display for PersonaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { origin, reason } => {
                write!(f, "Failed to parse persona {origin}: {reason}")
            }
            Self::Read { path, reason } => write!(
                f,
                "Failed to load persona {}: unable to read file: {reason}",
                path.display()
            ),
            Self::Write { path, reason } => write!(
                f,
                "Failed to save persona {}: unable to write file: {reason}",
                path.display()
            ),
            Self::UnknownFormat { origin } => write!(
                f,
                "Unknown document format for {origin}: expected .yaml, .yml, .toml or .json"
            ),
            Self::Serialize { format, reason } => {
                write!(f, "Failed to serialize persona as {format}: {reason}")
            }
        }
    }
}

impl Error for PersonaError {}

pub type PersonaResult<T> = std::result::Result<T, PersonaError>;

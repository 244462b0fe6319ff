//! Errors raised while turning documents into records

use std::path::{Path, PathBuf};

/// Errors that can occur while parsing or loading content documents.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("malformed document{}: {reason}", location(.path))]
    MalformedDocument {
        path: Option<PathBuf>,
        reason: String,
    },

    #[error("invalid date `{value}` in field `{field}`{}", location(.path))]
    InvalidDateFormat {
        path: Option<PathBuf>,
        field: String,
        value: String,
    },

    #[error("duplicate slug `{slug}`: {} and {}", .first.display(), .second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// Create a malformed-document error without a path.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: None,
            reason: reason.into(),
        }
    }

    /// Attach the offending document's path, keeping one that is already set.
    pub fn at(self, doc: &Path) -> Self {
        match self {
            Self::MalformedDocument { path: None, reason } => Self::MalformedDocument {
                path: Some(doc.to_path_buf()),
                reason,
            },
            Self::InvalidDateFormat {
                path: None,
                field,
                value,
            } => Self::InvalidDateFormat {
                path: Some(doc.to_path_buf()),
                field,
                value,
            },
            other => other,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedDocument { .. } => "MalformedDocument",
            Self::InvalidDateFormat { .. } => "InvalidDateFormat",
            Self::DuplicateSlug { .. } => "DuplicateSlug",
            Self::Io { .. } => "Io",
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" ({})", p.display()),
        None => String::new(),
    }
}

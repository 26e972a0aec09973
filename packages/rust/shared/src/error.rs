//! Error types for interlink.
//!
//! Library crates use [`InterlinkError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all interlink operations.
#[derive(Debug, thiserror::Error)]
pub enum InterlinkError {
    /// Transport failure or non-success HTTP status.
    #[error("fetch error: {url}: {message}")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Malformed XML or HTML.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The top-level index produced no usable URLs.
    #[error("no URLs found in the index structure at {url}")]
    EmptyIndex { url: String },

    /// The article body has no paragraphs to anchor links on.
    #[error("no paragraphs found in the article body")]
    NoParagraphs,

    /// Failure while fetching or extracting the source article.
    #[error("article error ({url}): {source}")]
    Article {
        url: String,
        #[source]
        source: Box<InterlinkError>,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid input (bad URL, out-of-range option, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InterlinkError>;

impl InterlinkError {
    /// Create a fetch error without an HTTP status (connect, timeout, body read).
    pub fn fetch(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            status: None,
            message: msg.into(),
        }
    }

    /// Create a fetch error for a non-success HTTP status.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            url: url.into(),
            status: Some(status),
            message: format!("HTTP status {status}"),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap an error raised while processing the source article.
    pub fn article(url: impl Into<String>, source: InterlinkError) -> Self {
        Self::Article {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Strip contextual wrappers and return the underlying error.
    pub fn root(&self) -> &InterlinkError {
        match self {
            Self::Article { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = InterlinkError::config("bad weight");
        assert_eq!(err.to_string(), "config error: bad weight");

        let err = InterlinkError::status("https://x.test/sitemap.xml", 404);
        assert_eq!(
            err.to_string(),
            "fetch error: https://x.test/sitemap.xml: HTTP status 404"
        );
    }

    #[test]
    fn article_wrapper_exposes_root() {
        let err = InterlinkError::article(
            "https://x.test/post",
            InterlinkError::status("https://x.test/post", 500),
        );
        assert!(err.to_string().starts_with("article error (https://x.test/post)"));
        assert!(matches!(
            err.root(),
            InterlinkError::Fetch {
                status: Some(500),
                ..
            }
        ));
    }
}

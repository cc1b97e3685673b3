//! Access token loading.
//!
//! The token lives in a plain-text credential file whose entire contents,
//! minus surrounding whitespace, are the bearer token.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};

/// Credential file consulted when no explicit path is supplied.
pub const DEFAULT_TOKEN_PATH: &str = "~/.canvas/access_token";

/// Opaque bearer credential. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token supplied directly (flag or environment).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TokenEmpty`] when the value is blank.
    pub fn new(raw: impl Into<String>) -> ClientResult<Self> {
        Self::from_source(&raw.into(), "command line")
    }

    fn from_source(raw: &str, origin: &str) -> ClientResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClientError::TokenEmpty {
                origin: origin.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Token text for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AccessToken(***)")
    }
}

/// Resolve [`DEFAULT_TOKEN_PATH`] against the current user's home directory.
///
/// # Errors
///
/// Fails when no home directory can be determined.
pub fn default_token_path() -> ClientResult<PathBuf> {
    expand_home(Path::new(DEFAULT_TOKEN_PATH))
}

/// Read the access token from `path`, or from the default location.
///
/// # Errors
///
/// Returns a configuration error when the file is missing, unreadable, or
/// empty once trimmed.
pub fn read_access_token(path: Option<&Path>) -> ClientResult<AccessToken> {
    let path = match path {
        Some(path) => expand_home(path)?,
        None => default_token_path()?,
    };

    let contents = fs::read_to_string(&path).map_err(|source| ClientError::TokenUnreadable {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded access token");
    AccessToken::from_source(&contents, &path.display().to_string())
}

fn expand_home(path: &Path) -> ClientResult<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = dirs::home_dir().ok_or_else(|| ClientError::HomeDirectoryUnavailable {
        path: path.display().to_string(),
    })?;
    Ok(home.join(rest))
}

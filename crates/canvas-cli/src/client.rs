//! Application context and error types shared by the command handlers.

use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::time::Duration;

use canvas_client::{
    AccessToken, CanvasClient, ClientConfig, ClientError, ErrorKind, read_access_token,
};

use crate::cli::{Cli, OutputFormat};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match err.kind() {
            ErrorKind::Configuration => {
                Self::Validation(format!("{:#}", anyhow::Error::from(err)))
            }
            ErrorKind::Remote => Self::Failure(err.into()),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) client: CanvasClient,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Build the API client from global flags, loading the access token.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let base_url = cli.base_url.clone().ok_or_else(|| {
            CliError::validation(
                "Canvas base URL is required (pass --base-url or set CANVAS_BASE_URL)",
            )
        })?;
        let token = resolve_token(cli.token.as_deref(), cli.token_file.as_deref())?;

        let mut config = ClientConfig::new(base_url, token);
        config.timeout = cli.timeout.map(Duration::from_secs);
        let client = CanvasClient::from_config(config)?;

        Ok(Self {
            client,
            output: cli.output,
        })
    }
}

/// A token passed directly wins over the token file.
pub(crate) fn resolve_token(
    token: Option<&str>,
    token_file: Option<&Path>,
) -> CliResult<AccessToken> {
    match token {
        Some(raw) => Ok(AccessToken::new(raw)?),
        None => Ok(read_access_token(token_file)?),
    }
}

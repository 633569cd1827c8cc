use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write diagnostics: {0}")]
    Render(#[from] codespan_reporting::files::Error),

    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no documentation for '{0}'")]
    UnknownKeyword(String),
}

impl CliError {
    /// Process exit code: 2 for I/O and encoding failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::UnknownKeyword(_) => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixtureError {
    #[error("missing opening --- frontmatter delimiter")]
    MissingOpening,

    #[error("missing closing --- frontmatter delimiter")]
    MissingClosing,

    #[error("TOML parse error: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for FixtureError {
    fn from(err: toml::de::Error) -> Self {
        FixtureError::Toml(err.to_string())
    }
}

//! Error types for the directus2ts crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a generation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{}", clap_message(.0))]
    InvalidArguments(clap::Error),

    #[error("invalid --{flag}: {reason}")]
    InvalidValue { flag: &'static str, reason: String },

    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("HTTP request failed")]
    RequestFailed(#[source] reqwest::Error),

    #[error("failed to read response body")]
    ResponseRead(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("response is not valid JSON")]
    InvalidSpec(#[source] serde_json::Error),

    #[error("OpenAPI spec must be a JSON object")]
    SpecNotObject,

    #[error("type generation failed: {0}")]
    Generation(String),

    #[error("failed to serialize spec")]
    SerializeSpec(#[source] serde_json::Error),

    #[error("failed to write {}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// The clap error is the message itself, not a source.
impl From<clap::Error> for Error {
    fn from(err: clap::Error) -> Self {
        Self::InvalidArguments(err)
    }
}

impl Error {
    /// `--help` and `--version` surface as clap errors but are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::InvalidArguments(e) if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            )
        )
    }
}

fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .trim_start_matches("error: ")
        .trim_end()
        .to_string()
}

use thiserror::Error;

/// Fatal outcomes of the upload workflow.
///
/// A failed commit is not here: it only produces a warning.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("git is not installed or not on PATH")]
    GitMissing(#[source] anyhow::Error),

    #[error("repository URL must not be empty")]
    EmptyUrl,

    #[error("push failed")]
    PushFailed(#[source] anyhow::Error),

    #[error("{step} failed")]
    Git {
        step: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Prompt(anyhow::Error),
}

impl UploadError {
    /// Process exit code for this error. Every fatal outcome exits with 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

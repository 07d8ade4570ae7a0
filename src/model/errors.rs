use thiserror::Error;

/// Mutation failures. Every variant leaves the model exactly as it was; the
/// message doubles as the user-facing diagnostic.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("listfile is not loaded")]
    NotLoaded,

    #[error("target '{target}' not found")]
    TargetNotFound { target: String },

    #[error("file '{file}' not found for target '{target}'")]
    FileNotFound { target: String, file: String },

    #[error("target '{target}' not found and statement creation is disabled")]
    CreationDisabled { target: String },
}

use thiserror::Error;

use crate::GenerateError;

/// Unified error type covering script generation, I/O and the binary cache.
///
/// Lets callers that both lower rules and persist trees use `?` on either.
#[derive(Debug, Error)]
pub enum RulecraftError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}

use emit_js::EmitError;
use parse_js::error::SyntaxError;
use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;
use thiserror::Error;

/// Everything that can stop a file from being modularized. Any of these aborts the file; no partial
/// output is produced.
#[derive(Debug, Error)]
pub enum ModularizeError {
  #[error("Nanoutils method {name} was not a known function. Please file a bug if it's my fault https://github.com/megawac/babel-plugin-nanoutils/issues")]
  Resolution { name: String },

  #[error("{pattern} is not supported, as it defeats the purpose of importing nanoutils functions individually")]
  UnsupportedPattern { pattern: String },

  #[error("failed to parse source: {0}")]
  Syntax(#[from] SyntaxError),

  #[error("failed to emit transformed source")]
  Emit(#[from] EmitError),

  #[error("source is not valid UTF-8")]
  InvalidUtf8(#[from] Utf8Error),

  #[error("could not find node_modules/nanoutils in {} or any of its ancestors", searched_from.display())]
  LibraryNotFound { searched_from: PathBuf },

  #[error("{}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl ModularizeError {
  pub(crate) fn unsupported(pattern: impl Into<String>) -> Self {
    ModularizeError::UnsupportedPattern {
      pattern: pattern.into(),
    }
  }

  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    ModularizeError::Io {
      path: path.into(),
      source,
    }
  }
}

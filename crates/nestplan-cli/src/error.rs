//! CLI error types.

use nestplan_core::CompileError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the `nestplan` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON for its expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Neither the request file nor the command line names a root entity.
    #[error("no root entity: pass --entity or set \"entity\" in the request file")]
    MissingEntity,

    /// Compilation or schema validation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

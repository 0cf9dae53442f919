//! Schema and request file loading.

use crate::error::CliError;
use nestplan_core::SchemaBundle;
use nestplan_proto::{RequestArgs, RequestContext};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A request as stored on disk.
///
/// ```json
/// { "entity": "Order",
///   "args": { "where": { "status": "open" }, "limit": 20 },
///   "selection": [{ "name": "total" }],
///   "fragments": {},
///   "variables": {} }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestFile {
    /// Root entity; the `--entity` flag takes precedence.
    #[serde(default)]
    pub entity: Option<String>,
    /// Root request arguments.
    #[serde(default)]
    pub args: RequestArgs,
    /// Selection, fragments and variables.
    #[serde(flatten)]
    pub context: RequestContext,
}

/// Load a schema bundle from a JSON file.
pub fn load_schema(path: &Path) -> Result<SchemaBundle, CliError> {
    let schema: SchemaBundle = load_json(path)?;
    debug!(
        path = %path.display(),
        version = schema.version,
        entities = schema.entities.len(),
        relations = schema.relations.len(),
        "Loaded schema"
    );
    Ok(schema)
}

/// Load a request from a JSON file.
pub fn load_request(path: &Path) -> Result<RequestFile, CliError> {
    load_json(path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

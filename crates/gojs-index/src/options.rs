//! Index configuration.

use crate::error::IndexError;
use serde::Deserialize;

/// Environment variable overriding [`IndexOptions::runtime_package`].
pub const RUNTIME_PACKAGE_ENV: &str = "GOJS_RUNTIME_PACKAGE";
/// Environment variable overriding [`IndexOptions::entry_point`].
pub const ENTRY_POINT_ENV: &str = "GOJS_ENTRY_POINT";

fn default_entry_point() -> String {
    "main".to_string()
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexOptions {
    /// Name of the program entry-point function. Always exported.
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
    /// Import path of the runtime-support package, indexed by bare name.
    #[serde(default)]
    pub runtime_package: Option<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            entry_point: default_entry_point(),
            runtime_package: None,
        }
    }
}

impl IndexOptions {
    pub fn with_runtime_package(mut self, path: impl Into<String>) -> Self {
        self.runtime_package = Some(path.into());
        self
    }

    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = name.into();
        self
    }

    /// Parse options from a JSON document such as
    /// `{"entryPoint": "main", "runtimePackage": "github.com/acme/runtime"}`.
    pub fn from_json(text: &str) -> Result<Self, IndexError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `GOJS_RUNTIME_PACKAGE` and `GOJS_ENTRY_POINT` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(RUNTIME_PACKAGE_ENV).ok(),
            std::env::var(ENTRY_POINT_ENV).ok(),
        )
    }

    fn with_overrides(mut self, runtime: Option<String>, entry: Option<String>) -> Self {
        if let Some(runtime) = runtime {
            self.runtime_package = Some(runtime);
        }
        if let Some(entry) = entry.filter(|e| !e.is_empty()) {
            self.entry_point = entry;
        }
        self
    }
}

/// Check that `path` is a well-formed import path.
pub(crate) fn validate_import_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("empty import path".to_string());
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err("import path must not start or end with '/'".to_string());
    }
    if path.split('/').any(str::is_empty) {
        return Err("import path has an empty segment".to_string());
    }
    if path.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        return Err("import path contains an invalid character".to_string());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;

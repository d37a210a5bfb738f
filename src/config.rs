//! Generator settings, read from an optional `dpgen.toml`.

use crate::emit::naming::is_identifier;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Holds `protocols/` and `devices/` descriptor directories.
    pub input_dir: PathBuf,
    /// Receives `protocols/` and `devices/` source directories.
    pub output_dir: PathBuf,
    /// Module path generated code imports the runtime from.
    pub runtime_path: String,
    /// Module path of the generated protocols, as seen from the devices.
    pub protocols_module: String,
    /// Also write `protocols/mod.rs` and `devices/mod.rs`.
    pub emit_mod_files: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            input_dir: PathBuf::from("specs"),
            output_dir: PathBuf::from("generated"),
            runtime_path: "dpgen::runtime".to_string(),
            protocols_module: "crate::protocols".to_string(),
            emit_mod_files: true,
        }
    }
}

impl GeneratorConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(path, &text)
    }

    /// Parse `text`; `path` only names the source in errors.
    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Module paths end up verbatim in `use` items, so they must be paths.
    pub fn validate(&self, path: &Path) -> Result<()> {
        for (key, value) in [
            ("runtime_path", &self.runtime_path),
            ("protocols_module", &self.protocols_module),
        ] {
            if !is_module_path(value) {
                return Err(Error::Config {
                    path: path.to_path_buf(),
                    reason: format!("{} '{}' is not a Rust module path", key, value),
                });
            }
        }
        Ok(())
    }

    pub fn protocols_dir(&self) -> PathBuf {
        self.input_dir.join("protocols")
    }

    pub fn devices_dir(&self) -> PathBuf {
        self.input_dir.join("devices")
    }
}

fn is_module_path(s: &str) -> bool {
    let s = s.strip_prefix("::").unwrap_or(s);
    !s.is_empty()
        && s.split("::").enumerate().all(|(i, seg)| {
            is_identifier(seg) || seg == "super" || (i == 0 && (seg == "crate" || seg == "self"))
        })
}

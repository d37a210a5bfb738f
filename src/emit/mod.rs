//! Code emission: protocol modules, device modules, the dispatch table and
//! the `mod.rs` glue.
//!
//! [`Generator::render`] produces every file in memory before
//! [`Generator::write`] touches the output directory, so a descriptor error
//! aborts the run without leaving partial output behind.

pub mod device;
pub mod naming;
pub mod protocol;
pub mod registry;

use crate::compiler::compile_protocol;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::loader::{load_devices, load_protocols, LoadedProtocols};
use crate::spec::DeviceSpec;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use device::render_device;
pub use protocol::render_protocol;
pub use registry::{render_mod_file, render_registry};

pub(crate) const GENERATED_NOTICE: &str = "// @generated by dpgen. Do not edit.";

pub(crate) fn header(source: &Path) -> String {
    let file = source.file_name().unwrap_or(source.as_os_str()).to_string_lossy();
    format!("// @generated by dpgen from {}. Do not edit.", file)
}

/// Line-oriented source builder with four-space indentation.
pub(crate) struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    pub(crate) fn new() -> Self {
        SourceWriter {
            out: String::new(),
            indent: 0,
        }
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write `text` and indent what follows.
    pub(crate) fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    pub(crate) fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// One output file, path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Generator { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Both load phases: protocols first, then devices.
    pub fn load(&self) -> Result<(LoadedProtocols, Vec<DeviceSpec>)> {
        let protocols = load_protocols(&self.config.protocols_dir())?;
        let devices = load_devices(&self.config.devices_dir())?;
        Ok((protocols, devices))
    }

    /// Compile and render every output file. Nothing is written.
    pub fn render(&self, protocols: &LoadedProtocols, devices: &[DeviceSpec]) -> Result<Vec<GeneratedFile>> {
        let runtime = self.config.runtime_path.as_str();
        let mut files = Vec::new();

        let mut protocol_stems: HashMap<&str, &Path> = HashMap::new();
        for spec in &protocols.specs {
            unique(&mut protocol_stems, &spec.stem, &spec.source, "module name")?;
            let compiled = compile_protocol(spec)?;
            debug!(protocol = %compiled.name, messages = compiled.messages.len(), "compiled protocol");
            files.push(GeneratedFile {
                path: Path::new("protocols").join(format!("{}.rs", spec.stem)),
                contents: render_protocol(&compiled, runtime),
            });
        }

        let mut device_stems: HashMap<&str, &Path> = HashMap::new();
        let type_names: Vec<String> = devices.iter().map(DeviceSpec::type_name).collect();
        let mut device_types: HashMap<&str, &Path> = HashMap::new();
        for (device, type_name) in devices.iter().zip(&type_names) {
            unique(&mut device_stems, &device.stem, &device.source, "module name")?;
            unique(&mut device_types, type_name, &device.source, "type name")?;
            let protocol = protocols.registry.resolve(device)?;
            debug!(device = %device.name, protocol = %protocol.name, "resolved device");
            files.push(GeneratedFile {
                path: Path::new("devices").join(format!("{}.rs", device.stem)),
                contents: render_device(device, protocol, runtime, &self.config.protocols_module),
            });
        }

        files.push(GeneratedFile {
            path: Path::new("devices").join("all.rs"),
            contents: render_registry(devices, runtime),
        });

        if self.config.emit_mod_files {
            files.push(GeneratedFile {
                path: Path::new("protocols").join("mod.rs"),
                contents: render_mod_file(protocols.specs.iter().map(|s| s.stem.as_str())),
            });
            files.push(GeneratedFile {
                path: Path::new("devices").join("mod.rs"),
                contents: render_mod_file(std::iter::once("all").chain(devices.iter().map(|d| d.stem.as_str()))),
            });
        }
        Ok(files)
    }

    /// Write `files` under the output directory, creating or truncating each.
    pub fn write(&self, files: &[GeneratedFile]) -> Result<()> {
        for file in files {
            let path = self.config.output_dir.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::write(&path, &file.contents).map_err(|e| Error::io(&path, e))?;
            debug!(file = %path.display(), bytes = file.contents.len(), "wrote");
        }
        Ok(())
    }

    /// Load, render and write. Returns what was written.
    pub fn run(&self) -> Result<Vec<GeneratedFile>> {
        let (protocols, devices) = self.load()?;
        let files = self.render(&protocols, &devices)?;
        self.write(&files)?;
        info!(
            output = %self.config.output_dir.display(),
            protocols = protocols.specs.len(),
            devices = devices.len(),
            files = files.len(),
            "generation done"
        );
        Ok(files)
    }
}

/// Two descriptors may not map to the same generated name.
fn unique<'a>(seen: &mut HashMap<&'a str, &'a Path>, name: &'a str, source: &'a Path, what: &str) -> Result<()> {
    if let Some(previous) = seen.get(name) {
        return Err(Error::validation(
            source,
            "name",
            format!("{} '{}' is already used by {}", what, name, previous.display()),
        ));
    }
    seen.insert(name, source);
    Ok(())
}

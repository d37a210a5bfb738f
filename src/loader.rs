//! Descriptor discovery and the two-phase load.
//!
//! Protocols are loaded first and produce a [`ProtocolRegistry`]. Device
//! resolution takes `&ProtocolRegistry`, and the only way to obtain one is
//! [`load_protocols`] / [`LoadedProtocols::from_specs`], so devices can never be
//! resolved against a partially built registry.

use crate::error::{Error, Result};
use crate::spec::{DeviceSpec, ProtocolSpec};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const EXTENSIONS: &[&str] = &["yaml", "yml"];

/// What devices need to know about a protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: String,
    pub type_name: String,
    /// Generated module (file stem) of the protocol.
    pub module: String,
    pub source: PathBuf,
}

/// Protocol identifier -> protocol, immutable once built.
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    entries: BTreeMap<u32, RegistryEntry>,
}

impl ProtocolRegistry {
    fn build(specs: &[ProtocolSpec]) -> Result<Self> {
        let mut entries: BTreeMap<u32, RegistryEntry> = BTreeMap::new();
        for spec in specs {
            if let Some(previous) = entries.get(&spec.id) {
                return Err(Error::DuplicateProtocolId {
                    id: spec.id,
                    file: spec.source.clone(),
                    previous: previous.source.clone(),
                });
            }
            entries.insert(
                spec.id,
                RegistryEntry {
                    name: spec.name.clone(),
                    type_name: spec.type_name(),
                    module: spec.stem.clone(),
                    source: spec.source.clone(),
                },
            );
        }
        Ok(ProtocolRegistry { entries })
    }

    pub fn get(&self, id: u32) -> Option<&RegistryEntry> {
        self.entries.get(&id)
    }

    /// Name of the protocol registered under `id`.
    pub fn name(&self, id: u32) -> Option<&str> {
        self.get(id).map(|e| e.name.as_str())
    }

    /// Protocol of `device`, or `UnknownProtocolId`.
    pub fn resolve(&self, device: &DeviceSpec) -> Result<&RegistryEntry> {
        self.get(device.protocol).ok_or_else(|| Error::UnknownProtocolId {
            id: device.protocol,
            file: device.source.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &RegistryEntry)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }
}

/// Result of the protocol phase.
#[derive(Debug, Clone)]
pub struct LoadedProtocols {
    pub specs: Vec<ProtocolSpec>,
    pub registry: ProtocolRegistry,
}

impl LoadedProtocols {
    /// Build the registry over already parsed specs. Fails on duplicate ids.
    pub fn from_specs(specs: Vec<ProtocolSpec>) -> Result<Self> {
        let registry = ProtocolRegistry::build(&specs)?;
        Ok(LoadedProtocols { specs, registry })
    }
}

/// All descriptor files under `dir`, recursively. Entries of each directory
/// are visited in file-name order so output is deterministic.
pub fn descriptor_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed"));
            Error::io(path, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_descriptor = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| EXTENSIONS.contains(&e));
        if is_descriptor {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Protocol phase: load every protocol descriptor under `dir`.
pub fn load_protocols(dir: &Path) -> Result<LoadedProtocols> {
    let mut specs = Vec::new();
    for path in descriptor_files(dir)? {
        let spec = ProtocolSpec::from_yaml(&path, &read(&path)?)?;
        debug!(file = %path.display(), id = spec.id, messages = spec.messages.len(), "loaded protocol");
        specs.push(spec);
    }
    let loaded = LoadedProtocols::from_specs(specs)?;
    info!(dir = %dir.display(), protocols = loaded.specs.len(), "protocol phase done");
    Ok(loaded)
}

/// Device phase: load every device descriptor under `dir`, in walk order.
/// Protocol ids are resolved at emission time, against a registry.
pub fn load_devices(dir: &Path) -> Result<Vec<DeviceSpec>> {
    let mut devices = Vec::new();
    for path in descriptor_files(dir)? {
        let device = DeviceSpec::from_yaml(&path, &read(&path)?)?;
        debug!(file = %path.display(), protocol = device.protocol, "loaded device");
        devices.push(device);
    }
    info!(dir = %dir.display(), devices = devices.len(), "device phase done");
    Ok(devices)
}

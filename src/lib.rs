//! # dpgen - device-protocol code generator
//!
//! Reads declarative YAML descriptors of USB device protocols and emits Rust
//! modules that encode requests, exchange them over a [`runtime::Transport`]
//! and decode the responses.
//!
//! ## Descriptors
//!
//! - **Protocols** (`<input>/protocols/*.yaml`): id, name, byte order, opcode
//!   type, messages, and literal pre-request / post-response hook actions.
//! - **Devices** (`<input>/devices/*.yaml`): name, protocol id, fan count and
//!   USB address (vendor id, product id, endpoint).
//!
//! ## Field types
//!
//! - Integers: `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32`, `i64`
//!   (`unsigned8`, `signed32`, ... are accepted as aliases)
//! - `fx16`: 16-bit fixed point, integer part high byte, tenths low byte
//! - `T[n]`: fixed-length array
//!
//! ## Example protocol
//!
//! ```text
//! id: 1
//! name: Asetek Pro
//! endian: big
//! opcode: u8
//! messages:
//!   - name: read_temperature
//!     opcode: 0xA9
//!     request: []
//!     response:
//!       - { name: unknown, type: u16 }
//!       - { name: temperature, type: fx16 }
//!     returns: [temperature]
//! ```
//!
//! ## Output
//!
//! One module per protocol, one per device, `devices/all.rs` mapping
//! `(vendor_id, product_id)` to a device constructor, and `mod.rs` glue.
//! See `tests/fixtures/generated/` for a complete generated tree.

pub mod compiler;
pub mod config;
pub mod emit;
pub mod error;
pub mod layout;
pub mod loader;
pub mod runtime;
pub mod spec;
pub mod types;

pub use compiler::{compile_protocol, CompiledMessage, CompiledProtocol};
pub use config::GeneratorConfig;
pub use emit::{GeneratedFile, Generator};
pub use error::{Error, Result};
pub use loader::{load_devices, load_protocols, LoadedProtocols, ProtocolRegistry};
pub use spec::{DeviceSpec, MessageSpec, ProtocolSpec};
pub use types::{parse as parse_type, TypeDescriptor, TypeError};

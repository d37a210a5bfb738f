//! Protocol and device descriptors.
//!
//! Descriptors are YAML documents. A protocol:
//!
//! ```yaml
//! id: 1
//! name: Asetek Pro
//! endian: big
//! opcode: u8
//! pre_request:
//!   - { method: control, args: [0x40, 0x02, 0x0001] }
//! post_response: []
//! messages:
//!   - name: read_temperature
//!     opcode: 0xA9
//!     request: []
//!     response:
//!       - { name: temperature, type: fx16 }
//!     returns: [temperature]
//! ```
//!
//! A device:
//!
//! ```yaml
//! name: Aquacool 240
//! protocol: 1
//! fans: 2
//! usb: { vendor_id: 0x1E71, product_id: 0x3008, endpoint: 0x01 }
//! ```
//!
//! Documents are deserialized into loosely typed raw structs first, then
//! validated field by field so that every error names the offending field.

use crate::emit::naming;
use crate::error::{Error, Result};
use crate::runtime::Endian;
use crate::types::{self, TypeDescriptor};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProtocolSpec {
    /// Descriptor file this protocol was loaded from.
    pub source: PathBuf,
    /// File stem of `source`; names the generated module.
    pub stem: String,
    pub id: u32,
    pub name: String,
    pub endian: Endian,
    /// Type of the leading opcode field. Always an integer scalar.
    pub opcode: TypeDescriptor,
    pub messages: Vec<MessageSpec>,
    pub pre_request: Vec<ActionSpec>,
    pub post_response: Vec<ActionSpec>,
}

#[derive(Debug, Clone)]
pub struct MessageSpec {
    pub name: String,
    pub opcode: u64,
    pub request: Vec<FieldSpec>,
    pub response: Vec<FieldSpec>,
    /// Response field names returned to the caller, in return order.
    pub returns: Vec<String>,
}

/// A request argument or response attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// A literal transport action run by a protocol hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub method: String,
    pub args: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct DeviceSpec {
    pub source: PathBuf,
    pub stem: String,
    pub name: String,
    /// Identifier of the protocol this device speaks.
    pub protocol: u32,
    pub fans: u32,
    pub usb: UsbAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsbAddress {
    pub vendor_id: u16,
    pub product_id: u16,
    pub endpoint: u8,
}

#[derive(Debug, Deserialize)]
struct RawProtocol {
    id: Option<u64>,
    name: Option<String>,
    endian: Option<String>,
    opcode: Option<String>,
    messages: Option<Vec<RawMessage>>,
    pre_request: Option<Vec<RawAction>>,
    post_response: Option<Vec<RawAction>>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    name: Option<String>,
    opcode: Option<u64>,
    request: Option<Vec<RawField>>,
    response: Option<Vec<RawField>>,
    returns: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    method: Option<String>,
    args: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
struct RawDevice {
    name: Option<String>,
    protocol: Option<u64>,
    fans: Option<u64>,
    usb: Option<RawUsb>,
}

#[derive(Debug, Deserialize)]
struct RawUsb {
    vendor_id: Option<u64>,
    product_id: Option<u64>,
    endpoint: Option<u64>,
}

/// File stem up to the first dot: `asetek_pro.v2.yaml` -> `asetek_pro`.
pub fn descriptor_stem(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}

/// Validation context: the file being validated.
struct Ctx<'a> {
    file: &'a Path,
}

impl<'a> Ctx<'a> {
    fn err(&self, field: impl Into<String>, reason: impl Into<String>) -> Error {
        Error::validation(self.file, field, reason)
    }

    fn required<T>(&self, value: Option<T>, field: &str) -> Result<T> {
        value.ok_or_else(|| self.err(field, "missing required field"))
    }

    fn in_range<T: TryFrom<u64>>(&self, value: u64, field: &str) -> Result<T> {
        T::try_from(value).map_err(|_| {
            self.err(
                field,
                format!("value {:#x} does not fit {}", value, std::any::type_name::<T>()),
            )
        })
    }

    fn stem(&self, stem: &str, reserved: &[&str]) -> Result<()> {
        if !naming::is_identifier(stem) || reserved.contains(&stem) {
            return Err(self.err(
                "<file name>",
                format!("'{}' cannot be used as a generated module name", stem),
            ));
        }
        Ok(())
    }

    fn display_name(&self, name: String, field: &str) -> Result<String> {
        let type_name = naming::type_name(&name);
        if !naming::is_identifier(&type_name) {
            return Err(self.err(field, format!("'{}' does not yield a valid type name", name)));
        }
        if !naming::is_type_name(&type_name) {
            return Err(self.err(
                field,
                format!("type name '{}' clashes with a name generated code already uses", type_name),
            ));
        }
        Ok(name)
    }

    fn field_type(&self, descriptor: String, field: &str) -> Result<TypeDescriptor> {
        types::parse(&descriptor).map_err(|e| self.err(field, e.to_string()))
    }
}

impl ProtocolSpec {
    /// Parse and validate a protocol descriptor. `file` is used for the stem
    /// and in error messages.
    pub fn from_yaml(file: &Path, text: &str) -> Result<Self> {
        let raw: RawProtocol = serde_yaml::from_str(text).map_err(|source| Error::Yaml {
            file: file.to_path_buf(),
            source,
        })?;
        let ctx = Ctx { file };
        let stem = descriptor_stem(file);
        ctx.stem(&stem, &["mod"])?;

        let id = ctx.in_range::<u32>(ctx.required(raw.id, "id")?, "id")?;
        let name = ctx.display_name(ctx.required(raw.name, "name")?, "name")?;
        let endian = match ctx.required(raw.endian, "endian")?.as_str() {
            "big" => Endian::Big,
            "little" => Endian::Little,
            other => {
                return Err(ctx.err("endian", format!("expected 'big' or 'little', found '{}'", other)));
            }
        };
        let opcode = ctx.field_type(ctx.required(raw.opcode, "opcode")?, "opcode")?;
        if !opcode.is_integer() || opcode.is_array() {
            return Err(ctx.err("opcode", format!("opcode type must be an integer scalar, found {}", opcode)));
        }

        let mut messages = Vec::new();
        let mut names = HashSet::new();
        for (i, raw_message) in raw.messages.unwrap_or_default().into_iter().enumerate() {
            let message = MessageSpec::validate(&ctx, raw_message, i, &opcode)?;
            if !names.insert(message.name.clone()) {
                return Err(ctx.err(
                    format!("messages[{}].name", i),
                    format!("duplicate message name '{}'", message.name),
                ));
            }
            messages.push(message);
        }

        let pre_request = validate_actions(&ctx, raw.pre_request, "pre_request")?;
        let post_response = validate_actions(&ctx, raw.post_response, "post_response")?;

        Ok(ProtocolSpec {
            source: file.to_path_buf(),
            stem,
            id,
            name,
            endian,
            opcode,
            messages,
            pre_request,
            post_response,
        })
    }

    pub fn type_name(&self) -> String {
        naming::type_name(&self.name)
    }
}

impl MessageSpec {
    fn validate(ctx: &Ctx<'_>, raw: RawMessage, index: usize, opcode_type: &TypeDescriptor) -> Result<Self> {
        let at = |field: &str| format!("messages[{}].{}", index, field);

        let name = ctx.required(raw.name, &at("name"))?;
        if !naming::is_identifier(&name) {
            return Err(ctx.err(at("name"), format!("'{}' is not a valid method name", name)));
        }
        if !naming::is_method_name(&name) {
            return Err(ctx.err(
                at("name"),
                format!("'{}' clashes with an item of the generated protocol type", name),
            ));
        }
        let opcode = ctx.required(raw.opcode, &at("opcode"))?;
        if opcode_type.max_value().map_or(true, |max| opcode > max) {
            return Err(ctx.err(
                at("opcode"),
                format!("opcode {:#x} does not fit the protocol opcode type {}", opcode, opcode_type),
            ));
        }

        let request = validate_fields(ctx, raw.request, &at("request"))?;
        let response = validate_fields(ctx, raw.response, &at("response"))?;

        Ok(MessageSpec {
            name,
            opcode,
            request,
            response,
            returns: raw.returns.unwrap_or_default(),
        })
    }
}

fn validate_fields(ctx: &Ctx<'_>, raw: Option<Vec<RawField>>, path: &str) -> Result<Vec<FieldSpec>> {
    let mut out: Vec<FieldSpec> = Vec::new();
    for (i, field) in raw.unwrap_or_default().into_iter().enumerate() {
        let at = |f: &str| format!("{}[{}].{}", path, i, f);
        let name = ctx.required(field.name, &at("name"))?;
        if !naming::is_field_name(&name) {
            return Err(ctx.err(at("name"), format!("'{}' cannot be used as a field name", name)));
        }
        if out.iter().any(|f| f.name == name) {
            return Err(ctx.err(at("name"), format!("duplicate field name '{}'", name)));
        }
        let ty = ctx.field_type(ctx.required(field.ty, &at("type"))?, &at("type"))?;
        out.push(FieldSpec { name, ty });
    }
    Ok(out)
}

fn validate_actions(ctx: &Ctx<'_>, raw: Option<Vec<RawAction>>, path: &str) -> Result<Vec<ActionSpec>> {
    let mut out = Vec::new();
    for (i, action) in raw.unwrap_or_default().into_iter().enumerate() {
        let at = |f: &str| format!("{}[{}].{}", path, i, f);
        let method = ctx.required(action.method, &at("method"))?;
        if !naming::is_identifier(&method) {
            return Err(ctx.err(at("method"), format!("'{}' is not a valid action name", method)));
        }
        let args = action
            .args
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(j, arg)| ctx.in_range::<u32>(arg, &format!("{}[{}].args[{}]", path, i, j)))
            .collect::<Result<Vec<_>>>()?;
        out.push(ActionSpec { method, args });
    }
    Ok(out)
}

impl DeviceSpec {
    /// Parse and validate a device descriptor. The protocol id is resolved
    /// later, against the registry built from the protocol descriptors.
    pub fn from_yaml(file: &Path, text: &str) -> Result<Self> {
        let raw: RawDevice = serde_yaml::from_str(text).map_err(|source| Error::Yaml {
            file: file.to_path_buf(),
            source,
        })?;
        let ctx = Ctx { file };
        let stem = descriptor_stem(file);
        ctx.stem(&stem, &["mod", "all"])?;

        let name = ctx.display_name(ctx.required(raw.name, "name")?, "name")?;
        let protocol = ctx.in_range::<u32>(ctx.required(raw.protocol, "protocol")?, "protocol")?;
        let fans = ctx.in_range::<u32>(ctx.required(raw.fans, "fans")?, "fans")?;
        let usb = ctx.required(raw.usb, "usb")?;
        let usb = UsbAddress {
            vendor_id: ctx.in_range(ctx.required(usb.vendor_id, "usb.vendor_id")?, "usb.vendor_id")?,
            product_id: ctx.in_range(ctx.required(usb.product_id, "usb.product_id")?, "usb.product_id")?,
            endpoint: ctx.in_range(ctx.required(usb.endpoint, "usb.endpoint")?, "usb.endpoint")?,
        };

        Ok(DeviceSpec {
            source: file.to_path_buf(),
            stem,
            name,
            protocol,
            fans,
            usb,
        })
    }

    pub fn type_name(&self) -> String {
        naming::type_name(&self.name)
    }
}

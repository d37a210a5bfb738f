//! Message compilation: turns each [`MessageSpec`] into an explicit plan of
//! preconditions, request-encoding steps, response checks, decoding steps and
//! a return shape. The emitters only walk these plans.

use crate::error::{Error, Result};
use crate::runtime::Endian;
use crate::spec::{ActionSpec, FieldSpec, MessageSpec, ProtocolSpec};
use crate::types::TypeDescriptor;
use std::path::PathBuf;

/// A request or response field with its byte offset in the message
/// (the opcode sits at offset 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireField {
    pub name: String,
    pub ty: TypeDescriptor,
    pub offset: usize,
}

/// Runtime length check for an array argument, run before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    /// Index into [`CompiledMessage::params`].
    pub param: usize,
    pub expected_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeStep {
    Opcode { ty: TypeDescriptor, value: u64 },
    /// Write parameter `params[i]`.
    Param(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStep {
    /// Read the echoed opcode and compare it with `expected`.
    Opcode { ty: TypeDescriptor, expected: u64 },
    /// Read `response[index]`; discarded unless `keep`.
    Field { index: usize, keep: bool },
}

/// What a message call returns, as positions into [`CompiledMessage::response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    Unit,
    Single(usize),
    Tuple(Vec<usize>),
}

impl ReturnShape {
    pub fn positions(&self) -> &[usize] {
        match self {
            ReturnShape::Unit => &[],
            ReturnShape::Single(p) => std::slice::from_ref(p),
            ReturnShape::Tuple(ps) => ps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompiledMessage {
    pub name: String,
    pub opcode: u64,
    pub opcode_type: TypeDescriptor,
    pub params: Vec<WireField>,
    pub preconditions: Vec<Precondition>,
    pub encode: Vec<EncodeStep>,
    pub request_size: usize,
    pub response: Vec<WireField>,
    pub response_size: usize,
    pub decode: Vec<DecodeStep>,
    pub returns: ReturnShape,
}

impl CompiledMessage {
    /// Rust type of the value a call returns on success.
    pub fn return_rust_type(&self) -> String {
        match &self.returns {
            ReturnShape::Unit => "()".to_string(),
            ReturnShape::Single(p) => self.response[*p].ty.value_rust_type(),
            ReturnShape::Tuple(ps) => {
                let types: Vec<String> = ps.iter().map(|p| self.response[*p].ty.value_rust_type()).collect();
                format!("({})", types.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompiledProtocol {
    pub id: u32,
    pub name: String,
    pub type_name: String,
    pub stem: String,
    pub source: PathBuf,
    pub endian: Endian,
    pub opcode: TypeDescriptor,
    pub messages: Vec<CompiledMessage>,
    pub pre_request: Vec<ActionSpec>,
    pub post_response: Vec<ActionSpec>,
}

/// Offsets of `fields` after a `start`-byte prefix, and the total size.
/// `path` names the field list in errors.
fn layout(protocol: &ProtocolSpec, path: &str, fields: &[FieldSpec], start: usize) -> Result<(Vec<WireField>, usize)> {
    let mut offset = start;
    let mut out = Vec::with_capacity(fields.len());
    for (i, f) in fields.iter().enumerate() {
        out.push(WireField {
            name: f.name.clone(),
            ty: f.ty,
            offset,
        });
        offset = offset.checked_add(f.ty.size()).ok_or_else(|| {
            Error::validation(
                &protocol.source,
                format!("{}[{}].type", path, i),
                "message size overflows usize",
            )
        })?;
    }
    Ok((out, offset))
}

/// Compile one message of `protocol`. `index` is the message's position, used
/// in error messages.
pub fn compile_message(protocol: &ProtocolSpec, index: usize, message: &MessageSpec) -> Result<CompiledMessage> {
    let opcode_type = protocol.opcode;
    let at = |list: &str| format!("messages[{}].{}", index, list);
    let (params, request_size) = layout(protocol, &at("request"), &message.request, opcode_type.size())?;
    let (response, response_size) = layout(protocol, &at("response"), &message.response, opcode_type.size())?;

    let preconditions = params
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.ty.count.map(|n| Precondition { param: i, expected_len: n }))
        .collect();

    let mut encode = vec![EncodeStep::Opcode {
        ty: opcode_type,
        value: message.opcode,
    }];
    encode.extend((0..params.len()).map(EncodeStep::Param));

    let mut positions = Vec::with_capacity(message.returns.len());
    for (j, name) in message.returns.iter().enumerate() {
        let field = format!("messages[{}].returns[{}]", index, j);
        let position = response.iter().position(|f| &f.name == name).ok_or_else(|| {
            Error::validation(
                &protocol.source,
                field.clone(),
                format!("'{}' is not a response attribute of '{}'", name, message.name),
            )
        })?;
        if positions.contains(&position) {
            return Err(Error::validation(
                &protocol.source,
                field,
                format!("'{}' is returned more than once", name),
            ));
        }
        positions.push(position);
    }

    let mut decode = vec![DecodeStep::Opcode {
        ty: opcode_type,
        expected: message.opcode,
    }];
    decode.extend((0..response.len()).map(|i| DecodeStep::Field {
        index: i,
        keep: positions.contains(&i),
    }));

    let returns = match positions.len() {
        0 => ReturnShape::Unit,
        1 => ReturnShape::Single(positions[0]),
        _ => ReturnShape::Tuple(positions),
    };

    Ok(CompiledMessage {
        name: message.name.clone(),
        opcode: message.opcode,
        opcode_type,
        params,
        preconditions,
        encode,
        request_size,
        response,
        response_size,
        decode,
        returns,
    })
}

/// Compile every message of `protocol`, in declaration order.
pub fn compile_protocol(protocol: &ProtocolSpec) -> Result<CompiledProtocol> {
    let messages = protocol
        .messages
        .iter()
        .enumerate()
        .map(|(i, m)| compile_message(protocol, i, m))
        .collect::<Result<Vec<_>>>()?;

    Ok(CompiledProtocol {
        id: protocol.id,
        name: protocol.name.clone(),
        type_name: protocol.type_name(),
        stem: protocol.stem.clone(),
        source: protocol.source.clone(),
        endian: protocol.endian,
        opcode: protocol.opcode,
        messages,
        pre_request: protocol.pre_request.clone(),
        post_response: protocol.post_response.clone(),
    })
}

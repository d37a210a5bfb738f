//! Renders a [`CompiledProtocol`] into one Rust module.

use super::naming::string_literal;
use super::{header, SourceWriter};
use crate::compiler::{CompiledMessage, CompiledProtocol, DecodeStep, EncodeStep, ReturnShape};
use crate::runtime::Endian;
use crate::spec::ActionSpec;

/// Source of `protocols/<stem>.rs`. `runtime_path` is the module the
/// generated code imports `Buffer`, `Transport` and friends from.
pub fn render_protocol(protocol: &CompiledProtocol, runtime_path: &str) -> String {
    let ty = &protocol.type_name;
    let mut w = SourceWriter::new();
    w.line(header(&protocol.source));
    w.blank();
    w.line("#[allow(unused_imports)]");
    w.line(format!(
        "use {}::{{check_array_len, check_opcode, check_response_size, Buffer, CallError, Endian, FixedPoint16, Transport, TransportError}};",
        runtime_path
    ));
    w.blank();
    w.line(format!("/// {} (protocol id {}).", protocol.name, protocol.id));
    w.open(format!("pub struct {}<T> {{", ty));
    w.line("transport: T,");
    w.close("}");
    w.blank();

    if protocol.messages.is_empty() {
        w.line("#[allow(dead_code)]");
    }
    w.open(format!("impl<T: Transport> {}<T> {{", ty));
    w.line(format!("pub const NAME: &'static str = {};", string_literal(&protocol.name)));
    w.line(format!("pub const ID: u32 = {};", protocol.id));
    let endian = match protocol.endian {
        Endian::Big => "Big",
        Endian::Little => "Little",
    };
    w.line(format!("pub const ENDIAN: Endian = Endian::{};", endian));
    w.blank();

    w.open("pub fn new(transport: T) -> Self {");
    w.line("Self { transport }");
    w.close("}");
    w.blank();
    w.open("pub fn transport(&self) -> &T {");
    w.line("&self.transport");
    w.close("}");
    w.blank();
    w.open("pub fn transport_mut(&mut self) -> &mut T {");
    w.line("&mut self.transport");
    w.close("}");
    w.blank();
    w.open("pub fn into_transport(self) -> T {");
    w.line("self.transport");
    w.close("}");
    w.blank();

    hook(&mut w, "pre_request", &protocol.pre_request);
    w.blank();
    hook(&mut w, "post_response", &protocol.post_response);
    w.blank();

    w.open("fn exchange(&mut self, endpoint: u8, request: &Buffer) -> Result<Buffer, CallError> {");
    w.line("self.pre_request()?;");
    w.line("let response = self.transport.send(endpoint, request)?;");
    w.line("self.post_response()?;");
    w.line("Ok(response)");
    w.close("}");

    for message in &protocol.messages {
        w.blank();
        method(&mut w, message);
    }
    w.close("}");
    w.finish()
}

fn hook(w: &mut SourceWriter, name: &str, actions: &[ActionSpec]) {
    w.open(format!("fn {}(&mut self) -> Result<(), TransportError> {{", name));
    for action in actions {
        let args: Vec<String> = action.args.iter().map(|a| format!("{:#04x}", a)).collect();
        w.line(format!(
            "self.transport.action({}, &[{}])?;",
            string_literal(&action.method),
            args.join(", ")
        ));
    }
    w.line("Ok(())");
    w.close("}");
}

fn truncated(message: &str, field: &str) -> String {
    format!(
        ".ok_or(CallError::Truncated {{ message: {}, field: {} }})?;",
        string_literal(message),
        string_literal(field)
    )
}

fn method(w: &mut SourceWriter, m: &CompiledMessage) {
    let name = string_literal(&m.name);
    w.line(format!(
        "/// `{}`: opcode {}, {}-byte request, {}-byte response.",
        m.name,
        m.opcode_type.hex_literal(m.opcode),
        m.request_size,
        m.response_size
    ));

    let mut params = vec!["&mut self".to_string(), "endpoint: u8".to_string()];
    params.extend(m.params.iter().map(|p| format!("{}: {}", p.name, p.ty.param_rust_type())));
    w.open(format!(
        "pub fn {}({}) -> Result<{}, CallError> {{",
        m.name,
        params.join(", "),
        m.return_rust_type()
    ));

    for pre in &m.preconditions {
        let param = &m.params[pre.param];
        w.line(format!(
            "check_array_len({}, {}, {}.len(), {})?;",
            name,
            string_literal(&param.name),
            param.name,
            pre.expected_len
        ));
    }

    w.line("let mut buffer = Buffer::new();");
    for step in &m.encode {
        match step {
            EncodeStep::Opcode { ty, value } => w.line(format!(
                "buffer.write::<{}>(Self::ENDIAN, {});",
                ty.element_rust_type(),
                ty.hex_literal(*value)
            )),
            EncodeStep::Param(i) => {
                let param = &m.params[*i];
                let call = if param.ty.is_array() { "write_slice" } else { "write" };
                w.line(format!(
                    "buffer.{}::<{}>(Self::ENDIAN, {});",
                    call,
                    param.ty.element_rust_type(),
                    param.name
                ));
            }
        }
    }

    w.line("let mut response = self.exchange(endpoint, &buffer)?;");
    w.line(format!("check_response_size({}, response.len(), {})?;", name, m.response_size));

    for step in &m.decode {
        match step {
            DecodeStep::Opcode { ty, expected } => {
                w.line(format!(
                    "let opcode: {} = response.read(Self::ENDIAN){}",
                    ty.element_rust_type(),
                    truncated(&m.name, "opcode")
                ));
                w.line(format!("check_opcode({}, opcode, {})?;", name, ty.hex_literal(*expected)));
            }
            DecodeStep::Field { index, keep } => {
                let field = &m.response[*index];
                let binding = if *keep { field.name.as_str() } else { "_" };
                let read = match field.ty.count {
                    Some(n) => format!("read_array(Self::ENDIAN, {})", n),
                    None => "read(Self::ENDIAN)".to_string(),
                };
                w.line(format!(
                    "let {}: {} = response.{}{}",
                    binding,
                    field.ty.value_rust_type(),
                    read,
                    truncated(&m.name, &field.name)
                ));
            }
        }
    }

    let value = match &m.returns {
        ReturnShape::Unit => "()".to_string(),
        ReturnShape::Single(p) => m.response[*p].name.clone(),
        ReturnShape::Tuple(ps) => {
            let names: Vec<&str> = ps.iter().map(|p| m.response[*p].name.as_str()).collect();
            format!("({})", names.join(", "))
        }
    };
    w.line(format!("Ok({})", value));
    w.close("}");
}

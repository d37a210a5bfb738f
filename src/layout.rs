//! Human-readable wire layout of a compiled protocol, one table per message.

use crate::compiler::{CompiledMessage, CompiledProtocol, WireField};
use crate::runtime::Endian;

/// Format the request and response layout of every message in `protocol`.
pub fn render_layout(protocol: &CompiledProtocol) -> String {
    let endian = match protocol.endian {
        Endian::Big => "big",
        Endian::Little => "little",
    };
    let mut out = format!(
        "{} (id {}, {} endian, opcode {})\n",
        protocol.name, protocol.id, endian, protocol.opcode
    );
    for message in &protocol.messages {
        out.push_str(&format_message(message));
    }
    out
}

fn format_message(m: &CompiledMessage) -> String {
    let mut out = format!("  {}  opcode {}\n", m.name, m.opcode_type.hex_literal(m.opcode));
    let width = m
        .params
        .iter()
        .chain(&m.response)
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0)
        .max("opcode".len());

    out.push_str(&format!("    request  {} bytes\n", m.request_size));
    out.push_str(&format!("      [{:>3}] {:<w$}  {}\n", 0, "opcode", m.opcode_type, w = width));
    for p in &m.params {
        out.push_str(&format_field(p, width, ""));
    }

    out.push_str(&format!("    response {} bytes\n", m.response_size));
    out.push_str(&format!("      [{:>3}] {:<w$}  {}\n", 0, "opcode", m.opcode_type, w = width));
    let returned = m.returns.positions();
    for (i, f) in m.response.iter().enumerate() {
        let note = match returned.iter().position(|&p| p == i) {
            Some(slot) if returned.len() > 1 => format!("  -> returns.{}", slot),
            Some(_) => "  -> returned".to_string(),
            None => "  (discarded)".to_string(),
        };
        out.push_str(&format_field(f, width, &note));
    }
    out
}

fn format_field(f: &WireField, width: usize, note: &str) -> String {
    format!("      [{:>3}] {:<w$}  {}{}\n", f.offset, f.name, f.ty, note, w = width)
}

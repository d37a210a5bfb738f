//! Identifier rules shared by the loader and the emitters.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `"Asetek Pro"` | [`type_name`] | `AsetekPro` |
//! | `"asetek_pro"` | [`is_identifier`] | `true` |

/// Locals and parameters every generated message method declares, and the
/// runtime functions its body calls.
pub const RESERVED_LOCALS: &[&str] = &[
    "endpoint",
    "buffer",
    "response",
    "opcode",
    "check_array_len",
    "check_opcode",
    "check_response_size",
];

/// Items of the generated protocol impl that messages sit next to.
pub const RESERVED_METHODS: &[&str] = &[
    "new",
    "transport",
    "transport_mut",
    "into_transport",
    "pre_request",
    "post_response",
    "exchange",
    "NAME",
    "ID",
    "ENDIAN",
];

/// Names a generated module already uses for a type: the runtime imports, the
/// generic parameter, and the prelude and primitive types the bodies mention.
pub const RESERVED_TYPES: &[&str] = &[
    "Buffer",
    "CallError",
    "DeviceInfo",
    "Endian",
    "FixedPoint16",
    "Transport",
    "TransportError",
    "T",
    "Result",
    "Option",
    "Vec",
    "Ok",
    "Err",
    "Some",
    "None",
    "u8",
    "u16",
    "u32",
    "u64",
    "i8",
    "i16",
    "i32",
    "i64",
];

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern", "false", "fn",
    "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self",
    "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become",
    "box", "do", "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "gen",
];

/// Type identifier for a human-readable name: separators are stripped and
/// the casing of each word is kept.
///
/// ```
/// use dpgen::emit::naming::type_name;
///
/// assert_eq!(type_name("Asetek Pro"), "AsetekPro");
/// assert_eq!(type_name("Corsair H100i-Pro"), "CorsairH100iPro");
/// ```
pub fn type_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// ASCII identifier that is not a Rust keyword.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_ok = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() || c == '_',
        None => false,
    };
    starts_ok && s != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !KEYWORDS.contains(&s)
}

/// Usable as a generated parameter or local.
pub fn is_field_name(s: &str) -> bool {
    is_identifier(s) && !RESERVED_LOCALS.contains(&s) && !RESERVED_TYPES.contains(&s)
}

/// Usable as a generated message method.
pub fn is_method_name(s: &str) -> bool {
    is_identifier(s) && !RESERVED_METHODS.contains(&s)
}

/// Usable as a generated protocol or device type.
pub fn is_type_name(s: &str) -> bool {
    is_identifier(s) && !RESERVED_TYPES.contains(&s)
}

/// Escape a string for a Rust string literal.
pub fn string_literal(s: &str) -> String {
    format!("{:?}", s)
}

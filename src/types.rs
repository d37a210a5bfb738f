//! Wire-type descriptors: parsing, byte sizes and Rust type rendering.
//!
//! A descriptor names one of the supported wire types, optionally followed by a
//! fixed array length:
//!
//! - `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32`, `i64` (also spelled
//!   `unsigned8` .. `signed64`)
//! - `fx16`: 16-bit fixed point, see [`FixedPoint16`](crate::runtime::FixedPoint16)
//! - `T[n]`: exactly `n` elements of `T`, `n >= 1`

use pest::Parser;
use pest_derive::Parser as PestParser;
use std::fmt;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct DescriptorParser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("unsupported type descriptor '{0}'")]
    UnsupportedType(String),
}

/// Element kind of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Unsigned,
    Signed,
    FixedPoint16,
}

/// Parsed form of a wire-type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub kind: ScalarKind,
    /// Width of one element, in bytes.
    pub width: usize,
    /// Element count for `T[n]`; `None` for scalars.
    pub count: Option<usize>,
}

/// Parse a descriptor such as `u16` or `u8[14]`.
pub fn parse(descriptor: &str) -> Result<TypeDescriptor, TypeError> {
    let unsupported = || TypeError::UnsupportedType(descriptor.to_string());
    let pairs = DescriptorParser::parse(Rule::descriptor, descriptor).map_err(|_| unsupported())?;
    let root = pairs.into_iter().next().ok_or_else(unsupported)?;

    let mut kind = None;
    let mut width = 0usize;
    let mut count = None;
    for inner in root.into_inner() {
        match inner.as_rule() {
            Rule::fixed_point => {
                kind = Some(ScalarKind::FixedPoint16);
                width = 2;
            }
            Rule::integer_type => {
                for part in inner.into_inner() {
                    match part.as_rule() {
                        Rule::signedness => {
                            kind = Some(match part.as_str() {
                                "u" | "unsigned" => ScalarKind::Unsigned,
                                _ => ScalarKind::Signed,
                            });
                        }
                        Rule::width => {
                            let bits: usize = part.as_str().parse().map_err(|_| unsupported())?;
                            width = bits / 8;
                        }
                        _ => {}
                    }
                }
            }
            Rule::array_len => {
                let n: usize = inner.as_str().parse().map_err(|_| unsupported())?;
                if n == 0 || n.checked_mul(width).is_none() {
                    return Err(unsupported());
                }
                count = Some(n);
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(unsupported)?;
    Ok(TypeDescriptor { kind, width, count })
}

/// Byte size of the value a descriptor describes.
pub fn size(descriptor: &str) -> Result<usize, TypeError> {
    parse(descriptor).map(|t| t.size())
}

impl TypeDescriptor {
    pub fn size(&self) -> usize {
        self.width * self.count.unwrap_or(1)
    }

    pub fn is_array(&self) -> bool {
        self.count.is_some()
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.kind, ScalarKind::Unsigned | ScalarKind::Signed)
    }

    /// Arrays and fixed-point values are taken by reference in generated
    /// signatures. Never affects the wire format.
    pub fn is_pass_by_reference(&self) -> bool {
        self.is_array() || self.kind == ScalarKind::FixedPoint16
    }

    /// Descriptor of a single element (drops the array length).
    pub fn element(&self) -> TypeDescriptor {
        TypeDescriptor { count: None, ..*self }
    }

    /// Rust type of one element: `u16`, `i8`, `FixedPoint16`.
    pub fn element_rust_type(&self) -> &'static str {
        match (self.kind, self.width) {
            (ScalarKind::FixedPoint16, _) => "FixedPoint16",
            (ScalarKind::Unsigned, 1) => "u8",
            (ScalarKind::Unsigned, 2) => "u16",
            (ScalarKind::Unsigned, 4) => "u32",
            (ScalarKind::Unsigned, _) => "u64",
            (ScalarKind::Signed, 1) => "i8",
            (ScalarKind::Signed, 2) => "i16",
            (ScalarKind::Signed, 4) => "i32",
            (ScalarKind::Signed, _) => "i64",
        }
    }

    /// Owned Rust type of a decoded value: `u16` or `Vec<u8>`.
    pub fn value_rust_type(&self) -> String {
        match self.count {
            Some(_) => format!("Vec<{}>", self.element_rust_type()),
            None => self.element_rust_type().to_string(),
        }
    }

    /// Rust type of a generated parameter. Arrays become slices; `FixedPoint16`
    /// is `Copy` and two bytes wide, so it is passed by value.
    pub fn param_rust_type(&self) -> String {
        match self.count {
            Some(_) => format!("&[{}]", self.element_rust_type()),
            None => self.element_rust_type().to_string(),
        }
    }

    /// Largest non-negative value an integer scalar of this type can hold.
    pub fn max_value(&self) -> Option<u64> {
        let bits = (self.width * 8) as u32;
        match self.kind {
            ScalarKind::Unsigned => Some(if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }),
            ScalarKind::Signed => Some((1u64 << (bits - 1)) - 1),
            ScalarKind::FixedPoint16 => None,
        }
    }

    /// Hex literal padded to the element width, e.g. `0xa9` for a `u8`.
    pub fn hex_literal(&self, value: u64) -> String {
        format!("{:#0w$x}", value, w = 2 + 2 * self.width)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.kind {
            ScalarKind::FixedPoint16 => "fx16".to_string(),
            ScalarKind::Unsigned => format!("u{}", self.width * 8),
            ScalarKind::Signed => format!("i{}", self.width * 8),
        };
        match self.count {
            Some(n) => write!(f, "{}[{}]", base, n),
            None => write!(f, "{}", base),
        }
    }
}

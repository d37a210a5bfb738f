//! Runtime support for generated protocol and device code.
//!
//! Generated files import everything they use from this module: the
//! [`Buffer`] they encode requests into, the [`Transport`] that moves bytes to
//! and from the device, and the [`CallError`] a failed message call returns.
//! The `check_*` helpers are the preconditions and response checks every
//! generated message method runs.

mod buffer;
mod fixed_point;
mod scripted;

pub use buffer::{Buffer, HexError, WireValue};
pub use fixed_point::FixedPoint16;
pub use scripted::{ScriptedTransport, TransportCall};

/// Byte order of multi-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte exchange with one physical or emulated device.
pub trait Transport {
    /// Send `request` to `endpoint` and return the device's response.
    fn send(&mut self, endpoint: u8, request: &Buffer) -> Result<Buffer, TransportError>;

    /// Run a named control action (e.g. a USB control transfer) with literal
    /// integer arguments. Used by protocol pre-request/post-response hooks.
    fn action(&mut self, name: &str, args: &[u32]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, endpoint: u8, request: &Buffer) -> Result<Buffer, TransportError> {
        (**self).send(endpoint, request)
    }

    fn action(&mut self, name: &str, args: &[u32]) -> Result<(), TransportError> {
        (**self).action(name, args)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, endpoint: u8, request: &Buffer) -> Result<Buffer, TransportError> {
        (**self).send(endpoint, request)
    }

    fn action(&mut self, name: &str, args: &[u32]) -> Result<(), TransportError> {
        (**self).action(name, args)
    }
}

/// Error returned by a generated message method. Fatal to that call only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("{message}: argument '{argument}' has size {actual} while {expected} is expected")]
    ArgumentSizeMismatch {
        message: &'static str,
        argument: &'static str,
        actual: usize,
        expected: usize,
    },
    #[error("{message}: obtained response with unexpected size {actual} while {expected} was expected")]
    UnexpectedResponseSize {
        message: &'static str,
        actual: usize,
        expected: usize,
    },
    #[error("{message}: obtained response with opcode {actual:#04x} while {expected:#04x} was expected")]
    OpcodeMismatch {
        message: &'static str,
        actual: u64,
        expected: u64,
    },
    #[error("{message}: response ended before field '{field}'")]
    Truncated {
        message: &'static str,
        field: &'static str,
    },
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
}

/// Precondition for array arguments: the slice must have its declared length.
pub fn check_array_len(
    message: &'static str,
    argument: &'static str,
    actual: usize,
    expected: usize,
) -> Result<(), CallError> {
    if actual != expected {
        return Err(CallError::ArgumentSizeMismatch {
            message,
            argument,
            actual,
            expected,
        });
    }
    Ok(())
}

pub fn check_response_size(message: &'static str, actual: usize, expected: usize) -> Result<(), CallError> {
    if actual != expected {
        return Err(CallError::UnexpectedResponseSize {
            message,
            actual,
            expected,
        });
    }
    Ok(())
}

/// The device echoes the request opcode as the first response field.
pub fn check_opcode<T: WireValue + PartialEq>(message: &'static str, actual: T, expected: T) -> Result<(), CallError> {
    if actual != expected {
        return Err(CallError::OpcodeMismatch {
            message,
            actual: actual.to_bits(),
            expected: expected.to_bits(),
        });
    }
    Ok(())
}

/// Static metadata of a generated device.
pub trait DeviceInfo {
    fn name(&self) -> &'static str;
    fn fan_count(&self) -> u32;
    /// Endpoint the device's messages are sent to.
    fn endpoint(&self) -> u8;
    fn vendor_id(&self) -> u16;
    fn product_id(&self) -> u16;
}

use super::{Buffer, Transport, TransportError};
use std::collections::VecDeque;

/// One call observed by a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Send { endpoint: u8, data: Vec<u8> },
    Action { name: String, args: Vec<u32> },
}

/// In-memory transport that answers `send` with queued responses and records
/// every call. Lets generated code run without a device attached.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: VecDeque<Buffer>,
    calls: Vec<TransportCall>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        ScriptedTransport::default()
    }

    /// Queue a response given as a hex string.
    pub fn respond_hex(mut self, hex: &str) -> Result<Self, TransportError> {
        let buffer = Buffer::from_hex(hex).map_err(|e| TransportError::new(e.to_string()))?;
        self.responses.push_back(buffer);
        Ok(self)
    }

    pub fn push_response(&mut self, response: impl Into<Buffer>) {
        self.responses.push_back(response.into());
    }

    pub fn calls(&self) -> &[TransportCall] {
        &self.calls
    }

    /// Payloads of all `send` calls, in order.
    pub fn sent(&self) -> Vec<&[u8]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                TransportCall::Send { data, .. } => Some(data.as_slice()),
                TransportCall::Action { .. } => None,
            })
            .collect()
    }

    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, endpoint: u8, request: &Buffer) -> Result<Buffer, TransportError> {
        self.calls.push(TransportCall::Send {
            endpoint,
            data: request.as_bytes().to_vec(),
        });
        self.responses
            .pop_front()
            .ok_or_else(|| TransportError::new(format!("no scripted response left for endpoint {}", endpoint)))
    }

    fn action(&mut self, name: &str, args: &[u32]) -> Result<(), TransportError> {
        self.calls.push(TransportCall::Action {
            name: name.to_string(),
            args: args.to_vec(),
        });
        Ok(())
    }
}

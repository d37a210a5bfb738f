// @generated by dpgen from hydro_link.yaml. Do not edit.

#[allow(unused_imports)]
use dpgen::runtime::{check_array_len, check_opcode, check_response_size, Buffer, CallError, Endian, FixedPoint16, Transport, TransportError};

/// Hydro Link (protocol id 2).
pub struct HydroLink<T> {
    transport: T,
}

impl<T: Transport> HydroLink<T> {
    pub const NAME: &'static str = "Hydro Link";
    pub const ID: u32 = 2;
    pub const ENDIAN: Endian = Endian::Little;

    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    fn pre_request(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn post_response(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn exchange(&mut self, endpoint: u8, request: &Buffer) -> Result<Buffer, CallError> {
        self.pre_request()?;
        let response = self.transport.send(endpoint, request)?;
        self.post_response()?;
        Ok(response)
    }

    /// `set_fan_duty`: opcode 0x0102, 13-byte request, 5-byte response.
    pub fn set_fan_duty(&mut self, endpoint: u8, fan_index: u8, duty: u16, limits: &[i32]) -> Result<u16, CallError> {
        check_array_len("set_fan_duty", "limits", limits.len(), 2)?;
        let mut buffer = Buffer::new();
        buffer.write::<u16>(Self::ENDIAN, 0x0102);
        buffer.write::<u8>(Self::ENDIAN, fan_index);
        buffer.write::<u16>(Self::ENDIAN, duty);
        buffer.write_slice::<i32>(Self::ENDIAN, limits);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("set_fan_duty", response.len(), 5)?;
        let opcode: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "set_fan_duty", field: "opcode" })?;
        check_opcode("set_fan_duty", opcode, 0x0102)?;
        let _: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "set_fan_duty", field: "status" })?;
        let duty: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "set_fan_duty", field: "duty" })?;
        Ok(duty)
    }

    /// `read_sensors`: opcode 0x0210, 4-byte request, 28-byte response.
    pub fn read_sensors(&mut self, endpoint: u8, channel: u16) -> Result<(FixedPoint16, u32, Vec<u64>), CallError> {
        let mut buffer = Buffer::new();
        buffer.write::<u16>(Self::ENDIAN, 0x0210);
        buffer.write::<u16>(Self::ENDIAN, channel);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("read_sensors", response.len(), 28)?;
        let opcode: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_sensors", field: "opcode" })?;
        check_opcode("read_sensors", opcode, 0x0210)?;
        let _: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_sensors", field: "channel" })?;
        let temperature: FixedPoint16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_sensors", field: "temperature" })?;
        let voltage_mv: u32 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_sensors", field: "voltage_mv" })?;
        let _: i16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_sensors", field: "offset" })?;
        let counters: Vec<u64> = response.read_array(Self::ENDIAN, 2).ok_or(CallError::Truncated { message: "read_sensors", field: "counters" })?;
        Ok((temperature, voltage_mv, counters))
    }
}

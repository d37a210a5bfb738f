// @generated by dpgen from asetek_pro.yaml. Do not edit.

#[allow(unused_imports)]
use dpgen::runtime::{check_array_len, check_opcode, check_response_size, Buffer, CallError, Endian, FixedPoint16, Transport, TransportError};

/// Asetek Pro (protocol id 1).
pub struct AsetekPro<T> {
    transport: T,
}

impl<T: Transport> AsetekPro<T> {
    pub const NAME: &'static str = "Asetek Pro";
    pub const ID: u32 = 1;
    pub const ENDIAN: Endian = Endian::Big;

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
        self.transport.action("control", &[0x40, 0x02, 0x01])?;
        Ok(())
    }

    fn post_response(&mut self) -> Result<(), TransportError> {
        self.transport.action("control", &[0x40, 0x02, 0x04])?;
        Ok(())
    }

    fn exchange(&mut self, endpoint: u8, request: &Buffer) -> Result<Buffer, CallError> {
        self.pre_request()?;
        let response = self.transport.send(endpoint, request)?;
        self.post_response()?;
        Ok(response)
    }

    /// `read_pump_rpm`: opcode 0x31, 1-byte request, 5-byte response.
    pub fn read_pump_rpm(&mut self, endpoint: u8) -> Result<u16, CallError> {
        let mut buffer = Buffer::new();
        buffer.write::<u8>(Self::ENDIAN, 0x31);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("read_pump_rpm", response.len(), 5)?;
        let opcode: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_pump_rpm", field: "opcode" })?;
        check_opcode("read_pump_rpm", opcode, 0x31)?;
        let _: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_pump_rpm", field: "unknown" })?;
        let rpm: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_pump_rpm", field: "rpm" })?;
        Ok(rpm)
    }

    /// `read_fan_rpm`: opcode 0x41, 2-byte request, 6-byte response.
    pub fn read_fan_rpm(&mut self, endpoint: u8, fan_index: u8) -> Result<(u8, u16), CallError> {
        let mut buffer = Buffer::new();
        buffer.write::<u8>(Self::ENDIAN, 0x41);
        buffer.write::<u8>(Self::ENDIAN, fan_index);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("read_fan_rpm", response.len(), 6)?;
        let opcode: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_fan_rpm", field: "opcode" })?;
        check_opcode("read_fan_rpm", opcode, 0x41)?;
        let _: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_fan_rpm", field: "unknown" })?;
        let fan_index: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_fan_rpm", field: "fan_index" })?;
        let rpm: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_fan_rpm", field: "rpm" })?;
        Ok((fan_index, rpm))
    }

    /// `read_temperature`: opcode 0xa9, 1-byte request, 5-byte response.
    pub fn read_temperature(&mut self, endpoint: u8) -> Result<FixedPoint16, CallError> {
        let mut buffer = Buffer::new();
        buffer.write::<u8>(Self::ENDIAN, 0xa9);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("read_temperature", response.len(), 5)?;
        let opcode: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_temperature", field: "opcode" })?;
        check_opcode("read_temperature", opcode, 0xa9)?;
        let _: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_temperature", field: "unknown" })?;
        let temperature: FixedPoint16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_temperature", field: "temperature" })?;
        Ok(temperature)
    }

    /// `read_firmware_version`: opcode 0xaa, 1-byte request, 7-byte response.
    pub fn read_firmware_version(&mut self, endpoint: u8) -> Result<(u8, u8, u8), CallError> {
        let mut buffer = Buffer::new();
        buffer.write::<u8>(Self::ENDIAN, 0xaa);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("read_firmware_version", response.len(), 7)?;
        let opcode: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_firmware_version", field: "opcode" })?;
        check_opcode("read_firmware_version", opcode, 0xaa)?;
        let _: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_firmware_version", field: "unknown" })?;
        let major: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_firmware_version", field: "major" })?;
        let minor: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_firmware_version", field: "minor" })?;
        let patch: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_firmware_version", field: "patch" })?;
        let _: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "read_firmware_version", field: "reserved" })?;
        Ok((major, minor, patch))
    }

    /// `write_pump_mode`: opcode 0x32, 2-byte request, 3-byte response.
    pub fn write_pump_mode(&mut self, endpoint: u8, mode: u8) -> Result<(), CallError> {
        let mut buffer = Buffer::new();
        buffer.write::<u8>(Self::ENDIAN, 0x32);
        buffer.write::<u8>(Self::ENDIAN, mode);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("write_pump_mode", response.len(), 3)?;
        let opcode: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "write_pump_mode", field: "opcode" })?;
        check_opcode("write_pump_mode", opcode, 0x32)?;
        let _: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "write_pump_mode", field: "unknown" })?;
        Ok(())
    }

    /// `write_fan_curve`: opcode 0x40, 16-byte request, 3-byte response.
    pub fn write_fan_curve(&mut self, endpoint: u8, fan_index: u8, temperatures: &[u8], pwm: &[u8]) -> Result<(), CallError> {
        check_array_len("write_fan_curve", "temperatures", temperatures.len(), 7)?;
        check_array_len("write_fan_curve", "pwm", pwm.len(), 7)?;
        let mut buffer = Buffer::new();
        buffer.write::<u8>(Self::ENDIAN, 0x40);
        buffer.write::<u8>(Self::ENDIAN, fan_index);
        buffer.write_slice::<u8>(Self::ENDIAN, temperatures);
        buffer.write_slice::<u8>(Self::ENDIAN, pwm);
        let mut response = self.exchange(endpoint, &buffer)?;
        check_response_size("write_fan_curve", response.len(), 3)?;
        let opcode: u8 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "write_fan_curve", field: "opcode" })?;
        check_opcode("write_fan_curve", opcode, 0x40)?;
        let _: u16 = response.read(Self::ENDIAN).ok_or(CallError::Truncated { message: "write_fan_curve", field: "unknown" })?;
        Ok(())
    }
}

// @generated by dpgen from aquacool_240.yaml. Do not edit.

use dpgen::runtime::{DeviceInfo, Transport};

/// Aquacool 240, speaking Asetek Pro.
pub struct Aquacool240<T> {
    protocol: crate::protocols::asetek_pro::AsetekPro<T>,
}

impl<T: Transport> Aquacool240<T> {
    pub const NAME: &'static str = "Aquacool 240";
    pub const FAN_COUNT: u32 = 2;
    pub const ENDPOINT: u8 = 0x02;
    pub const VENDOR_ID: u16 = 0x1e71;
    pub const PRODUCT_ID: u16 = 0x3008;

    pub fn new(transport: T) -> Self {
        Self {
            protocol: crate::protocols::asetek_pro::AsetekPro::new(transport),
        }
    }

    pub fn protocol(&self) -> &crate::protocols::asetek_pro::AsetekPro<T> {
        &self.protocol
    }

    pub fn protocol_mut(&mut self) -> &mut crate::protocols::asetek_pro::AsetekPro<T> {
        &mut self.protocol
    }
}

impl<T: Transport> DeviceInfo for Aquacool240<T> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn fan_count(&self) -> u32 {
        Self::FAN_COUNT
    }

    fn endpoint(&self) -> u8 {
        Self::ENDPOINT
    }

    fn vendor_id(&self) -> u16 {
        Self::VENDOR_ID
    }

    fn product_id(&self) -> u16 {
        Self::PRODUCT_ID
    }
}

// @generated by dpgen. Do not edit.

use dpgen::runtime::{DeviceInfo, Transport};

/// Every generated device, in descriptor load order.
pub enum KnownDevice<T> {
    Aquacool240(super::aquacool_240::Aquacool240<T>),
    Aquacool360(super::aquacool_360::Aquacool360<T>),
}

/// Constructor of the first device bound to `(vendor_id, product_id)`.
pub fn lookup<T: Transport>(vendor_id: u16, product_id: u16) -> Option<fn(T) -> KnownDevice<T>> {
    if vendor_id == 0x1e71 && product_id == 0x3008 {
        return Some(|transport| KnownDevice::Aquacool240(super::aquacool_240::Aquacool240::new(transport)));
    }
    if vendor_id == 0x1e71 && product_id == 0x3009 {
        return Some(|transport| KnownDevice::Aquacool360(super::aquacool_360::Aquacool360::new(transport)));
    }
    None
}

/// Build the device bound to `(vendor_id, product_id)` around `transport`.
pub fn check_known_devices<T: Transport>(vendor_id: u16, product_id: u16, transport: T) -> Option<KnownDevice<T>> {
    lookup(vendor_id, product_id).map(|new| new(transport))
}

impl<T: Transport> KnownDevice<T> {
    fn info(&self) -> &dyn DeviceInfo {
        match self {
            KnownDevice::Aquacool240(device) => device,
            KnownDevice::Aquacool360(device) => device,
        }
    }
}

impl<T: Transport> DeviceInfo for KnownDevice<T> {
    fn name(&self) -> &'static str {
        self.info().name()
    }

    fn fan_count(&self) -> u32 {
        self.info().fan_count()
    }

    fn endpoint(&self) -> u8 {
        self.info().endpoint()
    }

    fn vendor_id(&self) -> u16 {
        self.info().vendor_id()
    }

    fn product_id(&self) -> u16 {
        self.info().product_id()
    }
}

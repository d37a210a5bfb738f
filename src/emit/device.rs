//! Renders one device descriptor into a Rust module wrapping its protocol.

use super::naming::string_literal;
use super::{header, SourceWriter};
use crate::loader::RegistryEntry;
use crate::spec::DeviceSpec;

/// Source of `devices/<stem>.rs`. `protocol` is the registry entry the
/// device's protocol id resolved to; `protocols_module` is where the
/// protocol modules live in the consuming crate.
pub fn render_device(device: &DeviceSpec, protocol: &RegistryEntry, runtime_path: &str, protocols_module: &str) -> String {
    let ty = device.type_name();
    let proto = format!("{}::{}::{}", protocols_module, protocol.module, protocol.type_name);

    let mut w = SourceWriter::new();
    w.line(header(&device.source));
    w.blank();
    w.line(format!("use {}::{{DeviceInfo, Transport}};", runtime_path));
    w.blank();
    w.line(format!("/// {}, speaking {}.", device.name, protocol.name));
    w.open(format!("pub struct {}<T> {{", ty));
    w.line(format!("protocol: {}<T>,", proto));
    w.close("}");
    w.blank();

    w.open(format!("impl<T: Transport> {}<T> {{", ty));
    w.line(format!("pub const NAME: &'static str = {};", string_literal(&device.name)));
    w.line(format!("pub const FAN_COUNT: u32 = {};", device.fans));
    w.line(format!("pub const ENDPOINT: u8 = {:#04x};", device.usb.endpoint));
    w.line(format!("pub const VENDOR_ID: u16 = {:#06x};", device.usb.vendor_id));
    w.line(format!("pub const PRODUCT_ID: u16 = {:#06x};", device.usb.product_id));
    w.blank();
    w.open("pub fn new(transport: T) -> Self {");
    w.open("Self {");
    w.line(format!("protocol: {}::new(transport),", proto));
    w.close("}");
    w.close("}");
    w.blank();
    w.open(format!("pub fn protocol(&self) -> &{}<T> {{", proto));
    w.line("&self.protocol");
    w.close("}");
    w.blank();
    w.open(format!("pub fn protocol_mut(&mut self) -> &mut {}<T> {{", proto));
    w.line("&mut self.protocol");
    w.close("}");
    w.close("}");
    w.blank();

    w.open(format!("impl<T: Transport> DeviceInfo for {}<T> {{", ty));
    let getters = [
        ("name", "&'static str", "NAME"),
        ("fan_count", "u32", "FAN_COUNT"),
        ("endpoint", "u8", "ENDPOINT"),
        ("vendor_id", "u16", "VENDOR_ID"),
        ("product_id", "u16", "PRODUCT_ID"),
    ];
    for (i, (getter, ret, constant)) in getters.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        w.open(format!("fn {}(&self) -> {} {{", getter, ret));
        w.line(format!("Self::{}", constant));
        w.close("}");
    }
    w.close("}");
    w.finish()
}

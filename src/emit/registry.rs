//! Renders `devices/all.rs`, the USB address dispatch table, and the
//! `mod.rs` glue for both output directories.

use super::{SourceWriter, GENERATED_NOTICE};
use crate::spec::DeviceSpec;
use std::collections::HashMap;
use tracing::warn;

/// Source of `devices/all.rs`. Devices are matched in the given order; the
/// first device bound to an address pair wins.
pub fn render_registry(devices: &[DeviceSpec], runtime_path: &str) -> String {
    warn_on_shared_addresses(devices);

    let mut w = SourceWriter::new();
    w.line(GENERATED_NOTICE);
    w.blank();
    w.line(format!("use {}::{{DeviceInfo, Transport}};", runtime_path));
    w.blank();

    w.line("/// Every generated device, in descriptor load order.");
    w.open("pub enum KnownDevice<T> {");
    for d in devices {
        let ty = d.type_name();
        w.line(format!("{}(super::{}::{}<T>),", ty, d.stem, ty));
    }
    if devices.is_empty() {
        w.line("#[doc(hidden)]");
        w.line("Unreachable(std::convert::Infallible, std::marker::PhantomData<T>),");
    }
    w.close("}");
    w.blank();

    w.line("/// Constructor of the first device bound to `(vendor_id, product_id)`.");
    w.open("pub fn lookup<T: Transport>(vendor_id: u16, product_id: u16) -> Option<fn(T) -> KnownDevice<T>> {");
    if devices.is_empty() {
        w.line("let _ = (vendor_id, product_id);");
    }
    for d in devices {
        let ty = d.type_name();
        w.open(format!(
            "if vendor_id == {:#06x} && product_id == {:#06x} {{",
            d.usb.vendor_id, d.usb.product_id
        ));
        w.line(format!(
            "return Some(|transport| KnownDevice::{}(super::{}::{}::new(transport)));",
            ty, d.stem, ty
        ));
        w.close("}");
    }
    w.line("None");
    w.close("}");
    w.blank();

    w.line("/// Build the device bound to `(vendor_id, product_id)` around `transport`.");
    w.open("pub fn check_known_devices<T: Transport>(vendor_id: u16, product_id: u16, transport: T) -> Option<KnownDevice<T>> {");
    w.line("lookup(vendor_id, product_id).map(|new| new(transport))");
    w.close("}");
    w.blank();

    w.open("impl<T: Transport> KnownDevice<T> {");
    w.open("fn info(&self) -> &dyn DeviceInfo {");
    w.open("match self {");
    for d in devices {
        w.line(format!("KnownDevice::{}(device) => device,", d.type_name()));
    }
    if devices.is_empty() {
        w.line("KnownDevice::Unreachable(never, _) => match *never {},");
    }
    w.close("}");
    w.close("}");
    w.close("}");
    w.blank();

    w.open("impl<T: Transport> DeviceInfo for KnownDevice<T> {");
    let getters = [
        ("name", "&'static str"),
        ("fan_count", "u32"),
        ("endpoint", "u8"),
        ("vendor_id", "u16"),
        ("product_id", "u16"),
    ];
    for (i, (getter, ret)) in getters.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        w.open(format!("fn {}(&self) -> {} {{", getter, ret));
        w.line(format!("self.info().{}()", getter));
        w.close("}");
    }
    w.close("}");
    w.finish()
}

/// `mod.rs` declaring `modules`, in order.
pub fn render_mod_file<'a>(modules: impl IntoIterator<Item = &'a str>) -> String {
    let mut w = SourceWriter::new();
    w.line(GENERATED_NOTICE);
    w.blank();
    for module in modules {
        w.line(format!("pub mod {};", module));
    }
    w.finish()
}

fn warn_on_shared_addresses(devices: &[DeviceSpec]) {
    let mut first: HashMap<(u16, u16), &DeviceSpec> = HashMap::new();
    for d in devices {
        let key = (d.usb.vendor_id, d.usb.product_id);
        match first.get(&key) {
            Some(winner) => warn!(
                vendor_id = key.0,
                product_id = key.1,
                device = %d.name,
                shadowed_by = %winner.name,
                file = %d.source.display(),
                "address pair already bound, device is unreachable through lookup"
            ),
            None => {
                first.insert(key, d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn device(stem: &str, name: &str, pid: u16) -> DeviceSpec {
        let yaml = format!(
            "name: {}\nprotocol: 1\nfans: 2\nusb: {{ vendor_id: 0x1E71, product_id: {}, endpoint: 2 }}\n",
            name, pid
        );
        DeviceSpec::from_yaml(&Path::new("devices").join(format!("{}.yaml", stem)), &yaml).expect("device")
    }

    #[test]
    fn lookup_chain_follows_load_order() {
        let devices = vec![
            device("aquacool_240", "Aquacool 240", 0x3008),
            device("aquacool_360", "Aquacool 360", 0x3009),
        ];
        let src = render_registry(&devices, "dpgen::runtime");
        assert!(src.contains("Aquacool240(super::aquacool_240::Aquacool240<T>),"));
        let a = src.find("product_id == 0x3008").expect("240");
        let b = src.find("product_id == 0x3009").expect("360");
        assert!(a < b);
        assert!(src.contains("return Some(|transport| KnownDevice::Aquacool360(super::aquacool_360::Aquacool360::new(transport)));"));
        assert!(src.contains("KnownDevice::Aquacool240(device) => device,"));
        assert!(!src.contains("Unreachable"));
    }

    #[test]
    fn shared_address_keeps_both_variants() {
        let devices = vec![device("a", "First", 0x3008), device("b", "Second", 0x3008)];
        let src = render_registry(&devices, "dpgen::runtime");
        assert_eq!(src.matches("product_id == 0x3008").count(), 2);
        assert!(src.contains("KnownDevice::Second("));
    }

    #[test]
    fn empty_registry_still_compiles_shape() {
        let src = render_registry(&[], "dpgen::runtime");
        assert!(src.contains("Unreachable(std::convert::Infallible, std::marker::PhantomData<T>),"));
        assert!(src.contains("let _ = (vendor_id, product_id);\n    None"));
    }

    #[test]
    fn mod_file_lists_modules() {
        assert_eq!(
            render_mod_file(["all", "aquacool_240"]),
            "// @generated by dpgen. Do not edit.\n\npub mod all;\npub mod aquacool_240;\n"
        );
    }
}

//! Protocol descriptor fuzz target: loading, compiling and rendering arbitrary
//! YAML must return errors, never panic.
//! Build with: cargo fuzz run protocol_yaml (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let path = std::path::Path::new("protocols/fuzz.yaml");
    if let Ok(spec) = dpgen::ProtocolSpec::from_yaml(path, s) {
        if let Ok(compiled) = dpgen::compile_protocol(&spec) {
            let _ = dpgen::emit::render_protocol(&compiled, "dpgen::runtime");
        }
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run protocol_yaml");
}
